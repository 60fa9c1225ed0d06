//! URL shape check used when links are added.
//!
//! Accepts `scheme://host[:port][rest]` where scheme is http, https, ftp or ftps,
//! host is a dotted hostname with a TLD, `localhost`, or a dotted-quad address,
//! and rest is empty, `/`, or `/` or `?` followed by non-whitespace.

const SCHEMES: [&str; 4] = ["http://", "https://", "ftp://", "ftps://"];
const MAX_LABEL_LEN: usize = 63;

/// Returns true when `link` has the accepted URL shape.
pub fn is_valid_url(link: &str) -> bool {
    let Some(after_scheme) = strip_scheme(link) else {
        return false;
    };

    let host_end = after_scheme
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '-'))
        .unwrap_or(after_scheme.len());
    let (host, tail) = after_scheme.split_at(host_end);

    if !is_valid_host(host) {
        return false;
    }

    is_valid_tail(skip_port(tail))
}

fn strip_scheme(link: &str) -> Option<&str> {
    SCHEMES.iter().find_map(|scheme| {
        let head = link.get(..scheme.len())?;
        head.eq_ignore_ascii_case(scheme)
            .then(|| &link[scheme.len()..])
    })
}

fn is_valid_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("localhost") || is_dotted_quad(host) || is_domain(host)
}

fn is_dotted_quad(host: &str) -> bool {
    let groups: Vec<&str> = host.split('.').collect();
    groups.len() == 4
        && groups
            .iter()
            .all(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()))
}

fn is_domain(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    let labels: Vec<&str> = host.split('.').collect();
    let Some((tld, labels)) = labels.split_last() else {
        return false;
    };

    !labels.is_empty() && labels.iter().all(|l| is_label(l)) && is_tld(tld)
}

fn is_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            bytes.len() <= MAX_LABEL_LEN
                && first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
        }
        _ => false,
    }
}

fn is_tld(tld: &str) -> bool {
    tld.len() >= 2 && tld.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// Strips a `:digits` port if one is present; anything else is left for the tail check.
fn skip_port(tail: &str) -> &str {
    let Some(rest) = tail.strip_prefix(':') else {
        return tail;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 { tail } else { &rest[digits..] }
}

fn is_valid_tail(tail: &str) -> bool {
    if tail.is_empty() || tail == "/" {
        return true;
    }
    let mut chars = tail.chars();
    matches!(chars.next(), Some('/' | '?'))
        && !chars.as_str().is_empty()
        && !chars.as_str().chars().any(char::is_whitespace)
}
