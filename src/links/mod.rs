//! Link collection and validation
//!
//! Holds the ordered list of links the user has entered. Links are normalised
//! (trimmed, `http://` added when no http(s) scheme is present) and checked
//! against the accepted URL shape before they are stored.

mod pattern;

pub use pattern::is_valid_url;

use crate::error::{Error, Result};
use serde::Serialize;

/// Number of characters of a display name shown before it is cut off
pub const DISPLAY_LIMIT: usize = 40;

/// Marker appended to display names that were cut off
pub const ELLIPSIS: &str = "...";

/// A validated link together with the name it is shown and saved under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    destination: String,
    display_name: String,
}

impl LinkEntry {
    /// Build an entry from raw form input.
    ///
    /// An empty name (after trimming) falls back to the normalised link.
    pub fn new(raw_link: &str, raw_name: &str) -> Result<Self> {
        let destination = normalize_link(raw_link);
        if !is_valid_url(&destination) {
            return Err(Error::InvalidUrl(destination));
        }

        let name = raw_name.trim();
        let display_name = if name.is_empty() {
            destination.clone()
        } else {
            name.to_string()
        };

        Ok(Self {
            destination,
            display_name,
        })
    }

    /// The validated URL encoded into the symbol
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Name used for display and for the output file name
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Display name as rendered in a list, cut to [`DISPLAY_LIMIT`] characters
    pub fn label(&self) -> String {
        display_label(&self.display_name)
    }
}

/// Trim a raw link and prefix `http://` unless it already carries an http(s) scheme.
pub fn normalize_link(raw: &str) -> String {
    let link = raw.trim();
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else {
        format!("http://{link}")
    }
}

/// Render a display name, cutting it to [`DISPLAY_LIMIT`] characters plus [`ELLIPSIS`].
pub fn display_label(name: &str) -> String {
    if name.chars().count() > DISPLAY_LIMIT {
        let head: String = name.chars().take(DISPLAY_LIMIT).collect();
        format!("{head}{ELLIPSIS}")
    } else {
        name.to_string()
    }
}

/// Ordered collection of entries awaiting generation
#[derive(Debug, Clone, Default)]
pub struct LinkList {
    entries: Vec<LinkEntry>,
}

impl LinkList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a link, returning the stored entry.
    ///
    /// Rejected links leave the list untouched.
    pub fn add_link(&mut self, raw_link: &str, raw_name: &str) -> Result<&LinkEntry> {
        let entry = LinkEntry::new(raw_link, raw_name)?;
        tracing::debug!(
            destination = entry.destination(),
            display_name = entry.display_name(),
            "Link added"
        );
        let index = self.entries.len();
        self.entries.push(entry);
        Ok(&self.entries[index])
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[LinkEntry] {
        &self.entries
    }

    /// Display labels in insertion order
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(LinkEntry::label).collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_http_scheme_and_default_name() {
        let entry = LinkEntry::new("example.com", "").unwrap();
        assert_eq!(entry.destination(), "http://example.com");
        assert_eq!(entry.display_name(), "http://example.com");
    }

    #[test]
    fn input_is_trimmed() {
        let entry = LinkEntry::new("  https://example.com/docs  ", "  Docs ").unwrap();
        assert_eq!(entry.destination(), "https://example.com/docs");
        assert_eq!(entry.display_name(), "Docs");
    }

    #[test]
    fn localhost_and_ipv4_without_scheme_are_accepted() {
        assert_eq!(
            LinkEntry::new("localhost:8080", "").unwrap().destination(),
            "http://localhost:8080"
        );
        assert_eq!(
            LinkEntry::new("127.0.0.1/status", "").unwrap().destination(),
            "http://127.0.0.1/status"
        );
    }

    #[test]
    fn malformed_links_are_rejected() {
        for raw in ["", "   ", "not a url", "exa mple.com", "http://", "foo_bar.com"] {
            match LinkEntry::new(raw, "") {
                Err(Error::InvalidUrl(_)) => {}
                other => panic!("expected InvalidUrl for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn ftp_scheme_is_prefixed_and_rejected() {
        // Only http(s) counts as a scheme during normalisation.
        assert!(matches!(
            LinkEntry::new("ftp://files.example.com", ""),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn rejected_link_leaves_list_unchanged() {
        let mut list = LinkList::new();
        list.add_link("example.com", "one").unwrap();
        assert!(list.add_link("bad host", "two").is_err());
        assert_eq!(list.len(), 1);
        assert_eq!(list.entries()[0].display_name(), "one");
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut list = LinkList::new();
        list.add_link("b.com", "").unwrap();
        list.add_link("a.com", "").unwrap();
        let names: Vec<_> = list.entries().iter().map(|e| e.destination()).collect();
        assert_eq!(names, ["http://b.com", "http://a.com"]);
    }

    #[test]
    fn add_link_returns_the_entry_just_stored() {
        let mut list = LinkList::new();
        list.add_link("first.com", "first").unwrap();
        let added = list.add_link("second.com", "second").unwrap();
        assert_eq!(added.destination(), "http://second.com");
        assert_eq!(added.display_name(), "second");
        assert_eq!(list.entries().last().map(|e| e.display_name()), Some("second"));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut list = LinkList::new();
        list.add_link("example.com", "").unwrap();
        list.clear();
        assert!(list.is_empty());
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn label_truncates_past_forty_chars() {
        let forty = "a".repeat(40);
        let forty_one = "b".repeat(41);
        assert_eq!(display_label(&forty), forty);
        assert_eq!(display_label(&forty_one), format!("{}...", "b".repeat(40)));
    }

    #[test]
    fn long_default_name_is_truncated_in_label() {
        let entry = LinkEntry::new("example.com/a/very/long/path/that/keeps/going", "").unwrap();
        assert_eq!(entry.label(), "http://example.com/a/very/long/path/that...");
    }
}
