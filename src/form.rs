//! Line-oriented input form
//!
//! Each input line is one form action: add a link (with an optional display
//! name after ` | `), list the queue, clear it, or generate. A line that is not
//! a known command is treated as a link to add.

use crate::batch::{BatchGenerator, Reporter};
use crate::error::{Error, Result};
use std::io::{BufRead, Write};

/// Separator between a link and its display name on one input line
pub const NAME_SEPARATOR: char = '|';

const HELP: &str = "\
Commands:
  add <link> [| <name>]   queue a link (a bare link line works too)
  list                    show queued links
  clear                   drop every queued link
  generate                write and verify one QR code per link
  help                    show this text
  quit                    leave";

/// One parsed form action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    /// Queue a link with an optional display name
    Add {
        /// Raw link text
        link: String,
        /// Raw name text, possibly empty
        name: String,
    },
    /// Show the queue
    List,
    /// Empty the queue
    Clear,
    /// Run a batch
    Generate,
    /// Show usage
    Help,
    /// Leave the session
    Quit,
    /// Blank line
    Empty,
}

impl FormCommand {
    /// Parse one input line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));

        match word.to_ascii_lowercase().as_str() {
            "list" | "ls" if rest.is_empty() => Self::List,
            "clear" if rest.is_empty() => Self::Clear,
            "generate" | "gen" if rest.is_empty() => Self::Generate,
            "help" | "?" if rest.is_empty() => Self::Help,
            "quit" | "exit" if rest.is_empty() => Self::Quit,
            "add" => Self::add(rest),
            _ => Self::add(line),
        }
    }

    fn add(text: &str) -> Self {
        let (link, name) = split_entry(text);
        Self::Add {
            link: link.to_string(),
            name: name.to_string(),
        }
    }
}

/// Split `link | name` into trimmed parts; the name part is optional.
///
/// A valid link never contains whitespace, so the link is the first token and
/// the separator only counts after whitespace. A `|` inside the link is kept.
/// Text without a separator stays whole so it is rejected as a link.
pub fn split_entry(text: &str) -> (&str, &str) {
    let text = text.trim();
    if let Some((link, rest)) = text.split_once(char::is_whitespace) {
        if let Some(name) = rest.trim_start().strip_prefix(NAME_SEPARATOR) {
            return (link, name.trim());
        }
    }
    (text, "")
}

/// Drives a [`BatchGenerator`] from lines of text, echoing the queue after each change
pub struct FormSession<'a, W: Write> {
    generator: &'a mut BatchGenerator,
    out: W,
}

impl<'a, W: Write> FormSession<'a, W> {
    /// Attach a session to a generator and an output stream
    pub fn new(generator: &'a mut BatchGenerator, out: W) -> Self {
        Self { generator, out }
    }

    /// Read commands until end of input or `quit`.
    pub fn run<R, P>(&mut self, input: R, reporter: &mut P) -> Result<()>
    where
        R: BufRead,
        P: Reporter + ?Sized,
    {
        self.prompt()?;
        for line in input.lines() {
            let line = line?;
            if !self.handle(FormCommand::parse(&line), reporter)? {
                break;
            }
            self.prompt()?;
        }
        Ok(())
    }

    /// Apply one command; returns `false` once the session should end.
    pub fn handle<P>(&mut self, command: FormCommand, reporter: &mut P) -> Result<bool>
    where
        P: Reporter + ?Sized,
    {
        match command {
            FormCommand::Add { link, name } => {
                let added = self.generator.add_link(&link, &name).map(|_| ());
                match added {
                    Ok(()) => self.render_list()?,
                    Err(Error::InvalidUrl(url)) => writeln!(self.out, "Invalid URL: {url}")?,
                    Err(err) => return Err(err),
                }
            }
            FormCommand::List => self.render_list()?,
            FormCommand::Clear => {
                self.generator.clear();
                self.render_list()?;
            }
            FormCommand::Generate => {
                if let Err(err) = self.generator.generate_all(reporter) {
                    tracing::error!(error = %err, "Batch could not start");
                    writeln!(self.out, "{err}")?;
                }
            }
            FormCommand::Help => writeln!(self.out, "{HELP}")?,
            FormCommand::Quit => return Ok(false),
            FormCommand::Empty => {}
        }
        Ok(true)
    }

    /// Give back the output stream
    pub fn into_output(self) -> W {
        self.out
    }

    fn render_list(&mut self) -> Result<()> {
        let labels = self.generator.links().labels();
        if labels.is_empty() {
            writeln!(self.out, "(no links queued)")?;
        }
        for label in labels {
            writeln!(self.out, "  {label}")?;
        }
        Ok(())
    }

    fn prompt(&mut self) -> Result<()> {
        write!(self.out, "qrgen> ")?;
        self.out.flush()?;
        Ok(())
    }
}
