//! Rendering chains as text or JSON.
//!
//! A [`Format`] combines a [`Verb`] with four independent flags. The plain
//! verb, and the detailed verb without flags, render only the external text
//! of the outermost node, which is what untrusted consumers may see. The
//! other combinations expose literal messages and source locations and are
//! meant for trusted logs.
//!
//! | flags                  | output                                      |
//! |------------------------|---------------------------------------------|
//! | none                   | `Internal Server Error`                     |
//! | `with_caller`          | `loading failed - #0 main.rs:12 (app::run);` |
//! | `with_full_trace`      | one entry per node, outermost first         |
//! | `json`                 | `[{"error":"loading failed"}]`              |
//! | `pretty`               | newlines between entries, indented JSON     |
//!
//! The same combinations are reachable through [`core::fmt`]:
//!
//! ```
//! use errtrail::{Chain, Code};
//!
//! let chain = Chain::new("eof").wrap(Code::UNSPECIFIED, "decode failed");
//!
//! assert_eq!(format!("{chain}"), "decode failed");
//! assert!(format!("{chain:-}").starts_with("decode failed - #0 "));
//! assert_eq!(format!("{chain:+}").matches(';').count(), 2);
//! assert!(format!("{:+}", chain.json()).starts_with(r##"[{"caller":"#0 "##));
//! ```
//!
//! | flag | meaning           |
//! |------|-------------------|
//! | `-`  | `with_caller`     |
//! | `+`  | `with_full_trace` |
//! | `#`  | `pretty`          |

mod json;

use alloc::{
    borrow::Cow,
    string::{String, ToString},
    vec::Vec,
};
use core::{error::Error, fmt};

use crate::{Chain, Frame, Registry};

/// How much of a chain is rendered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Only the external text of the outermost node. Flags are ignored.
    #[default]
    Plain,
    /// The external text, or the literal messages and locations selected by
    /// the flags.
    Detailed,
}

/// A verb and flag combination.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Format {
    /// The verb.
    pub verb: Verb,
    /// Render a JSON array of `{"caller", "error"}` objects.
    pub json: bool,
    /// Separate text entries by newlines, indent JSON by four spaces.
    pub pretty: bool,
    /// Annotate the outermost node with its location.
    pub with_caller: bool,
    /// Render every node, each with its location.
    pub with_full_trace: bool,
}

impl Format {
    /// The plain verb without flags.
    pub const PLAIN: Self = Self {
        verb: Verb::Plain,
        json: false,
        pretty: false,
        with_caller: false,
        with_full_trace: false,
    };

    /// The detailed verb without flags.
    pub const DETAILED: Self = Self {
        verb: Verb::Detailed,
        ..Self::PLAIN
    };

    /// Enables the `json` flag.
    #[must_use]
    pub const fn json(self) -> Self {
        Self { json: true, ..self }
    }

    /// Enables the `pretty` flag.
    #[must_use]
    pub const fn pretty(self) -> Self {
        Self {
            pretty: true,
            ..self
        }
    }

    /// Enables the `with_caller` flag.
    #[must_use]
    pub const fn with_caller(self) -> Self {
        Self {
            with_caller: true,
            ..self
        }
    }

    /// Enables the `with_full_trace` flag.
    #[must_use]
    pub const fn with_full_trace(self) -> Self {
        Self {
            with_full_trace: true,
            ..self
        }
    }

    /// Renders `chain` using the global [`Registry`].
    #[must_use]
    pub fn render(&self, chain: &Chain) -> String {
        self.render_in(chain, Registry::global())
    }

    /// Renders `chain` using `registry` to look up external texts.
    ///
    /// ```
    /// use errtrail::{Chain, Code, Format, Metadata, Registry};
    ///
    /// let registry = Registry::new().register(Code::new(300), Metadata::new("Not allowed", ""));
    /// let chain = Chain::coded(Code::new(300), "user 42 lacks role admin");
    ///
    /// assert_eq!(Format::PLAIN.render_in(&chain, &registry), "Not allowed");
    /// assert_eq!(
    ///     Format::DETAILED.json().render_in(&chain, &registry),
    ///     r#"[{"error":"user 42 lacks role admin"}]"#
    /// );
    /// ```
    #[must_use]
    pub fn render_in(&self, chain: &Chain, registry: &Registry) -> String {
        self.display_in(chain, registry).to_string()
    }

    /// Returns a value that renders `chain` when displayed.
    pub fn display_in<'a>(&self, chain: &'a Chain, registry: &'a Registry) -> Rendered<'a> {
        Rendered {
            format: *self,
            chain,
            registry,
        }
    }

    /// Whether only the external text is rendered.
    fn is_brief(&self) -> bool {
        self.verb == Verb::Plain || !(self.json || self.with_caller || self.with_full_trace)
    }

    pub(crate) fn write<W: fmt::Write + ?Sized>(
        &self,
        out: &mut W,
        chain: &Chain,
        registry: &Registry,
    ) -> fmt::Result {
        if self.is_brief() {
            return out.write_str(&chain.external_text_in(registry));
        }

        let entries = Entry::collect(chain, self.with_full_trace);
        if self.json {
            let with_caller = self.with_caller || self.with_full_trace;
            return json::write(out, &entries, with_caller, self.pretty);
        }

        let separator = if self.pretty { "\n" } else { " " };
        for (position, entry) in entries.iter().enumerate() {
            if position > 0 {
                out.write_str(separator)?;
            }
            if !entry.text.is_empty() {
                write!(out, "{} - ", entry.text)?;
            }
            write!(out, "{}", entry.caller())?;
            if entry.frame.is_some() {
                out.write_char(';')?;
            }
        }
        Ok(())
    }
}

/// A chain rendered with a [`Format`]. Created by [`Format::display_in`].
#[must_use]
#[derive(Clone, Copy)]
pub struct Rendered<'a> {
    format: Format,
    chain: &'a Chain,
    registry: &'a Registry,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format.write(f, self.chain, self.registry)
    }
}

/// One rendered step of a trace.
pub(crate) struct Entry<'a> {
    index: usize,
    text: Cow<'a, str>,
    /// `None` when the location is unknown.
    frame: Option<&'a Frame>,
}

impl<'a> Entry<'a> {
    fn collect(chain: &'a Chain, full_trace: bool) -> Vec<Self> {
        let shown = if full_trace { chain.len() } else { 1 };
        let mut entries: Vec<Self> = chain
            .nodes()
            .take(shown)
            .enumerate()
            .map(|(index, node)| Entry {
                index,
                text: node.message(),
                frame: Some(node.frame()).filter(|frame| frame.is_known()),
            })
            .collect();

        if full_trace {
            let mut source = chain.cause().source_error().and_then(Error::source);
            while let Some(error) = source {
                entries.push(Entry {
                    index: entries.len(),
                    text: Cow::Owned(error.to_string()),
                    frame: None,
                });
                source = error.source();
            }
        }
        entries
    }

    fn caller(&self) -> Caller<'_> {
        Caller {
            index: self.index,
            frame: self.frame,
        }
    }
}

/// Renders as `#<index> <frame>` or `#<index> n/a`.
struct Caller<'a> {
    index: usize,
    frame: Option<&'a Frame>,
}

impl fmt::Display for Caller<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frame {
            Some(frame) => write!(f, "#{} {frame}", self.index),
            None => write!(f, "#{} n/a", self.index),
        }
    }
}

/// Displays the chain using the global [`Registry`].
///
/// Without flags this is the external text of the outermost node. The `-`
/// flag adds its location, `+` renders the full trace and `#` separates trace
/// entries by newlines.
impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = Format {
            verb: Verb::Detailed,
            json: false,
            pretty: f.alternate(),
            with_caller: f.sign_minus(),
            with_full_trace: f.sign_plus(),
        };
        format.write(f, self, Registry::global())
    }
}

/// Renders the full trace, one node per line.
impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Format::DETAILED
            .with_full_trace()
            .pretty()
            .write(f, self, Registry::global())
    }
}

impl Chain {
    /// Returns a value that renders the chain as JSON when displayed.
    ///
    /// It honors the same flags as the [`Display`](fmt::Display)
    /// implementation of [`Chain`], with `#` selecting indented output.
    pub fn json(&self) -> Json<'_> {
        Json { chain: self }
    }
}

/// JSON view of a [`Chain`]. Created by [`Chain::json`].
#[must_use]
#[derive(Clone, Copy)]
pub struct Json<'a> {
    chain: &'a Chain,
}

impl fmt::Display for Json<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = Format {
            verb: Verb::Detailed,
            json: true,
            pretty: f.alternate(),
            with_caller: f.sign_minus(),
            with_full_trace: f.sign_plus(),
        };
        format.write(f, self.chain, Registry::global())
    }
}
