//! Emitting chains as structured [`tracing`] events.
//!
//! A chain is logged as a single event. The message of the event is the
//! internal text of the outermost code and the fields describe the chain:
//!
//! | field         | value                                          |
//! |---------------|------------------------------------------------|
//! | `code`        | the outermost code                             |
//! | `http_status` | the HTTP status hint of that code              |
//! | `len`         | the number of nodes                            |
//! | `trace`       | the full trace as a JSON array, outermost first |
//!
//! The full trace contains literal messages and source locations, so events
//! must only be routed to trusted sinks.

use alloc::string::String;

use tracing::Level;

use crate::{Chain, Format, Registry};

impl Chain {
    /// Emits the chain as a `tracing` event at `level`, using the global
    /// [`Registry`].
    ///
    /// ```
    /// use errtrail::Chain;
    /// use tracing::Level;
    ///
    /// Chain::new("disk quota exceeded").emit(Level::WARN);
    /// ```
    pub fn emit(&self, level: Level) {
        self.emit_in(level, Registry::global());
    }

    /// Like [`emit`](Self::emit), with an explicit registry.
    pub fn emit_in(&self, level: Level, registry: &Registry) {
        let trace: String = Format::DETAILED.json().with_full_trace().render_in(self, registry);
        let internal = self.internal_text_in(registry);

        macro_rules! emit_at {
            ($level:expr) => {
                tracing::event!(
                    $level,
                    code = self.code().get(),
                    http_status = self.http_status_in(registry),
                    len = self.len(),
                    trace = trace.as_str(),
                    "{internal}"
                )
            };
        }

        if level == Level::ERROR {
            emit_at!(Level::ERROR);
        } else if level == Level::WARN {
            emit_at!(Level::WARN);
        } else if level == Level::INFO {
            emit_at!(Level::INFO);
        } else if level == Level::DEBUG {
            emit_at!(Level::DEBUG);
        } else {
            emit_at!(Level::TRACE);
        }
    }
}
