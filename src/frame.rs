//! Call-site capture.
//!
//! A [`Frame`] records where a node of a [`Chain`] was created. Every public
//! constructor in this crate is annotated with `#[track_caller]`, so the
//! location reported by [`core::panic::Location::caller()`] is always the
//! first frame *outside* of this crate. There is no need to walk the stack and
//! skip frames by matching on source paths.
//!
//! The function name is not part of [`core::panic::Location`]. It is filled in
//! by the [`chain!`] and [`wrap!`] macros at compile time, or, when the
//! `backtrace` feature is enabled, resolved by looking up the symbol whose
//! file and line match the captured location.
//!
//! [`Chain`]: crate::Chain
//! [`chain!`]: crate::chain!
//! [`wrap!`]: crate::wrap!

use alloc::borrow::Cow;
use core::{fmt, panic::Location};

/// A captured call-site location.
///
/// Frames are immutable once captured. A frame whose capture did not succeed
/// (see [`Frame::UNKNOWN`]) renders as `n/a` and must be treated as "location
/// unknown" by consumers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Frame {
    function: Option<Cow<'static, str>>,
    file: &'static str,
    line: u32,
    column: u32,
    ok: bool,
}

impl Frame {
    /// A frame for which no location information is available.
    pub const UNKNOWN: Self = Self {
        function: None,
        file: "",
        line: 0,
        column: 0,
        ok: false,
    };

    /// Captures the location of the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use errtrail::Frame;
    ///
    /// let frame = Frame::capture();
    /// assert!(frame.is_known());
    /// assert_eq!(frame.line(), line!() - 2);
    /// ```
    #[track_caller]
    #[must_use]
    pub fn capture() -> Self {
        let location = Location::caller();
        #[cfg_attr(not(feature = "backtrace"), allow(unused_mut))]
        let mut frame = Self::from_location(location);

        #[cfg(feature = "backtrace")]
        {
            frame.function = resolve::function_at(location).map(Cow::Owned);
        }

        frame
    }

    /// Captures the location of the caller, recording `function` as the name
    /// of the enclosing function.
    #[track_caller]
    #[must_use]
    pub fn capture_in(function: &'static str) -> Self {
        Self {
            function: Some(Cow::Borrowed(function)),
            ..Self::from_location(Location::caller())
        }
    }

    /// Creates a frame from an already captured location.
    #[must_use]
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            function: None,
            file: location.file(),
            line: location.line(),
            column: location.column(),
            ok: true,
        }
    }

    /// Returns whether location information was captured for this frame.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.ok
    }

    /// The source file of the call site, as reported by the compiler.
    #[must_use]
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// The last path component of [`file`](Self::file).
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        self.file
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(self.file)
    }

    /// The line number of the call site.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The column of the call site.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// The name of the function containing the call site, if known.
    #[must_use]
    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.ok {
            return f.write_str("n/a");
        }
        write!(f, "{}:{}", self.file_name(), self.line)?;
        if let Some(function) = &self.function {
            write!(f, " ({function})")?;
        }
        Ok(())
    }
}

/// Strips the marker suffix appended by the function-name macro, as well as
/// any trailing closure segments.
#[doc(hidden)]
#[must_use]
pub fn function_name(marker_path: &'static str) -> &'static str {
    let mut name = marker_path.strip_suffix("::marker").unwrap_or(marker_path);
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    name
}

#[cfg(feature = "backtrace")]
mod resolve {
    use alloc::{format, string::String};
    use core::panic::Location;

    /// Finds the symbol whose debug info points at `location`.
    pub(super) fn function_at(location: &Location<'_>) -> Option<String> {
        let mut found = None;
        backtrace::trace(|frame| {
            backtrace::resolve_frame(frame, |symbol| {
                if found.is_some() {
                    return;
                }
                let (Some(name), Some(path), Some(line)) =
                    (symbol.name(), symbol.filename(), symbol.lineno())
                else {
                    return;
                };
                if line == location.line() && path.ends_with(location.file()) {
                    found = Some(format!("{name:#}"));
                }
            });
            found.is_none()
        });
        found
    }
}
