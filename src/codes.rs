//! Error codes and the registry of their display metadata.
//!
//! A [`Code`] is a small integer naming an error category. The [`Registry`]
//! maps codes to [`Metadata`]: the text that is safe to show to external
//! consumers, a text meant for internal logs, and an HTTP status hint.
//!
//! Registries are built explicitly and are immutable once shared. A registry
//! can be passed to the `*_in` rendering functions directly, or installed once
//! per process with [`Registry::install`], after which it is what the
//! [`Display`](core::fmt::Display) implementation of [`Chain`] uses.
//!
//! ```
//! use errtrail::{Chain, Code, Metadata, Registry};
//!
//! const INVALID_JSON: Code = Code::new(201);
//!
//! let registry = Registry::new().register(
//!     INVALID_JSON,
//!     Metadata::new("Bad Request", "invalid json").with_http_status(400),
//! );
//!
//! let chain = Chain::coded(INVALID_JSON, "unexpected token at 1:7");
//! assert_eq!(chain.external_text_in(&registry), "Bad Request");
//! assert_eq!(chain.http_status_in(&registry), 400);
//! ```
//!
//! Code ranges are a convention only: 0-99 for internal and unknown errors,
//! 100-199 for I/O, 200-299 for encoding and 300 upwards for callers.
//!
//! [`Chain`]: crate::Chain

use alloc::borrow::Cow;
use core::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// An error category.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code(u16);

impl Code {
    /// No category. The message of the node is always shown verbatim.
    pub const UNSPECIFIED: Self = Self(0);
    /// An unknown error. This is the code used when none is given.
    pub const UNKNOWN: Self = Self(1);
    /// A fatal error.
    pub const FATAL: Self = Self(2);

    /// Creates a code from its numeric value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the numeric value of this code.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl From<u16> for Code {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Display metadata associated with a [`Code`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    external: Cow<'static, str>,
    internal: Cow<'static, str>,
    http_status: Option<u16>,
}

impl Metadata {
    /// Creates metadata with the given external (user facing) and internal
    /// (log only) texts and no HTTP status.
    #[must_use]
    pub fn new(
        external: impl Into<Cow<'static, str>>,
        internal: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            external: external.into(),
            internal: internal.into(),
            http_status: None,
        }
    }

    /// Sets the HTTP status hint.
    #[must_use]
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Text that is safe to show to unauthenticated consumers. Empty when the
    /// message of the error itself should be shown instead.
    #[must_use]
    pub fn external(&self) -> &str {
        &self.external
    }

    /// Text meant for internal logs.
    #[must_use]
    pub fn internal(&self) -> &str {
        &self.internal
    }

    /// The HTTP status hint, `200` when none was set.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.http_status.unwrap_or(200)
    }
}

/// A mapping from [`Code`]s to [`Metadata`].
///
/// Every registry contains entries for [`Code::UNKNOWN`] and [`Code::FATAL`].
/// The [`Code::UNKNOWN`] entry is the fallback for codes without registered
/// metadata.
#[derive(Clone, Debug)]
pub struct Registry {
    entries: IndexMap<Code, Metadata, FxBuildHasher>,
    fallback: Metadata,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates a registry containing only the built-in entries.
    #[must_use]
    pub fn new() -> Self {
        let unknown = Metadata::new("", "unknown error").with_http_status(500);
        let mut entries = IndexMap::with_hasher(FxBuildHasher);
        entries.insert(Code::UNKNOWN, unknown.clone());
        entries.insert(
            Code::FATAL,
            Metadata::new("Internal Server Error", "fatal error").with_http_status(500),
        );
        Self {
            entries,
            fallback: unknown,
        }
    }

    /// Registers `metadata` for `code`, replacing any previous entry.
    #[must_use]
    pub fn register(mut self, code: Code, metadata: Metadata) -> Self {
        if code == Code::UNKNOWN {
            self.fallback = metadata.clone();
        }
        if let Some(previous) = self.entries.insert(code, metadata) {
            tracing::debug!(
                code = code.get(),
                previous = previous.internal(),
                "replaced error code metadata"
            );
        }
        self
    }

    /// Looks up the metadata registered for `code`.
    #[must_use]
    pub fn lookup(&self, code: Code) -> Option<&Metadata> {
        self.entries.get(&code)
    }

    /// Returns the metadata registered for `code`, or the [`Code::UNKNOWN`]
    /// entry if there is none.
    #[must_use]
    pub fn metadata(&self, code: Code) -> &Metadata {
        self.lookup(code).unwrap_or(&self.fallback)
    }

    /// Iterates over the entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (Code, &Metadata)> {
        self.entries.iter().map(|(code, metadata)| (*code, metadata))
    }

    /// The number of registered codes, built-ins included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the built-in entries cannot be removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Installs this registry for the rest of the process.
    ///
    /// Returns an error containing `self` if a registry has already been
    /// installed.
    ///
    /// ```
    /// use errtrail::{Code, Metadata, Registry};
    ///
    /// Registry::new()
    ///     .register(Code::new(100), Metadata::new("Service Unavailable", "io error"))
    ///     .install()
    ///     .expect("no registry installed yet");
    ///
    /// assert!(Registry::new().install().is_err());
    /// assert!(Registry::global().lookup(Code::new(100)).is_some());
    /// ```
    pub fn install(self) -> Result<(), RegistryAlreadyInstalledError> {
        let codes = self.len();
        let mut candidate = Some(self);
        let mut installed = false;
        INSTALLED.call_once(|| {
            installed = true;
            candidate.take().unwrap_or_default()
        });

        match candidate {
            Some(rejected) if !installed => Err(RegistryAlreadyInstalledError(rejected)),
            _ => {
                tracing::debug!(codes, "installed error code registry");
                Ok(())
            }
        }
    }

    /// The installed registry, or a registry with only the built-in entries
    /// if none has been installed.
    #[must_use]
    pub fn global() -> &'static Registry {
        match INSTALLED.get() {
            Some(registry) => registry,
            None => BUILTIN.call_once(Registry::new),
        }
    }
}

static INSTALLED: spin::Once<Registry> = spin::Once::new();
static BUILTIN: spin::Once<Registry> = spin::Once::new();

/// Error returned by [`Registry::install`] when a registry is already
/// installed.
///
/// Contains the registry that was rejected.
pub struct RegistryAlreadyInstalledError(pub Registry);

impl fmt::Debug for RegistryAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryAlreadyInstalledError").finish()
    }
}

impl fmt::Display for RegistryAlreadyInstalledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an error code registry is already installed")
    }
}

impl core::error::Error for RegistryAlreadyInstalledError {}
