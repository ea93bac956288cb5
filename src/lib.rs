#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Error chains that remember where they have been.
//!
//! ## Overview
//!
//! An error rarely tells the whole story at the point where it is finally
//! handled. This crate lets every call site that sees an error on its way up
//! the stack attach a message, an optional [`Code`], and its own location,
//! producing a [`Chain`]: an ordered sequence of [`Node`]s from the outermost
//! annotation down to the root cause.
//!
//! ```
//! use errtrail::{Chain, Code, Registry, prelude::*};
//!
//! const IO_EOF: Code = Code::new(102);
//! const INVALID_JSON: Code = Code::new(201);
//!
//! fn read_config() -> Result<Vec<u8>, Chain> {
//!     Err(chain!(code = IO_EOF, "read: end of input"))
//! }
//!
//! fn decode_config() -> Result<(), Chain> {
//!     let bytes = read_config().wrap_coded(INVALID_JSON, "could not decode configuration data")?;
//!     # let _ = bytes;
//!     Ok(())
//! }
//!
//! fn load_config() -> Result<(), Chain> {
//!     decode_config().wrap_coded(Code::FATAL, "service configuration could not be loaded")
//! }
//!
//! let chain = load_config().unwrap_err();
//! assert_eq!(chain.len(), 3);
//! assert_eq!(chain.external_text_in(&Registry::new()), "Internal Server Error");
//! assert!(chain.has(&IO_EOF));
//! ```
//!
//! ## Core Concepts
//!
//! - A [`Frame`] is a captured call site. Every constructor in this crate is
//!   `#[track_caller]`, so the recorded location is always the caller's.
//! - A [`Code`] names an error category. The [`Registry`] maps codes to
//!   [`Metadata`]: a text that is safe to show to external consumers, an
//!   internal text, and an HTTP status hint.
//! - A [`Node`] is one immutable causal step: a message or a foreign error,
//!   a code, and a frame.
//! - A [`Chain`] is a persistent sequence of nodes. Operations such as
//!   [`Chain::wrap`], [`Chain::with`], [`Chain::add`] and [`Chain::track`]
//!   return a new chain and never modify another copy. Use
//!   [`SharedChain`](chain::shared::SharedChain) when several threads extend
//!   one error.
//!
//! ## Rendering
//!
//! The [`Display`](core::fmt::Display) implementation of [`Chain`] prints only
//! the external text of the outermost node, so a chain can be shown to users
//! without leaking internal details. The `-`, `+` and `#` flags, the
//! [`Format`] type and [`Chain::json`] render locations and the full trace for
//! trusted logs. [`Chain::emit`] sends a chain to [`tracing`].
//!
//! Locations render as `file:line (function)`. The function name is only
//! known for nodes created by the [`chain!`] and [`wrap!`] macros, or for any
//! node when the `backtrace` feature is enabled. Other nodes, such as those
//! created by [`Chain::new`], [`Chain::wrap`] or [`ResultExt::wrap`], render
//! as `file:line`, both in text and in the JSON `caller` field.
//!
//! ## Comparing
//!
//! [`Chain::is`] and [`Chain::has`] test for identity against chains, nodes,
//! codes, foreign errors or predicates, see [`traverse`]. [`Chain::unwrap`]
//! peels off the outermost node and [`Chain::downcast_ref`] finds foreign
//! errors by type.
//!
//! ## Features
//!
//! - `std`: use the standard library mutex in
//!   [`SharedChain`](chain::shared::SharedChain) instead of a spin lock.
//! - `backtrace`: resolve the function name of frames captured without the
//!   [`chain!`] and [`wrap!`] macros.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

pub mod chain;
pub mod codes;
pub mod compat;
pub mod format;
pub mod frame;
mod log;
mod node;
pub mod prelude;
pub mod traverse;

mod into_chain;
mod result_ext;

pub use self::{
    chain::{Chain, Nodes},
    codes::{Code, Metadata, Registry, RegistryAlreadyInstalledError},
    format::{Format, Verb},
    frame::Frame,
    into_chain::IntoChain,
    node::Node,
    result_ext::ResultExt,
};

/// A [`Result`](core::result::Result) type alias where the error is a
/// [`Chain`].
///
/// ```
/// fn port() -> errtrail::Result<u16> {
///     Ok(8080)
/// }
/// # assert_eq!(port().unwrap(), 8080);
/// ```
pub type Result<T, E = Chain> = core::result::Result<T, E>;

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    use alloc::{borrow::Cow, fmt};
    #[doc(hidden)]
    pub use core::{format_args, result::Result::Err};

    #[doc(hidden)]
    pub use crate::frame::function_name;
    use crate::{Chain, Code, Frame, IntoChain, Node};

    #[doc(hidden)]
    #[must_use]
    pub fn type_name_of<T>(_: T) -> &'static str {
        core::any::type_name::<T>()
    }

    fn message(args: fmt::Arguments<'_>) -> Cow<'static, str> {
        match args.as_str() {
            Some(message) => Cow::Borrowed(message),
            None => Cow::Owned(fmt::format(args)),
        }
    }

    #[doc(hidden)]
    #[inline]
    #[cold]
    #[must_use]
    #[track_caller]
    pub fn new_chain(code: Code, args: fmt::Arguments<'_>, function: &'static str) -> Chain {
        Chain::from_node(Node::from_message(
            message(args),
            code,
            Frame::capture_in(function),
        ))
    }

    #[doc(hidden)]
    #[inline]
    #[cold]
    #[must_use]
    #[track_caller]
    pub fn wrap_chain(
        error: impl IntoChain,
        code: Code,
        args: fmt::Arguments<'_>,
        function: &'static str,
    ) -> Chain {
        let chain = error.into_chain();
        chain.wrap_node(Node::from_message(
            message(args),
            code,
            Frame::capture_in(function),
        ))
    }
}
