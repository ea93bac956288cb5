//! Commonly used items for convenient importing.
//!
//! ```rust
//! use errtrail::prelude::*;
//!
//! fn divide(a: i32, b: i32) -> Result<i32, Chain> {
//!     if b == 0 {
//!         bail!(code = Code::new(300), "cannot divide {a} by zero");
//!     }
//!     Ok(a / b)
//! }
//!
//! let chain = divide(10, 0).unwrap_err();
//! assert_eq!(chain.message(), "cannot divide 10 by zero");
//! assert_eq!(divide(10, 2).unwrap(), 5);
//! ```
//!
//! This prelude includes [`Chain`], [`Code`], [`IntoChain`], [`ResultExt`]
//! and the [`chain!`], [`wrap!`] and [`bail!`] macros.

pub use crate::{Chain, Code, IntoChain, ResultExt, bail, chain, wrap};
