//! # sentinel-error
//!
//! Typed, comparable, chainable sentinel errors.
//!
//! ## Design Philosophy
//!
//! - **Kind**: a constant identity, compared by text, usable as an error on its own
//! - **Formatted**: a kind plus arguments that only affect the rendered message
//! - **Wrapped**: a kind-bearing head plus an optional cause, forming a chain
//! - **Matching**: "is this, or anything it was caused by, of kind X"
//!
//! ## Usage
//!
//! ```rust
//! use sentinel_error::{Kind, NamedError};
//!
//! const PAGE_NOT_FOUND: Kind = Kind::new("page '%s' not found");
//! const EXECUTE: Kind = Kind::new("execute");
//!
//! fn load(page: &str) -> Result<(), sentinel_error::Wrapped> {
//!     let io = std::io::Error::other("no such file");
//!     Err(PAGE_NOT_FOUND.with_args([page.to_string()]).wrap(io))
//! }
//!
//! let err = EXECUTE.wrap(load("context").unwrap_err());
//! assert_eq!(err.to_string(), "execute: page 'context' not found: no such file");
//! assert!(err.is(&PAGE_NOT_FOUND));
//! assert!(sentinel_error::is(&err, &EXECUTE));
//! ```
//!
//! ## Principles
//!
//! - Identity is the kind's text, never the rendered message or the arguments
//! - Causes are walked through `Error::source`, so foreign wrappers are tunnelled
//! - Constructing an error never fails; rendering problems become markers in the text
//! - Stacks are only captured when asked for, and only resolved once

mod args;
mod chain;
pub mod config;
mod ext;
mod formatted;
mod kind;
mod named;
mod printf;
pub mod stack;
mod wrapped;

pub use args::Arg;
pub use chain::{chain, find, identity_of, is, kind_of, root_cause, stack, wrap, wrap_with_stack, Chain};
pub use ext::ResultExt;
pub use formatted::Formatted;
pub use kind::Kind;
pub use named::NamedError;
pub use wrapped::Wrapped;

/// An error shared between owners, as stored in a chain
pub type SharedError = std::sync::Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias using a chain link as the error
pub type Result<T, E = Wrapped> = std::result::Result<T, E>;
