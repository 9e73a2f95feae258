//! Error identities

use crate::{Formatted, NamedError};
use std::borrow::Cow;
use std::fmt;

/// The identity of an error.
///
/// A `Kind` is declared once as a constant and compared by its text: two
/// kinds are equal iff their text is equal. It is also a complete error on
/// its own, rendering as that text verbatim.
///
/// # Example
///
/// ```rust
/// use sentinel_error::{Kind, NamedError};
///
/// const NOT_FOUND: Kind = Kind::new("page %s not found");
///
/// let err = NOT_FOUND.with_args(["context"]);
/// assert_eq!(err.to_string(), "page context not found");
/// assert!(NOT_FOUND.is(&err));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kind(Cow<'static, str>);

impl Kind {
    /// Declare a new identity
    pub const fn new(text: &'static str) -> Self {
        Kind(Cow::Borrowed(text))
    }

    /// Returns the identity text, before any argument substitution
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create a fresh error value carrying this identity.
    ///
    /// Calling this any number of times is fine: every returned value is
    /// identity-equal to every other value created from the same text.
    pub fn error(&self) -> Formatted {
        Formatted::new(self.clone(), Vec::new())
    }
}

/// Owned text becomes an identity; used when a foreign error is coerced
/// into the head of a chain.
impl From<String> for Kind {
    fn from(text: String) -> Self {
        Kind(Cow::Owned(text))
    }
}

impl From<&'static str> for Kind {
    fn from(text: &'static str) -> Self {
        Kind::new(text)
    }
}

impl PartialEq<str> for Kind {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Kind {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Kind").field(&self.as_str()).finish()
    }
}

impl std::error::Error for Kind {}

impl NamedError for Kind {
    fn kind(&self) -> &Kind {
        self
    }
}
