//! Identities decorated with rendering arguments

use crate::{printf, Arg, Kind, NamedError};
use std::fmt;

/// A [`Kind`] plus the positional arguments substituted into its text.
///
/// Equality and matching only look at the kind: two `Formatted` values with
/// different arguments are still the same error.
///
/// ```rust
/// use sentinel_error::{Kind, NamedError};
///
/// const ERR: Kind = Kind::new("err %s");
///
/// let a = ERR.with_args(["one"]);
/// let b = ERR.with_args(["two"]);
/// assert_eq!(a.to_string(), "err one");
/// assert_eq!(a, b);
/// ```
#[derive(Clone)]
pub struct Formatted {
    kind: Kind,
    args: Vec<Arg>,
}

impl Formatted {
    /// Pair `kind` with its rendering arguments; usually reached through
    /// [`NamedError::with_args`]
    pub fn new(kind: Kind, args: Vec<Arg>) -> Self {
        Self { kind, args }
    }

    /// The arguments used for rendering
    pub fn args(&self) -> &[Arg] {
        &self.args
    }
}

impl fmt::Display for Formatted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            return f.write_str(self.kind.as_str());
        }
        printf::write(f, self.kind.as_str(), &self.args)
    }
}

impl fmt::Debug for Formatted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatted")
            .field("kind", &self.kind.as_str())
            .field("args", &self.args)
            .finish()
    }
}

impl PartialEq for Formatted {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Formatted {}

impl PartialEq<Kind> for Formatted {
    fn eq(&self, other: &Kind) -> bool {
        self.kind == *other
    }
}

impl std::error::Error for Formatted {}

impl NamedError for Formatted {
    fn kind(&self) -> &Kind {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use pretty_assertions::assert_eq;

    const ERR_FMT: Kind = Kind::new("err %s");
    const ERR_COUNT: Kind = Kind::new("%d of %d done");

    #[test]
    fn test_new_is_with_args() {
        let built = Formatted::new(ERR_FMT, args!["formatted"]);
        assert_eq!(built, ERR_FMT.with_args(["other"]));
        assert_eq!(built.to_string(), "err formatted");
        assert_eq!(built.kind(), &ERR_FMT);
    }

    #[test]
    fn test_render_with_args() {
        assert_eq!(ERR_FMT.with_args(["formatted"]).to_string(), "err formatted");
        assert_eq!(ERR_COUNT.with_args([3, 4]).to_string(), "3 of 4 done");
    }

    #[test]
    fn test_render_without_args_is_verbatim() {
        assert_eq!(ERR_FMT.error().to_string(), "err %s");
    }

    #[test]
    fn test_render_mismatch_falls_back() {
        let err = ERR_COUNT.with_args(args!["three"]);
        assert_eq!(err.to_string(), "%!d(string=three) of %!d(MISSING) done");
        assert!(ERR_COUNT.is(&err));
    }

    #[test]
    fn test_args_do_not_affect_identity() {
        let a = ERR_FMT.with_args(["a"]);
        let b = ERR_FMT.with_args(args![1, 2, 3]);
        assert_eq!(a, b);
        assert_eq!(a, ERR_FMT);
        assert!(a.is(&b));
        assert!(ERR_FMT.is(&a));
        assert!(a.is(&ERR_FMT));
    }

    #[test]
    fn test_with_args_replaces() {
        let err = ERR_FMT.with_args(["first"]).with_args(["second"]);
        assert_eq!(err.to_string(), "err second");
        assert_eq!(err.args().len(), 1);
        assert_eq!(err.kind(), &ERR_FMT);
    }

    #[test]
    fn test_different_kinds_do_not_match() {
        let err = ERR_FMT.with_args(["x"]);
        assert!(!ERR_COUNT.is(&err));
        assert!(!err.is(&ERR_COUNT));
    }

    #[test]
    fn test_debug() {
        let err = ERR_FMT.with_args(["x"]);
        assert_eq!(format!("{:?}", err), r#"Formatted { kind: "err %s", args: ["x"] }"#);
    }
}
