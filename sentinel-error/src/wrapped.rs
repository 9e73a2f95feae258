//! Chain links: an identity-bearing head plus an optional cause

use crate::stack::{Snapshot, StackTrace};
use crate::{chain, config, Kind, NamedError, SharedError};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// The cause of a [`Wrapped`] error.
///
/// `anyhow::Error` is kept as-is rather than boxed again so that the error it
/// carries, and each of its context layers, stay reachable by downcasting.
#[derive(Clone)]
enum Cause {
    Shared(SharedError),
    Anyhow(Arc<anyhow::Error>),
}

impl Cause {
    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match self {
            Cause::Shared(err) => &**err,
            Cause::Anyhow(err) => {
                let err: &anyhow::Error = err;
                &**err
            }
        }
    }
}

/// The head of a [`Wrapped`] error: an identity, or a whole link whose own
/// cause stays part of the head.
#[derive(Clone)]
pub(crate) enum Head {
    Named(Arc<dyn NamedError>),
    Link(Box<Wrapped>),
}

impl Head {
    fn kind(&self) -> &Kind {
        match self {
            Head::Named(head) => head.kind(),
            Head::Link(link) => link.kind(),
        }
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match self {
            Head::Named(head) => &**head,
            Head::Link(link) => &**link,
        }
    }
}

/// A link in a causal chain.
///
/// The link's own identity is its head's identity; the cause is a separate
/// error matched on its own. Rendering is the head's message, the
/// [wrap separator](config::wrap_separator), then the cause's message.
///
/// # Example
///
/// ```rust
/// use sentinel_error::{Kind, NamedError};
///
/// const ERR: Kind = Kind::new("err");
/// const ISSUE: Kind = Kind::new("issue-text-error");
///
/// let root = std::io::Error::other("root");
/// let outer = ISSUE.wrap(ERR.wrap(root));
///
/// assert_eq!(outer.to_string(), "issue-text-error: err: root");
/// assert!(outer.is(&ERR));
/// ```
#[derive(Clone)]
pub struct Wrapped {
    head: Head,
    cause: Option<Cause>,
    stack: Option<Arc<StackTrace>>,
}

impl Wrapped {
    /// Create a chain link from a head and an optional cause
    pub fn new(head: impl NamedError, cause: impl Into<Option<SharedError>>) -> Self {
        Self {
            head: Head::Named(Arc::new(head)),
            cause: cause.into().map(Cause::Shared),
            stack: None,
        }
    }

    pub(crate) fn with_anyhow(head: impl NamedError, cause: anyhow::Error) -> Self {
        Self {
            head: Head::Named(Arc::new(head)),
            cause: Some(Cause::Anyhow(Arc::new(cause))),
            stack: None,
        }
    }

    pub(crate) fn from_parts(head: Head, cause: Option<SharedError>) -> Self {
        Self {
            head,
            cause: cause.map(Cause::Shared),
            stack: None,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// The identity of this link (the head's identity)
    pub fn kind(&self) -> &Kind {
        self.head.kind()
    }

    /// The head error: an identity, or the link this one was built around
    pub fn head(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.head.as_error()
    }

    pub(crate) fn head_link(&self) -> Option<&Wrapped> {
        match &self.head {
            Head::Link(link) => Some(&**link),
            Head::Named(_) => None,
        }
    }

    /// The immediate cause, unmodified
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_ref().map(Cause::as_error)
    }

    // =========================================================================
    // Wrapping
    // =========================================================================

    /// Use this whole link as the head of a new one around `cause`.
    ///
    /// The new link carries this link's identity, and both this link's cause
    /// and `cause` stay reachable for matching.
    pub fn wrap<E>(self, cause: E) -> Wrapped
    where
        E: StdError + Send + Sync + 'static,
    {
        self.wrap_shared(Arc::new(cause) as SharedError)
    }

    /// [`wrap`](Self::wrap) around a cause shared with other owners
    pub fn wrap_shared(self, cause: impl Into<SharedError>) -> Wrapped {
        Self::from_parts(Head::Link(Box::new(self)), Some(cause.into()))
    }

    // =========================================================================
    // Matching
    // =========================================================================

    /// Check whether this link or anything in its cause chain matches
    /// `candidate`.
    ///
    /// Causes are followed through [`source`](StdError::source), so foreign
    /// wrapping layers are walked as long as they expose their source.
    pub fn is(&self, candidate: &(dyn StdError + 'static)) -> bool {
        chain::is(self, candidate)
    }

    // =========================================================================
    // Stack
    // =========================================================================

    /// Capture the call stack at this call site.
    ///
    /// Any previously captured stack is replaced.
    pub fn with_stack(mut self) -> Self {
        self.stack = Some(Arc::new(StackTrace::capture()));
        self
    }

    /// Whether a stack was captured for this link
    pub fn has_stack(&self) -> bool {
        self.stack.is_some()
    }

    /// The resolved stack, if one was captured
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.stack.as_ref().map(|stack| stack.snapshot())
    }

    /// The rendered stack, or an empty string if none was captured
    pub fn stack(&self) -> String {
        self.snapshot()
            .map(|snapshot| snapshot.as_str().to_string())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn stack_trace(&self) -> Option<&StackTrace> {
        self.stack.as_deref()
    }
}

// =============================================================================
// Display - head, separator, cause
// =============================================================================

impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.head.as_error(), f)?;
        if let Some(cause) = &self.cause {
            f.write_str(&config::wrap_separator())?;
            fmt::Display::fmt(cause.as_error(), f)?;
        }
        Ok(())
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({:?})", self.head.as_error(), self.kind())?;

        if let Some(cause) = self.cause() {
            writeln!(f)?;
            writeln!(f, "    Caused by:")?;
            for (i, err) in chain::chain(cause).enumerate() {
                writeln!(f, "        {}: {}", i, err)?;
            }
        }

        if let Some(snapshot) = self.snapshot() {
            writeln!(f)?;
            writeln!(f, "    Stack:")?;
            for line in snapshot.as_str().lines() {
                writeln!(f, "        {}", line)?;
            }
        }

        Ok(())
    }
}

impl StdError for Wrapped {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause().map(|err| err as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    const ERR: Kind = Kind::new("err");
    const ERR_FMT: Kind = Kind::new("err %s");
    const ISSUE: Kind = Kind::new("issue-text-error");

    fn root() -> SharedError {
        Arc::new(io::Error::other("root"))
    }

    #[test]
    fn test_render_with_cause() {
        assert_eq!(ERR.error().wrap_shared(root()).to_string(), "err: root");
        assert_eq!(
            ERR_FMT.with_args(["formatted"]).wrap_shared(root()).to_string(),
            "err formatted: root"
        );
    }

    #[test]
    fn test_render_without_cause() {
        let err = ERR.wrap_none();
        assert_eq!(err.to_string(), "err");
        assert!(err.cause().is_none());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_render_nested() {
        let outer = ISSUE.wrap(ERR.wrap_shared(root()));
        assert_eq!(outer.to_string(), "issue-text-error: err: root");
        // rendering has no hidden state
        assert_eq!(outer.to_string(), outer.to_string());
    }

    #[test]
    fn test_cause_is_returned_unmodified() {
        let cause = root();
        let err = ERR.error().wrap_shared(Arc::clone(&cause));
        let unwrapped = err.cause().unwrap();
        assert!(std::ptr::addr_eq(unwrapped, &*cause));
        let source = err.source().unwrap();
        assert!(std::ptr::addr_eq(source, &*cause));
    }

    #[test]
    fn test_identity_is_the_head() {
        let err = ERR_FMT.with_args(["x"]).wrap_shared(root());
        assert_eq!(err.kind(), &ERR_FMT);
        assert!(err.is(&ERR_FMT));
        assert!(!err.is(&ERR));
        assert_eq!(err.head().to_string(), "err x");
    }

    #[test]
    fn test_is_matches_causes() {
        let cause = root();
        let wrapped = ERR.error().wrap_shared(Arc::clone(&cause));
        let nested = ERR_FMT.with_args(["test"]).wrap(wrapped.clone());

        assert!(wrapped.is(&ERR));
        assert!(wrapped.is(&*cause));
        assert!(nested.is(&*cause));
        assert!(nested.is(&ERR));
        assert!(nested.is(&ERR_FMT));
        assert!(!nested.is(&io::Error::other("root")));
        assert!(!nested.is(&Kind::new("other")));
    }

    #[test]
    fn test_is_does_not_match_errors_that_merely_wrap_the_kind() {
        let wrapped = ERR.error().wrap_shared(root());
        let caused_by_err = ISSUE.wrap(ERR.error());
        // caused_by_err carries ISSUE, not ERR
        assert!(!wrapped.is(&caused_by_err));
    }

    #[test]
    fn test_link_as_head_keeps_identities() {
        let next: SharedError = Arc::new(io::Error::other("other"));
        let err = ERR.wrap(ISSUE.error()).wrap_shared(Arc::clone(&next));

        assert_eq!(err.to_string(), "err: issue-text-error: other");
        assert_eq!(err.kind(), &ERR);
        assert_eq!(err.head().to_string(), "err: issue-text-error");
        assert!(err.is(&ERR));
        // the head's own cause
        assert!(err.is(&ISSUE));
        assert!(err.is(&*next));
        assert!(!err.is(&ERR_FMT));
        assert!(std::ptr::addr_eq(err.cause().unwrap(), &*next));
    }

    #[test]
    fn test_link_as_head_nested_in_a_cause() {
        let cause = root();
        let head = ERR_FMT.with_args(["x"]).wrap_shared(Arc::clone(&cause));
        let err = ISSUE.wrap(head.wrap(io::Error::other("next")));

        assert_eq!(err.to_string(), "issue-text-error: err x: root: next");
        assert!(err.is(&ERR_FMT));
        assert!(err.is(&*cause));
        assert!(!err.is(&ERR));
    }

    #[test]
    fn test_no_stack_by_default() {
        let err = ERR.error().wrap_shared(root());
        assert!(!err.has_stack());
        assert!(err.snapshot().is_none());
        assert_eq!(err.stack(), "");
    }

    #[test]
    fn test_stack_is_captured_at_caller() {
        let err = ERR.with_stack();
        assert!(err.has_stack());
        let snapshot = err.snapshot().unwrap();
        assert!(snapshot.frames()[0].function.contains("test_stack_is_captured_at_caller"));
        assert!(!err.stack().is_empty());
    }

    #[test]
    fn test_stack_is_cached() {
        let err = ERR.error().wrap_shared(root()).with_stack();
        let first = err.stack();
        let second = err.stack();
        assert_eq!(first, second);
        assert_eq!(err.stack_trace().unwrap().resolve_count(), 1);

        // clones share the cache
        let clone = err.clone();
        assert_eq!(clone.stack(), first);
        assert_eq!(err.stack_trace().unwrap().resolve_count(), 1);
    }

    #[test]
    fn test_stack_does_not_affect_rendering() {
        let err = ERR.error().wrap_shared(root()).with_stack();
        assert_eq!(err.to_string(), "err: root");
        assert!(err.is(&ERR));
    }

    #[test]
    fn test_debug_lists_the_chain() {
        let err = ISSUE.wrap(ERR.wrap_shared(root()));
        let debug = format!("{:?}", err);
        assert!(debug.starts_with(r#"issue-text-error (Kind("issue-text-error"))"#));
        assert!(debug.contains("0: err: root"));
        assert!(debug.contains("1: root"));
        assert!(!debug.contains("Stack:"));
    }
}
