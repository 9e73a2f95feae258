//! The capability shared by every identity-bearing error

use crate::{chain, Arg, Formatted, Kind, SharedError, Wrapped};
use std::error::Error as StdError;
use std::sync::Arc;

/// An error that carries a stable identity.
///
/// Implemented by [`Kind`] and [`Formatted`]. The identity is what matching
/// compares; the rendered message is only for humans.
pub trait NamedError: StdError + Send + Sync + 'static {
    /// The identity of this error
    fn kind(&self) -> &Kind;

    /// Check whether `candidate` itself carries the same identity.
    ///
    /// Only the candidate value is inspected, never its causes: an error
    /// that merely wraps this identity further down is not a match.
    fn is(&self, candidate: &(dyn StdError + 'static)) -> bool {
        chain::identity_of(candidate).is_some_and(|kind| kind == self.kind())
    }

    /// Attach positional arguments used when rendering the message.
    ///
    /// Arguments never take part in identity. Attaching arguments to an
    /// already formatted error replaces the previous ones.
    fn with_args<I, A>(&self, args: I) -> Formatted
    where
        Self: Sized,
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        Formatted::new(self.kind().clone(), args.into_iter().map(Into::into).collect())
    }

    /// Wrap `cause` with this error as the head of the chain
    fn wrap<E>(self, cause: E) -> Wrapped
    where
        Self: Sized,
        E: StdError + Send + Sync + 'static,
    {
        Wrapped::new(self, Some(Arc::new(cause) as SharedError))
    }

    /// Wrap a cause that is shared with other owners.
    ///
    /// The cause keeps its address, so a holder of the same `Arc` can later
    /// match it with [`is`](crate::is).
    fn wrap_shared(self, cause: impl Into<SharedError>) -> Wrapped
    where
        Self: Sized,
    {
        Wrapped::new(self, Some(cause.into()))
    }

    /// Wrap an `anyhow::Error`, keeping every layer it carries walkable
    fn wrap_anyhow(self, cause: anyhow::Error) -> Wrapped
    where
        Self: Sized,
    {
        Wrapped::with_anyhow(self, cause)
    }

    /// A chain link with no cause
    fn wrap_none(self) -> Wrapped
    where
        Self: Sized,
    {
        Wrapped::new(self, None)
    }

    /// A chain link with no cause and a stack captured at the caller
    fn with_stack(self) -> Wrapped
    where
        Self: Sized,
    {
        Wrapped::new(self, None).with_stack()
    }
}
