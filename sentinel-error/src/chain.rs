//! Walking and matching error chains
//!
//! These functions work on any `&dyn Error`. A chain is the error itself
//! followed by each [`source`](StdError::source) in turn, so links built by
//! this crate, `anyhow` context layers and hand-written wrappers are all
//! walked the same way.
//!
//! Matching a node against a target:
//!
//! - if the target carries an identity ([`Kind`], [`Formatted`] or
//!   [`Wrapped`]), the node matches iff it carries the same identity text;
//! - otherwise the node matches iff it is the very same error instance.
//!
//! A node that is itself a [`SharedError`] (an `Arc` stored as some foreign
//! wrapper's source) is looked through to the error it shares.

use crate::wrapped::Head;
use crate::{Formatted, Kind, NamedError, SharedError, Wrapped};
use std::error::Error as StdError;
use std::sync::Arc;

/// Iterator over an error and its sources
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source().map(unshare);
        Some(current)
    }
}

/// Walk `err` and every error below it
pub fn chain<'a>(err: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain {
        next: Some(unshare(err)),
    }
}

fn unshare<'a>(mut err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    while let Some(shared) = err.downcast_ref::<SharedError>() {
        err = &**shared;
    }
    err
}

/// The last error in the chain
pub fn root_cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    chain(err).last().unwrap_or(err)
}

/// The identity carried by `err` itself, without looking at its sources
pub fn identity_of<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Kind> {
    let err = unshare(err);
    if let Some(kind) = err.downcast_ref::<Kind>() {
        return Some(kind);
    }
    if let Some(formatted) = err.downcast_ref::<Formatted>() {
        return Some(formatted.kind());
    }
    if let Some(wrapped) = err.downcast_ref::<Wrapped>() {
        return Some(wrapped.kind());
    }
    None
}

/// Check whether `err` or anything in its chain matches `target`.
///
/// A link whose head is itself a link is matched against the head's whole
/// chain as well as its own cause.
pub fn is(err: &(dyn StdError + 'static), target: &(dyn StdError + 'static)) -> bool {
    match identity_of(target) {
        Some(kind) => chain(err).any(|node| {
            identity_of(node) == Some(kind) || head_link(node).is_some_and(|head| is(head, target))
        }),
        None => {
            let target = unshare(target);
            chain(err).any(|node| {
                std::ptr::addr_eq(node, target) || head_link(node).is_some_and(|head| is(head, target))
            })
        }
    }
}

fn head_link<'a>(node: &'a (dyn StdError + 'static)) -> Option<&'a Wrapped> {
    node.downcast_ref::<Wrapped>()?.head_link()
}

/// The first identity found while walking the chain
pub fn kind_of<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Kind> {
    chain(err).find_map(identity_of)
}

/// The first error in the chain of type `T`
pub fn find<'a, T: StdError + 'static>(err: &'a (dyn StdError + 'static)) -> Option<&'a T> {
    chain(err).find_map(|node| node.downcast_ref::<T>())
}

/// The rendered stack of the first link in the chain that captured one,
/// or an empty string
pub fn stack(err: &(dyn StdError + 'static)) -> String {
    chain(err)
        .filter_map(|node| node.downcast_ref::<Wrapped>())
        .find_map(Wrapped::snapshot)
        .map(|snapshot| snapshot.as_str().to_string())
        .unwrap_or_default()
}

/// Wrap `cause` with `head` as the head of the chain.
///
/// A head that is a [`Kind`], [`Formatted`] or [`Wrapped`] keeps its
/// identity, and a `Wrapped` head keeps its own cause too. Any other error is
/// converted into a `Kind` made from its rendered message: its original type
/// is lost and only its text survives.
pub fn wrap<H>(head: H, cause: impl Into<Option<SharedError>>) -> Wrapped
where
    H: StdError + Send + Sync + 'static,
{
    Wrapped::from_parts(coerce(head), cause.into())
}

/// [`wrap`], capturing the call stack at the caller
pub fn wrap_with_stack<H>(head: H, cause: impl Into<Option<SharedError>>) -> Wrapped
where
    H: StdError + Send + Sync + 'static,
{
    wrap(head, cause).with_stack()
}

fn coerce<H>(head: H) -> Head
where
    H: StdError + Send + Sync + 'static,
{
    let any: &(dyn StdError + 'static) = &head;
    if let Some(kind) = any.downcast_ref::<Kind>() {
        return Head::Named(Arc::new(kind.clone()));
    }
    if let Some(formatted) = any.downcast_ref::<Formatted>() {
        return Head::Named(Arc::new(formatted.clone()));
    }
    if let Some(link) = any.downcast_ref::<Wrapped>() {
        return Head::Link(Box::new(link.clone()));
    }

    let text = head.to_string();
    tracing::debug!(
        from = std::any::type_name::<H>(),
        kind = %text,
        "coercing foreign error into a kind"
    );
    Head::Named(Arc::new(Kind::from(text)))
}
