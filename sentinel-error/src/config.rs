//! Process-wide rendering configuration
//!
//! The wrap separator is read on every render of a [`Wrapped`](crate::Wrapped)
//! and is meant to be set once at startup. Changing it later affects every
//! subsequent render in the process.

use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Separator placed between a head's message and its cause's message
pub const DEFAULT_WRAP_SEPARATOR: &str = ": ";

static WRAP_SEPARATOR: LazyLock<ArcSwap<String>> =
    LazyLock::new(|| ArcSwap::from_pointee(DEFAULT_WRAP_SEPARATOR.to_string()));

/// The separator currently in effect
pub fn wrap_separator() -> Arc<String> {
    WRAP_SEPARATOR.load_full()
}

/// Replace the separator for every render from now on
pub fn set_wrap_separator(separator: impl Into<String>) {
    let separator = separator.into();
    tracing::debug!(separator = %separator, "wrap separator changed");
    WRAP_SEPARATOR.store(Arc::new(separator));
}
