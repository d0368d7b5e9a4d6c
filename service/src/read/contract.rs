//! [`CustomerContract`] read model definitions.

#[cfg(doc)]
use crate::domain::CustomerContract;

/// Wrapper around a [`CustomerContract`] indicating that it
/// [`is_active_on()`] the date it was looked up for.
///
/// [`is_active_on()`]: CustomerContract::is_active_on
#[derive(Clone, Copy, Debug)]
pub struct Active<T>(pub T);
