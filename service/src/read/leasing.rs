//! Leasing read model definitions.

#[cfg(doc)]
use crate::domain::leasing::{EarlyTermination, KmRecord};

/// Wrapper around the chronologically last value of its kind (e.g. the
/// latest [`KmRecord`] of a contract).
#[derive(Clone, Copy, Debug)]
pub struct Latest<T>(pub T);

/// Wrapper around an [`EarlyTermination`] indicating that it
/// [`is_open()`].
///
/// [`is_open()`]: EarlyTermination::is_open
#[derive(Clone, Copy, Debug)]
pub struct Open<T>(pub T);
