//! [`Rental`] read model definitions.

#[cfg(doc)]
use crate::domain::Rental;

/// Wrapper around a [`Rental`] that is active but past its agreed return
/// date.
#[derive(Clone, Copy, Debug)]
pub struct Overdue<T>(pub T);
