//! Pricing catalogue read model definitions.

#[cfg(doc)]
use crate::domain::pricing::{KmPackage, LeasingPlan};

/// Wrapper around a catalogue row (e.g. a [`LeasingPlan`] or [`KmPackage`])
/// indicating that the lookup already checked its applicability to the
/// requested scope.
#[derive(Clone, Copy, Debug)]
pub struct Applicable<T>(pub T);
