//! Read models.
//!
//! Thin marker wrappers encoding what a lookup guarantees about the wrapped
//! value, so commands can rely on it in the type.

pub mod contract;
pub mod leasing;
pub mod pricing;
pub mod rental;
