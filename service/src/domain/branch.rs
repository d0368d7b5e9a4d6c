//! Branch-related definitions.
//!
//! Branches (rental offices) are managed outside this engine. Only the
//! identity is needed here.

use derive_more::{Display, From, FromStr, Into};
use uuid::Uuid;

/// ID of a branch.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, FromStr, Hash, Into,
    PartialEq,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}
