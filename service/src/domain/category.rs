//! Vehicle [`Category`] definitions.

use common::Money;
use derive_more::{AsRef, Display, From, FromStr, Into};
use uuid::Uuid;

/// Category of vehicles sharing a price list (e.g. "Economy", "SUV").
///
/// The category's [`default_daily_price`] is the unconditional fallback of
/// the pricing strategy chain: every quote can be priced even when no
/// vehicle-, rule-, plan- or contract-level price matches.
///
/// [`default_daily_price`]: Category::default_daily_price
#[derive(Clone, Debug)]
pub struct Category {
    /// ID of this [`Category`].
    pub id: Id,

    /// [`Name`] of this [`Category`].
    pub name: Name,

    /// Default daily price for vehicles of this [`Category`].
    pub default_daily_price: Money,
}

/// ID of a [`Category`].
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

/// Name of a [`Category`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}
