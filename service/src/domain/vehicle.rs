//! [`Vehicle`] definitions.

use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
use uuid::Uuid;

use crate::domain::{branch, category};
#[cfg(doc)]
use common::DateTime;

/// Distance in whole kilometers.
pub type Kilometers = u32;

/// Vehicle of the rental fleet.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// ID of this [`Vehicle`].
    pub id: Id,

    /// [`PlateNumber`] of this [`Vehicle`].
    pub plate_number: PlateNumber,

    /// [`Vin`] of this [`Vehicle`].
    pub vin: Vin,

    /// ID of the [`category::Category`] this [`Vehicle`] belongs to.
    pub category_id: category::Id,

    /// ID of the branch this [`Vehicle`] is stationed at.
    pub branch_id: branch::Id,

    /// [`Status`] of this [`Vehicle`].
    pub status: Status,

    /// Current odometer reading of this [`Vehicle`].
    pub odometer_km: Kilometers,

    /// Daily price of this [`Vehicle`], overriding the
    /// [`category::Category`] default.
    pub daily_price: Option<Money>,

    /// Weekly price of this [`Vehicle`].
    pub weekly_price: Option<Money>,

    /// Monthly price of this [`Vehicle`].
    pub monthly_price: Option<Money>,

    /// [`DateTime`] when this [`Vehicle`] was created.
    pub created_at: CreationDateTime,
}

impl Vehicle {
    /// Transitions this [`Vehicle`] into the provided [`Status`].
    ///
    /// # Errors
    ///
    /// If the transition is not allowed by the [`Vehicle`] lifecycle.
    pub fn change_status(&mut self, to: Status) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(TransitionError {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Reassigns this [`Vehicle`] to the provided branch.
    ///
    /// # Errors
    ///
    /// If this [`Vehicle`] is not [`Status::Available`]: a reserved, rented
    /// or otherwise engaged vehicle cannot move between branches.
    pub fn change_branch(
        &mut self,
        to: branch::Id,
    ) -> Result<(), BranchChangeError> {
        if self.status != Status::Available {
            return Err(BranchChangeError {
                status: self.status,
            });
        }
        self.branch_id = to;
        Ok(())
    }

    /// Records a new odometer reading of this [`Vehicle`].
    ///
    /// # Errors
    ///
    /// If the provided reading is lower than the current one (odometers are
    /// monotonic).
    pub fn update_kilometers(
        &mut self,
        km: Kilometers,
    ) -> Result<(), OdometerError> {
        if km < self.odometer_km {
            return Err(OdometerError {
                current: self.odometer_km,
                provided: km,
            });
        }
        self.odometer_km = km;
        Ok(())
    }
}

/// ID of a [`Vehicle`].
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

/// License plate number of a [`Vehicle`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct PlateNumber(String);

impl PlateNumber {
    /// Creates a new [`PlateNumber`] if the given `plate` is valid.
    #[must_use]
    pub fn new(plate: impl Into<String>) -> Option<Self> {
        let plate = plate.into();
        Self::check(&plate).then_some(Self(plate))
    }

    /// Checks whether the given `plate` is a valid [`PlateNumber`].
    fn check(plate: impl AsRef<str>) -> bool {
        let plate = plate.as_ref();
        plate.trim() == plate
            && !plate.is_empty()
            && plate.len() <= 16
            && plate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == ' ')
    }
}

impl FromStr for PlateNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `PlateNumber`")
    }
}

/// Vehicle identification number of a [`Vehicle`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct Vin(String);

impl Vin {
    /// Creates a new [`Vin`] if the given `vin` is valid.
    #[must_use]
    pub fn new(vin: impl Into<String>) -> Option<Self> {
        let vin = vin.into();
        Self::check(&vin).then_some(Self(vin))
    }

    /// Checks whether the given `vin` is a valid [`Vin`].
    ///
    /// `I`, `O` and `Q` are excluded from VINs to avoid confusion with
    /// digits.
    fn check(vin: impl AsRef<str>) -> bool {
        let vin = vin.as_ref();
        vin.len() == 17
            && vin.chars().all(|c| {
                (c.is_ascii_alphanumeric() && c.is_ascii_uppercase()
                    || c.is_ascii_digit())
                    && !matches!(c, 'I' | 'O' | 'Q')
            })
    }
}

impl FromStr for Vin {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Vin`")
    }
}

define_kind! {
    #[doc = "Status of a [`Vehicle`]."]
    enum Status {
        #[doc = "The [`Vehicle`] is ready to be rented out."]
        Available = 1,

        #[doc = "The [`Vehicle`] is reserved for an upcoming rental."]
        Reserved = 2,

        #[doc = "The [`Vehicle`] is out with a customer."]
        Rented = 3,

        #[doc = "The [`Vehicle`] is undergoing maintenance."]
        Maintenance = 4,

        #[doc = "The [`Vehicle`] is damaged and awaiting repair."]
        Damaged = 5,

        #[doc = "The [`Vehicle`] is withdrawn from the fleet temporarily."]
        Inactive = 6,

        #[doc = "The [`Vehicle`] is sold. Terminal."]
        Sold = 7,
    }
}

impl Status {
    /// Returns the [`Status`]es this [`Status`] may transition into.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        use Status as S;

        match self {
            S::Available => {
                &[S::Reserved, S::Maintenance, S::Damaged, S::Inactive, S::Sold]
            }
            S::Reserved => &[S::Rented, S::Available],
            S::Rented => &[S::Available, S::Damaged],
            S::Maintenance | S::Damaged => &[S::Available],
            S::Inactive => &[S::Available, S::Sold],
            S::Sold => &[],
        }
    }

    /// Indicates whether this [`Status`] may transition into the `to` one.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        self.allowed_transitions().contains(&to)
    }
}

/// Error of an illegal [`Vehicle`] [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Vehicle` cannot transition from `{from}` to `{to}` status")]
pub struct TransitionError {
    /// [`Status`] the [`Vehicle`] is in.
    pub from: Status,

    /// [`Status`] the transition was requested into.
    pub to: Status,
}

/// Error of reassigning a non-[`Status::Available`] [`Vehicle`] to another
/// branch.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Vehicle` in `{status}` status cannot change its branch")]
pub struct BranchChangeError {
    /// [`Status`] the [`Vehicle`] is in.
    pub status: Status,
}

/// Error of recording an odometer reading lower than the current one.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display(
    "odometer reading {provided} km is below the recorded {current} km"
)]
pub struct OdometerError {
    /// Currently recorded odometer reading.
    pub current: Kilometers,

    /// Rejected new reading.
    pub provided: Kilometers,
}

/// [`DateTime`] when a [`Vehicle`] was created.
pub type CreationDateTime = DateTimeOf<(Vehicle, unit::Creation)>;
