//! [`CustomerContract`] definitions.

use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
use time::Date;
use uuid::Uuid;

use crate::domain::{category, customer, vehicle::Kilometers};
#[cfg(doc)]
use common::DateTime;

/// Negotiated leasing terms between a customer and the agency.
///
/// A [`CustomerContract`] is the strongest price source of the resolution
/// chain: when one is active for the customer, category and date, its
/// negotiated monthly price wins over any plan, rule or default.
///
/// Only one contract is expected to be active per customer, category and
/// date. The engine relies on its host's lookups to uphold that and does not
/// enforce it itself.
#[derive(Clone, Debug)]
pub struct CustomerContract {
    /// ID of this [`CustomerContract`].
    pub id: Id,

    /// ID of the customer this [`CustomerContract`] is negotiated with.
    pub customer_id: customer::Id,

    /// ID of the [`category::Category`] this [`CustomerContract`] covers.
    pub category_id: category::Id,

    /// Negotiated monthly price.
    pub monthly_price: Money,

    /// Kilometers included per month before extra-km charges apply.
    pub included_km_per_month: Kilometers,

    /// Price of every kilometer driven beyond the monthly allowance.
    pub extra_km_price: Money,

    /// Agreed term of this [`CustomerContract`], in months.
    pub term_months: u32,

    /// First day this [`CustomerContract`] covers.
    pub starts_on: Date,

    /// Last day this [`CustomerContract`] covers.
    pub ends_on: Date,

    /// [`Status`] of this [`CustomerContract`].
    pub status: Status,

    /// [`DateTime`] when this [`CustomerContract`] was created.
    pub created_at: CreationDateTime,
}

impl CustomerContract {
    /// Activates this [`CustomerContract`].
    ///
    /// # Errors
    ///
    /// If this [`CustomerContract`] is neither a [`Status::Draft`] nor
    /// [`Status::Suspended`].
    pub fn activate(&mut self) -> Result<(), TransitionError> {
        self.transition(Status::Active)
    }

    /// Suspends this [`CustomerContract`].
    ///
    /// # Errors
    ///
    /// If this [`CustomerContract`] is not [`Status::Active`].
    pub fn suspend(&mut self) -> Result<(), TransitionError> {
        self.transition(Status::Suspended)
    }

    /// Terminates this [`CustomerContract`] before its agreed end.
    ///
    /// # Errors
    ///
    /// If this [`CustomerContract`] is already settled.
    pub fn terminate(&mut self) -> Result<(), TransitionError> {
        self.transition(Status::Terminated)
    }

    /// Completes this [`CustomerContract`] once its term is served in full.
    ///
    /// # Errors
    ///
    /// If this [`CustomerContract`] is not [`Status::Active`].
    pub fn complete(&mut self) -> Result<(), TransitionError> {
        self.transition(Status::Completed)
    }

    /// Indicates whether this [`CustomerContract`] is active and covers the
    /// provided [`Date`].
    #[must_use]
    pub fn is_active_on(&self, date: Date) -> bool {
        self.status == Status::Active
            && self.starts_on <= date
            && date <= self.ends_on
    }

    /// Transitions this [`CustomerContract`] into the provided [`Status`].
    fn transition(&mut self, to: Status) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(TransitionError {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// ID of a [`CustomerContract`].
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

define_kind! {
    #[doc = "Status of a [`CustomerContract`]."]
    enum Status {
        #[doc = "The [`CustomerContract`] is negotiated but not in force."]
        Draft = 1,

        #[doc = "The [`CustomerContract`] is in force."]
        Active = 2,

        #[doc = "The [`CustomerContract`] is paused (e.g. payment dispute)."]
        Suspended = 3,

        #[doc = "The [`CustomerContract`] ended before its term. Terminal."]
        Terminated = 4,

        #[doc = "The [`CustomerContract`] served its full term. Terminal."]
        Completed = 5,
    }
}

impl Status {
    /// Returns the [`Status`]es this [`Status`] may transition into.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        use Status as S;

        match self {
            S::Draft => &[S::Active, S::Terminated],
            S::Active => &[S::Suspended, S::Terminated, S::Completed],
            S::Suspended => &[S::Active, S::Terminated],
            S::Terminated | S::Completed => &[],
        }
    }

    /// Indicates whether this [`Status`] may transition into the `to` one.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        self.allowed_transitions().contains(&to)
    }
}

/// Error of an illegal [`CustomerContract`] [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`CustomerContract` cannot transition from `{from}` to `{to}` status")]
pub struct TransitionError {
    /// [`Status`] the [`CustomerContract`] is in.
    pub from: Status,

    /// [`Status`] the transition was requested into.
    pub to: Status,
}

/// [`DateTime`] when a [`CustomerContract`] was created.
pub type CreationDateTime = DateTimeOf<(CustomerContract, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{Currency, Money};
    use time::macros::date;

    use super::{
        category, customer, CreationDateTime, CustomerContract, Id, Status,
    };

    fn contract(status: Status) -> CustomerContract {
        CustomerContract {
            id: Id::new(),
            customer_id: customer::Id::new(),
            category_id: category::Id::new(),
            monthly_price: Money::new("12000".parse().unwrap(), Currency::Try),
            included_km_per_month: 2_000,
            extra_km_price: Money::new("1.5".parse().unwrap(), Currency::Try),
            term_months: 24,
            starts_on: date!(2025 - 01 - 01),
            ends_on: date!(2026 - 12 - 31),
            status,
            created_at: CreationDateTime::now(),
        }
    }

    #[test]
    fn suspension_roundtrip() {
        let mut c = contract(Status::Draft);
        c.activate().unwrap();
        c.suspend().unwrap();
        c.activate().unwrap();
        c.complete().unwrap();
        assert_eq!(c.status, Status::Completed);
    }

    #[test]
    fn settled_contract_admits_nothing() {
        let mut c = contract(Status::Completed);
        assert!(c.activate().is_err());
        assert!(c.terminate().is_err());

        let mut c = contract(Status::Terminated);
        assert!(c.activate().is_err());
    }

    #[test]
    fn suspended_contract_cannot_complete() {
        let mut c = contract(Status::Suspended);
        let err = c.complete().unwrap_err();
        assert_eq!(err.from, Status::Suspended);
        assert_eq!(err.to, Status::Completed);
    }

    #[test]
    fn activity_requires_status_and_date_coverage() {
        let c = contract(Status::Active);
        assert!(c.is_active_on(date!(2025 - 06 - 15)));
        assert!(c.is_active_on(date!(2025 - 01 - 01)));
        assert!(c.is_active_on(date!(2026 - 12 - 31)));
        assert!(!c.is_active_on(date!(2027 - 01 - 01)));

        let c = contract(Status::Suspended);
        assert!(!c.is_active_on(date!(2025 - 06 - 15)));
    }
}
