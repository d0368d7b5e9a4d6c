//! [`Rental`] definitions.

use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
use time::Date;
use uuid::Uuid;

use crate::domain::{branch, customer, vehicle, vehicle::Kilometers};
#[cfg(doc)]
use common::DateTime;

/// Booking of a [`vehicle::Vehicle`] by a customer for a bounded date range.
///
/// A [`Rental`] is the transactional root of the billing engine: its money
/// fields are fixed at creation from a priced quote and are never recomputed
/// implicitly. The only later mutation of money is [`Rental::complete`]
/// fixing the extra-km charge.
#[derive(Clone, Debug)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// ID of the rented [`vehicle::Vehicle`].
    pub vehicle_id: vehicle::Id,

    /// ID of the renting customer.
    pub customer_id: customer::Id,

    /// ID of the branch the vehicle is picked up at.
    pub pickup_branch_id: branch::Id,

    /// ID of the branch the vehicle is returned to.
    pub return_branch_id: branch::Id,

    /// [`Kind`] of this [`Rental`].
    pub kind: Kind,

    /// First day of this [`Rental`].
    pub starts_on: Date,

    /// Last day of this [`Rental`].
    pub ends_on: Date,

    /// [`Status`] of this [`Rental`].
    pub status: Status,

    /// Odometer reading at activation, if activated.
    pub start_km: Option<Kilometers>,

    /// Odometer reading at completion, if completed.
    pub end_km: Option<Kilometers>,

    /// Daily price this [`Rental`] was quoted at.
    pub daily_price: Money,

    /// Total price this [`Rental`] was quoted at.
    pub total_price: Money,

    /// Discount amount already subtracted from [`total_price`].
    ///
    /// [`total_price`]: Rental::total_price
    pub discount_amount: Money,

    /// Extra-km charge fixed at completion, if completed.
    pub extra_km_charge: Option<Money>,

    /// [`DateTime`] when this [`Rental`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Rental`] was completed, if it was.
    pub completed_at: Option<CompletionDateTime>,

    /// [`DateTime`] when this [`Rental`] was cancelled, if it was.
    pub cancelled_at: Option<CancellationDateTime>,
}

impl Rental {
    /// Reserves this [`Rental`].
    ///
    /// # Errors
    ///
    /// If this [`Rental`] is not a [`Status::Draft`].
    pub fn reserve(&mut self) -> Result<(), TransitionError> {
        self.transition(Status::Reserved)
    }

    /// Activates this [`Rental`], recording the odometer reading at handover.
    ///
    /// # Errors
    ///
    /// If this [`Rental`] is not [`Status::Reserved`].
    pub fn activate(
        &mut self,
        start_km: Kilometers,
    ) -> Result<(), TransitionError> {
        self.transition(Status::Active)?;
        self.start_km = Some(start_km);
        Ok(())
    }

    /// Starts the return of this [`Rental`].
    ///
    /// # Errors
    ///
    /// If this [`Rental`] is neither [`Status::Active`] nor
    /// [`Status::Overdue`].
    pub fn start_return(&mut self) -> Result<(), TransitionError> {
        self.transition(Status::ReturnPending)
    }

    /// Completes this [`Rental`], fixing the extra-km charge.
    ///
    /// The charge must already be computed by the caller (through a km
    /// bundle or package); after completion no price of this [`Rental`] is
    /// ever recomputed.
    ///
    /// # Errors
    ///
    /// - If this [`Rental`] is not [`Status::ReturnPending`].
    /// - If the provided `end_km` is below the odometer reading recorded at
    ///   activation.
    pub fn complete(
        &mut self,
        on: CompletionDateTime,
        end_km: Kilometers,
        extra_km_charge: Money,
    ) -> Result<(), CompletionError> {
        use CompletionError as E;

        if self.status != Status::ReturnPending {
            return Err(E::Transition(TransitionError {
                from: self.status,
                to: Status::Closed,
            }));
        }
        if let Some(start_km) = self.start_km {
            if end_km < start_km {
                return Err(E::OdometerRegression { start_km, end_km });
            }
        }

        self.status = Status::Closed;
        self.end_km = Some(end_km);
        self.extra_km_charge = Some(extra_km_charge);
        self.completed_at = Some(on);
        Ok(())
    }

    /// Cancels this [`Rental`].
    ///
    /// # Errors
    ///
    /// If this [`Rental`] is neither a [`Status::Draft`] nor
    /// [`Status::Reserved`]: a handed-over vehicle cannot be "cancelled",
    /// only returned.
    pub fn cancel(
        &mut self,
        on: CancellationDateTime,
    ) -> Result<(), TransitionError> {
        self.transition(Status::Cancelled)?;
        self.cancelled_at = Some(on);
        Ok(())
    }

    /// Marks this [`Rental`] as overdue.
    ///
    /// # Errors
    ///
    /// If this [`Rental`] is not [`Status::Active`].
    pub fn mark_overdue(&mut self) -> Result<(), TransitionError> {
        self.transition(Status::Overdue)
    }

    /// Transitions this [`Rental`] into the provided [`Status`].
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

    /// Returns the total number of days this [`Rental`] spans, counting both
    /// the first and the last day as rented ones.
    #[must_use]
    pub fn total_days(&self) -> u32 {
        u32::try_from((self.ends_on - self.starts_on).whole_days())
            .unwrap_or(0)
            .saturating_add(1)
    }
}

/// ID of a [`Rental`].
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
    #[doc = "Kind of a [`Rental`], deciding the applicable calculation mode."]
    enum Kind {
        #[doc = "Short rental billed per day."]
        Daily = 1,

        #[doc = "Short rental billed per week with a daily remainder."]
        Weekly = 2,

        #[doc = "Rental billed per calendar month with a daily remainder."]
        Monthly = 3,

        #[doc = "Long-term lease billed monthly under a plan or contract."]
        Leasing = 4,
    }
}

define_kind! {
    #[doc = "Status of a [`Rental`]."]
    enum Status {
        #[doc = "The [`Rental`] is drafted and not confirmed yet."]
        Draft = 1,

        #[doc = "The [`Rental`] is confirmed and a vehicle is reserved."]
        Reserved = 2,

        #[doc = "The vehicle is handed over to the customer."]
        Active = 3,

        #[doc = "The vehicle return is announced but not settled yet."]
        ReturnPending = 4,

        #[doc = "The [`Rental`] is settled. Terminal."]
        Closed = 5,

        #[doc = "The [`Rental`] is cancelled before handover. Terminal."]
        Cancelled = 6,

        #[doc = "The vehicle was not returned by the agreed date."]
        Overdue = 7,
    }
}

impl Status {
    /// Returns the [`Status`]es this [`Status`] may transition into.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        use Status as S;

        match self {
            S::Draft => &[S::Reserved, S::Cancelled],
            S::Reserved => &[S::Active, S::Cancelled],
            S::Active => &[S::ReturnPending, S::Overdue],
            S::Overdue => &[S::ReturnPending],
            S::ReturnPending => &[S::Closed],
            S::Closed | S::Cancelled => &[],
        }
    }

    /// Indicates whether this [`Status`] may transition into the `to` one.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        self.allowed_transitions().contains(&to)
    }
}

/// Error of an illegal [`Rental`] [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Rental` cannot transition from `{from}` to `{to}` status")]
pub struct TransitionError {
    /// [`Status`] the [`Rental`] is in.
    pub from: Status,

    /// [`Status`] the transition was requested into.
    pub to: Status,
}

/// Error of completing a [`Rental`].
#[derive(Clone, Copy, Debug, Display, Error, From)]
pub enum CompletionError {
    /// The [`Rental`] is not awaiting return settlement.
    #[display("{_0}")]
    Transition(TransitionError),

    /// The returned odometer reading is below the handover one.
    #[display(
        "end odometer reading {end_km} km is below the start reading \
         {start_km} km"
    )]
    OdometerRegression {
        /// Odometer reading recorded at activation.
        start_km: Kilometers,

        /// Rejected odometer reading at completion.
        end_km: Kilometers,
    },
}

/// [`DateTime`] when a [`Rental`] was created.
pub type CreationDateTime = DateTimeOf<(Rental, unit::Creation)>;

/// [`DateTime`] when a [`Rental`] was completed.
pub type CompletionDateTime = DateTimeOf<(Rental, unit::Completion)>;

/// [`DateTime`] when a [`Rental`] was cancelled.
pub type CancellationDateTime = DateTimeOf<(Rental, unit::Cancellation)>;

#[cfg(test)]
mod spec {
    use common::{Currency, Money};
    use time::macros::date;

    use super::{
        branch, customer, vehicle, CancellationDateTime, CompletionDateTime,
        CompletionError, CreationDateTime, Id, Kind, Rental, Status,
    };

    fn try_lira(s: &str) -> Money {
        Money::new(s.parse().unwrap(), Currency::Try)
    }

    fn rental(status: Status) -> Rental {
        Rental {
            id: Id::new(),
            vehicle_id: vehicle::Id::new(),
            customer_id: customer::Id::new(),
            pickup_branch_id: branch::Id::new(),
            return_branch_id: branch::Id::new(),
            kind: Kind::Daily,
            starts_on: date!(2025 - 03 - 01),
            ends_on: date!(2025 - 03 - 05),
            status,
            start_km: None,
            end_km: None,
            daily_price: try_lira("1000"),
            total_price: try_lira("5000"),
            discount_amount: try_lira("0"),
            extra_km_charge: None,
            created_at: CreationDateTime::now(),
            completed_at: None,
            cancelled_at: None,
        }
    }

    #[test]
    fn full_lifecycle() {
        let mut r = rental(Status::Draft);
        r.reserve().unwrap();
        r.activate(10_000).unwrap();
        r.start_return().unwrap();
        r.complete(CompletionDateTime::now(), 10_450, try_lira("0"))
            .unwrap();

        assert_eq!(r.status, Status::Closed);
        assert_eq!(r.start_km, Some(10_000));
        assert_eq!(r.end_km, Some(10_450));
        assert_eq!(r.extra_km_charge, Some(try_lira("0")));
        assert!(r.completed_at.is_some());
    }

    #[test]
    fn active_rental_is_not_cancellable_but_returnable() {
        let mut r = rental(Status::Active);

        let err = r.cancel(CancellationDateTime::now()).unwrap_err();
        assert_eq!(err.from, Status::Active);
        assert_eq!(err.to, Status::Cancelled);

        r.start_return().unwrap();
        assert_eq!(r.status, Status::ReturnPending);
    }

    #[test]
    fn overdue_rental_can_only_start_return() {
        let mut r = rental(Status::Active);
        r.mark_overdue().unwrap();
        assert_eq!(r.status, Status::Overdue);

        assert!(r.cancel(CancellationDateTime::now()).is_err());
        r.start_return().unwrap();
        assert_eq!(r.status, Status::ReturnPending);
    }

    #[test]
    fn completion_rejects_odometer_regression() {
        let mut r = rental(Status::Draft);
        r.reserve().unwrap();
        r.activate(10_000).unwrap();
        r.start_return().unwrap();

        let err = r
            .complete(CompletionDateTime::now(), 9_999, try_lira("0"))
            .unwrap_err();
        assert!(matches!(
            err,
            CompletionError::OdometerRegression {
                start_km: 10_000,
                end_km: 9_999,
            },
        ));
        assert_eq!(r.status, Status::ReturnPending);
    }

    #[test]
    fn no_status_reaches_draft_and_terminals_have_no_exits() {
        use Status as S;

        let all = [
            S::Draft,
            S::Reserved,
            S::Active,
            S::ReturnPending,
            S::Closed,
            S::Cancelled,
            S::Overdue,
        ];
        for s in all {
            assert!(
                !s.allowed_transitions().contains(&S::Draft),
                "`{s}` must not transition back into `DRAFT`",
            );
        }
        assert!(S::Closed.allowed_transitions().is_empty());
        assert!(S::Cancelled.allowed_transitions().is_empty());
    }

    #[test]
    fn total_days_is_inclusive() {
        assert_eq!(rental(Status::Draft).total_days(), 5);
    }
}
