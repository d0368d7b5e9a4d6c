//! Leasing [`Invoice`] definitions.

use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
use uuid::Uuid;

use crate::domain::{contract, leasing::Period};
#[cfg(doc)]
use common::DateTime;

/// Monthly invoice of a leasing contract.
///
/// Carries the monthly net price plus the period's excess-km charge.
/// Amounts are fixed at issue time and never recomputed.
#[derive(Clone, Debug)]
pub struct Invoice {
    /// ID of this [`Invoice`].
    pub id: Id,

    /// ID of the [`contract::CustomerContract`] this [`Invoice`] bills.
    pub contract_id: contract::Id,

    /// Calendar [`Period`] this [`Invoice`] covers.
    pub period: Period,

    /// Monthly net price of the contract.
    pub base_amount: Money,

    /// Charge for the kilometers driven beyond the period's allowance.
    pub extra_km_amount: Money,

    /// Total billed amount.
    pub total_amount: Money,

    /// [`Status`] of this [`Invoice`].
    pub status: Status,

    /// [`DateTime`] when this [`Invoice`] was issued.
    pub issued_at: IssueDateTime,
}

impl Invoice {
    /// Issues a new [`Invoice`] in the [`Status::Draft`] status.
    #[must_use]
    pub fn issue(
        contract_id: contract::Id,
        period: Period,
        base_amount: Money,
        extra_km_amount: Money,
    ) -> Self {
        Self {
            id: Id::new(),
            contract_id,
            period,
            base_amount,
            extra_km_amount,
            total_amount: base_amount + extra_km_amount,
            status: Status::Draft,
            issued_at: IssueDateTime::now(),
        }
    }

    /// Sends this [`Invoice`] to the customer.
    ///
    /// # Errors
    ///
    /// If this [`Invoice`] is not a [`Status::Draft`].
    pub fn send(&mut self) -> Result<(), TransitionError> {
        self.transition(Status::Sent)
    }

    /// Marks this [`Invoice`] as paid.
    ///
    /// # Errors
    ///
    /// If this [`Invoice`] is not [`Status::Sent`].
    pub fn pay(&mut self) -> Result<(), TransitionError> {
        self.transition(Status::Paid)
    }

    /// Cancels this [`Invoice`].
    ///
    /// # Errors
    ///
    /// If this [`Invoice`] is already paid or cancelled.
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.transition(Status::Cancelled)
    }

    /// Transitions this [`Invoice`] into the provided [`Status`].
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

/// ID of an [`Invoice`].
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
    #[doc = "Status of an [`Invoice`]."]
    enum Status {
        #[doc = "The [`Invoice`] is issued but not sent yet."]
        Draft = 1,

        #[doc = "The [`Invoice`] is sent to the customer."]
        Sent = 2,

        #[doc = "The [`Invoice`] is paid. Terminal."]
        Paid = 3,

        #[doc = "The [`Invoice`] is cancelled. Terminal."]
        Cancelled = 4,
    }
}

impl Status {
    /// Returns the [`Status`]es this [`Status`] may transition into.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        use Status as S;

        match self {
            S::Draft => &[S::Sent, S::Cancelled],
            S::Sent => &[S::Paid, S::Cancelled],
            S::Paid | S::Cancelled => &[],
        }
    }

    /// Indicates whether this [`Status`] may transition into the `to` one.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        self.allowed_transitions().contains(&to)
    }
}

/// Error of an illegal [`Invoice`] [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Invoice` cannot transition from `{from}` to `{to}` status")]
pub struct TransitionError {
    /// [`Status`] the [`Invoice`] is in.
    pub from: Status,

    /// [`Status`] the transition was requested into.
    pub to: Status,
}

/// [`DateTime`] when an [`Invoice`] was issued.
pub type IssueDateTime = DateTimeOf<(Invoice, unit::Creation)>;
