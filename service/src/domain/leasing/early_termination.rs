//! [`EarlyTermination`] definitions.

use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
use uuid::Uuid;

use crate::domain::contract;
#[cfg(doc)]
use common::DateTime;

/// Request to end a leasing contract before its agreed term.
///
/// At most one open (not yet rejected or completed) [`EarlyTermination`] may
/// exist per contract; issuing a second one is a conflict.
#[derive(Clone, Debug)]
pub struct EarlyTermination {
    /// ID of this [`EarlyTermination`].
    pub id: Id,

    /// ID of the [`contract::CustomerContract`] to terminate.
    pub contract_id: contract::Id,

    /// Customer-stated reason of this [`EarlyTermination`], if any.
    pub reason: Option<String>,

    /// Penalty agreed at approval, if any.
    pub penalty: Option<Money>,

    /// [`Status`] of this [`EarlyTermination`].
    pub status: Status,

    /// [`DateTime`] when this [`EarlyTermination`] was requested.
    pub requested_at: RequestDateTime,
}

impl EarlyTermination {
    /// Creates a new [`EarlyTermination`] in the [`Status::Requested`]
    /// status.
    #[must_use]
    pub fn request(
        contract_id: contract::Id,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: Id::new(),
            contract_id,
            reason,
            penalty: None,
            status: Status::Requested,
            requested_at: RequestDateTime::now(),
        }
    }

    /// Approves this [`EarlyTermination`], fixing the agreed penalty.
    ///
    /// # Errors
    ///
    /// If this [`EarlyTermination`] is not [`Status::Requested`].
    pub fn approve(
        &mut self,
        penalty: Option<Money>,
    ) -> Result<(), TransitionError> {
        self.transition(Status::Approved)?;
        self.penalty = penalty;
        Ok(())
    }

    /// Rejects this [`EarlyTermination`].
    ///
    /// # Errors
    ///
    /// If this [`EarlyTermination`] is not [`Status::Requested`].
    pub fn reject(&mut self) -> Result<(), TransitionError> {
        self.transition(Status::Rejected)
    }

    /// Completes this [`EarlyTermination`] once the contract is wound down.
    ///
    /// # Errors
    ///
    /// If this [`EarlyTermination`] is not [`Status::Approved`].
    pub fn complete(&mut self) -> Result<(), TransitionError> {
        self.transition(Status::Completed)
    }

    /// Indicates whether this [`EarlyTermination`] is still open, blocking
    /// further requests on the same contract.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.status, Status::Requested | Status::Approved)
    }

    /// Transitions this [`EarlyTermination`] into the provided [`Status`].
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

/// ID of an [`EarlyTermination`].
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
    #[doc = "Status of an [`EarlyTermination`]."]
    enum Status {
        #[doc = "The [`EarlyTermination`] awaits the agency's decision."]
        Requested = 1,

        #[doc = "The [`EarlyTermination`] is approved, wind-down pending."]
        Approved = 2,

        #[doc = "The [`EarlyTermination`] is rejected. Terminal."]
        Rejected = 3,

        #[doc = "The contract is wound down. Terminal."]
        Completed = 4,
    }
}

impl Status {
    /// Returns the [`Status`]es this [`Status`] may transition into.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        use Status as S;

        match self {
            S::Requested => &[S::Approved, S::Rejected],
            S::Approved => &[S::Completed],
            S::Rejected | S::Completed => &[],
        }
    }

    /// Indicates whether this [`Status`] may transition into the `to` one.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        self.allowed_transitions().contains(&to)
    }
}

/// Error of an illegal [`EarlyTermination`] [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display(
    "`EarlyTermination` cannot transition from `{from}` to `{to}` status"
)]
pub struct TransitionError {
    /// [`Status`] the [`EarlyTermination`] is in.
    pub from: Status,

    /// [`Status`] the transition was requested into.
    pub to: Status,
}

/// [`DateTime`] when an [`EarlyTermination`] was requested.
pub type RequestDateTime = DateTimeOf<(EarlyTermination, unit::Creation)>;
