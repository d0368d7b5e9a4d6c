//! [`Command`] for requesting an [`EarlyTermination`].

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        contract,
        leasing::{early_termination, EarlyTermination},
        CustomerContract,
    },
    infra::{database, Database},
    read::leasing::Open,
    Service,
};

use super::Command;

/// [`Command`] for requesting the [`EarlyTermination`] of a leasing
/// contract.
///
/// At most one open request may exist per contract; a second one is a
/// conflict.
#[derive(Clone, Debug)]
pub struct RequestEarlyTermination {
    /// ID of the [`CustomerContract`] to terminate.
    pub contract_id: contract::Id,

    /// Customer-stated reason, if any.
    pub reason: Option<String>,
}

impl<Db> Command<RequestEarlyTermination> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<CustomerContract, contract::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<CustomerContract>, contract::Id>>,
            Ok = Option<CustomerContract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Open<EarlyTermination>>, contract::Id>>,
            Ok = Option<Open<EarlyTermination>>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<EarlyTermination>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = EarlyTermination;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        RequestEarlyTermination { contract_id, reason }: RequestEarlyTermination,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid two open requests racing in on the same contract.
        tx.execute(Lock(By::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let contract = tx
            .execute(Select(By::<Option<CustomerContract>, _>::new(
                contract_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;
        if contract.status != contract::Status::Active {
            return Err(tracerr::new!(E::ContractNotActive(contract.status)));
        }

        if let Some(Open(existing)) = tx
            .execute(Select(By::<Option<Open<EarlyTermination>>, _>::new(
                contract_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::AlreadyRequested(existing.id)));
        }

        let request = EarlyTermination::request(contract_id, reason);
        tx.execute(Insert(request.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(request)
    }
}

/// Error of [`RequestEarlyTermination`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`CustomerContract`] with the provided ID does not exist.
    #[display("`CustomerContract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`CustomerContract`] is not in force.
    #[display("`CustomerContract` in `{_0}` status cannot be terminated")]
    ContractNotActive(#[error(not(source))] contract::Status),

    /// An open [`EarlyTermination`] exists for the contract already.
    #[display("open `EarlyTermination(id: {_0})` exists already")]
    AlreadyRequested(#[error(not(source))] early_termination::Id),
}
