//! [`Command`] for capturing a monthly leasing [`KmRecord`].

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        contract,
        leasing::{km_record, KmRecord, Period},
        vehicle::Kilometers,
        CustomerContract,
    },
    infra::{database, Database},
    read::leasing::Latest,
    Service,
};

use super::Command;

/// [`Command`] for capturing a leased vehicle's odometer for a calendar
/// [`Period`].
///
/// One capture per contract per period: a duplicate is a conflict. Unused
/// allowance of the previous capture rolls into this one.
#[derive(Clone, Copy, Debug)]
pub struct RecordLeasingKm {
    /// ID of the [`CustomerContract`] to capture for.
    pub contract_id: contract::Id,

    /// Calendar [`Period`] being captured.
    pub period: Period,

    /// Odometer reading at the end of the period.
    pub current_odometer_km: Kilometers,

    /// Odometer reading at contract start.
    ///
    /// Only consulted for the very first capture of a contract, when there
    /// is no previous [`KmRecord`] to read the baseline from.
    pub baseline_odometer_km: Option<Kilometers>,
}

impl<Db> Command<RecordLeasingKm> for Service<Db>
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
            Select<By<Option<KmRecord>, (contract::Id, Period)>>,
            Ok = Option<KmRecord>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Latest<KmRecord>>, contract::Id>>,
            Ok = Option<Latest<KmRecord>>,
            Err = Traced<database::Error>,
        > + Database<Insert<KmRecord>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = KmRecord;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordLeasingKm,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordLeasingKm {
            contract_id,
            period,
            current_odometer_km,
            baseline_odometer_km,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent captures racing into a duplicate period.
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

        if tx
            .execute(Select(By::<Option<KmRecord>, _>::new((
                contract_id,
                period,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some()
        {
            return Err(tracerr::new!(E::PeriodAlreadyRecorded(period)));
        }

        let latest = tx
            .execute(Select(By::<Option<Latest<KmRecord>>, _>::new(
                contract_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let (previous_odometer_km, rollover_in_km) = match latest {
            Some(Latest(r)) => (r.current_odometer_km, r.rollover_out_km),
            None => (
                baseline_odometer_km
                    .ok_or(E::MissingBaseline)
                    .map_err(tracerr::wrap!())?,
                0,
            ),
        };

        let record = KmRecord::capture(
            contract_id,
            period,
            previous_odometer_km,
            current_odometer_km,
            contract.included_km_per_month,
            rollover_in_km,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Insert(record.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(record)
    }
}

/// Error of [`RecordLeasingKm`] [`Command`] execution.
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
    #[display("`CustomerContract` in `{_0}` status cannot capture km")]
    ContractNotActive(#[error(not(source))] contract::Status),

    /// A [`KmRecord`] for the provided [`Period`] exists already.
    #[display("`KmRecord` for period `{_0}` exists already")]
    PeriodAlreadyRecorded(#[error(not(source))] Period),

    /// First capture of a contract needs a baseline odometer reading.
    #[display("first capture requires a baseline odometer reading")]
    MissingBaseline,

    /// Provided odometer reading regresses the previous capture.
    #[display("{_0}")]
    #[from]
    Odometer(km_record::CaptureError),
}
