//! [`Command`] for issuing a monthly leasing [`Invoice`].

use common::operations::{By, Insert, Select};
use derive_more::{Display, Error, From};
use time::Date;
use tracerr::Traced;

use crate::{
    domain::{
        category, contract,
        leasing::{Invoice, KmRecord, Period},
        pricing::{Campaign, TermDiscount},
        rental, CustomerContract,
    },
    infra::{database, Database},
    pricing::{discount, LeasingQuote, Source},
    Service,
};

use super::Command;

/// [`Command`] for issuing the [`Invoice`] of a contract's captured
/// [`Period`].
///
/// Bills the period's scheduled net amount (the contract's term total with
/// its term discounts and campaigns taken off, split per month with the
/// last month absorbing the rounding residue) plus the period's excess-km
/// charge.
#[derive(Clone, Copy, Debug)]
pub struct IssueLeasingInvoice {
    /// ID of the [`CustomerContract`] to bill.
    pub contract_id: contract::Id,

    /// Calendar [`Period`] to bill.
    pub period: Period,
}

impl<Db> Command<IssueLeasingInvoice> for Service<Db>
where
    Db: Database<
            Select<By<Option<CustomerContract>, contract::Id>>,
            Ok = Option<CustomerContract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<KmRecord>, (contract::Id, Period)>>,
            Ok = Option<KmRecord>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<TermDiscount>, category::Id>>,
            Ok = Vec<TermDiscount>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Campaign>, Date>>,
            Ok = Vec<Campaign>,
            Err = Traced<database::Error>,
        > + Database<Insert<Invoice>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Invoice;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        IssueLeasingInvoice { contract_id, period }: IssueLeasingInvoice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let contract = self
            .database()
            .execute(Select(By::<Option<CustomerContract>, _>::new(
                contract_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        let Some(offset) = period
            .months_since(Period::of(contract.starts_on))
            .filter(|m| *m < contract.term_months)
        else {
            return Err(tracerr::new!(E::PeriodOutsideTerm(period)));
        };

        let record = self
            .database()
            .execute(Select(By::<Option<KmRecord>, _>::new((
                contract_id,
                period,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PeriodNotRecorded(period))
            .map_err(tracerr::wrap!())?;

        // The monthly net repeats the quoted composition, so invoices agree
        // with what the customer was quoted.
        let term_discounts = self
            .database()
            .execute(Select(By::<Vec<TermDiscount>, _>::new(
                contract.category_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let best_term_discount = TermDiscount::best_for(
            &term_discounts,
            contract.category_id,
            contract.term_months,
        );
        let campaigns = self
            .database()
            .execute(Select(By::<Vec<Campaign>, _>::new(contract.starts_on)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .filter(|c| {
                c.applies_to(
                    rental::Kind::Leasing,
                    contract.category_id,
                    contract.starts_on,
                    contract.term_months,
                )
            })
            .collect::<Vec<_>>();

        let base_total = contract.monthly_price * contract.term_months;
        let quote = LeasingQuote::new(
            contract.term_months,
            base_total,
            discount::compose(base_total, best_term_discount, &campaigns),
            contract.included_km_per_month,
            Source::CustomerContract,
        );
        let base_amount = quote.monthly_schedule()[offset as usize];

        let invoice = Invoice::issue(
            contract_id,
            period,
            base_amount,
            contract.extra_km_price * record.excess_km,
        );
        self.database()
            .execute(Insert(invoice.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(invoice)
    }
}

/// Error of [`IssueLeasingInvoice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`CustomerContract`] with the provided ID does not exist.
    #[display("`CustomerContract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// Provided [`Period`] falls outside the contract's term.
    #[display("period `{_0}` falls outside the contract's term")]
    PeriodOutsideTerm(#[error(not(source))] Period),

    /// No [`KmRecord`] is captured for the provided [`Period`] yet.
    #[display("no `KmRecord` is captured for period `{_0}` yet")]
    PeriodNotRecorded(#[error(not(source))] Period),
}
