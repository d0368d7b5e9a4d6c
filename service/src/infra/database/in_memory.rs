//! In-memory [`Database`] backend.
//!
//! Backs tests and embedded use. All state lives under one [`Mutex`], so
//! operations are atomic individually, but a "transaction" is just the same
//! handle: there is no isolation and [`Commit`] is a no-op. Commands still
//! drive it through the same operation vocabulary they'd drive a real
//! backend with.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use common::operations::{By, Commit, Insert, Lock, Select, Transact, Update};
use derive_more::{Display, Error as StdError};
use time::Date;
use tracerr::Traced;

use crate::{
    domain::{
        category,
        contract, customer,
        leasing::{
            early_termination, invoice, EarlyTermination, Invoice, KmRecord,
            Period,
        },
        pricing::{
            Campaign, KmPackage, LeasingPlan, PricingRule, TermDiscount,
        },
        rental, vehicle, Category, CustomerContract, Rental, Vehicle,
    },
    infra::database,
    read::{
        contract::Active, leasing::Latest, leasing::Open,
        pricing::Applicable, rental::Overdue,
    },
};

use super::Database;

/// In-memory [`Database`] backend.
///
/// Cheap to clone: clones share the same storage.
#[derive(Clone, Debug, Default)]
pub struct InMemory(Arc<Mutex<State>>);

/// Storage of an [`InMemory`] database.
#[derive(Debug, Default)]
struct State {
    vehicles: HashMap<vehicle::Id, Vehicle>,
    categories: HashMap<category::Id, Category>,
    rentals: HashMap<rental::Id, Rental>,
    contracts: HashMap<contract::Id, CustomerContract>,
    plans: Vec<LeasingPlan>,
    rules: Vec<PricingRule>,
    term_discounts: Vec<TermDiscount>,
    campaigns: Vec<Campaign>,
    km_packages: Vec<KmPackage>,
    km_records: HashMap<(contract::Id, Period), KmRecord>,
    invoices: HashMap<invoice::Id, Invoice>,
    early_terminations: HashMap<early_termination::Id, EarlyTermination>,
}

impl InMemory {
    /// Runs the provided closure under the storage lock.
    fn with<R>(
        &self,
        f: impl FnOnce(&mut State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let mut state = self
            .0
            .lock()
            .map_err(|_| tracerr::new!(database::Error::from(Error::Poisoned)))?;
        Ok(f(&mut state))
    }
}

/// [`InMemory`] error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Storage lock is poisoned by a panicked holder.
    #[display("storage lock is poisoned")]
    Poisoned,
}

impl Database<Transact> for InMemory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Rental, rental::Id>>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Rental, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Row locks are meaningless under one global lock.
        Ok(())
    }
}

impl Database<Lock<By<CustomerContract, contract::Id>>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<CustomerContract, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

/// Implements keyed [`Insert`]/[`Update`]/[`Select`]-by-id operations for
/// an entity stored in a [`HashMap`] field of the [`State`].
macro_rules! impl_keyed {
    ($entity:ty, $id:ty, $field:ident) => {
        impl Database<Insert<$entity>> for InMemory {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Insert(value): Insert<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                self.with(|s| {
                    _ = s.$field.insert(value.id, value);
                })
            }
        }

        impl Database<Update<$entity>> for InMemory {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Update(value): Update<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                self.with(|s| {
                    _ = s.$field.insert(value.id, value);
                })
            }
        }

        impl Database<Select<By<Option<$entity>, $id>>> for InMemory {
            type Ok = Option<$entity>;
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Option<$entity>, $id>>,
            ) -> Result<Self::Ok, Self::Err> {
                self.with(|s| s.$field.get(&by.into_inner()).cloned())
            }
        }
    };
}

/// Implements the [`Insert`] operation for a catalogue entity stored in a
/// [`Vec`] field of the [`State`].
macro_rules! impl_catalogue_insert {
    ($entity:ty, $field:ident) => {
        impl Database<Insert<$entity>> for InMemory {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Insert(value): Insert<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                self.with(|s| s.$field.push(value))
            }
        }
    };
}

impl_keyed!(Vehicle, vehicle::Id, vehicles);
impl_keyed!(Category, category::Id, categories);
impl_keyed!(Rental, rental::Id, rentals);
impl_keyed!(CustomerContract, contract::Id, contracts);
impl_keyed!(Invoice, invoice::Id, invoices);
impl_keyed!(EarlyTermination, early_termination::Id, early_terminations);

impl_catalogue_insert!(LeasingPlan, plans);
impl_catalogue_insert!(PricingRule, rules);
impl_catalogue_insert!(TermDiscount, term_discounts);
impl_catalogue_insert!(Campaign, campaigns);
impl_catalogue_insert!(KmPackage, km_packages);

impl
    Database<
        Select<
            By<
                Option<Active<CustomerContract>>,
                (customer::Id, category::Id, Date),
            >,
        >,
    > for InMemory
{
    type Ok = Option<Active<CustomerContract>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<
                Option<Active<CustomerContract>>,
                (customer::Id, category::Id, Date),
            >,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (customer_id, category_id, on) = by.into_inner();
        self.with(|s| {
            s.contracts
                .values()
                .find(|c| {
                    c.customer_id == customer_id
                        && c.category_id == category_id
                        && c.is_active_on(on)
                })
                .cloned()
                .map(Active)
        })
    }
}

impl
    Database<
        Select<By<Option<Applicable<LeasingPlan>>, (category::Id, u32, Date)>>,
    > for InMemory
{
    type Ok = Option<Applicable<LeasingPlan>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<Applicable<LeasingPlan>>, (category::Id, u32, Date)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (category_id, term_months, on) = by.into_inner();
        self.with(|s| {
            s.plans
                .iter()
                .find(|p| p.is_applicable(category_id, term_months, on))
                .cloned()
                .map(Applicable)
        })
    }
}

impl Database<Select<By<Vec<PricingRule>, category::Id>>> for InMemory {
    type Ok = Vec<PricingRule>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<PricingRule>, category::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let category_id = by.into_inner();
        self.with(|s| {
            s.rules
                .iter()
                .filter(|r| r.category_id == category_id)
                .cloned()
                .collect()
        })
    }
}

impl Database<Select<By<Vec<TermDiscount>, category::Id>>> for InMemory {
    type Ok = Vec<TermDiscount>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<TermDiscount>, category::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let category_id = by.into_inner();
        self.with(|s| {
            s.term_discounts
                .iter()
                .filter(|d| {
                    d.category_id.is_none_or(|id| id == category_id)
                })
                .cloned()
                .collect()
        })
    }
}

impl Database<Select<By<Vec<Campaign>, Date>>> for InMemory {
    type Ok = Vec<Campaign>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Campaign>, Date>>,
    ) -> Result<Self::Ok, Self::Err> {
        let on = by.into_inner();
        self.with(|s| {
            s.campaigns
                .iter()
                .filter(|c| c.active && c.valid_from <= on && on <= c.valid_to)
                .cloned()
                .collect()
        })
    }
}

impl Database<Select<By<Option<Applicable<KmPackage>>, rental::Kind>>>
    for InMemory
{
    type Ok = Option<Applicable<KmPackage>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Applicable<KmPackage>>, rental::Kind>>,
    ) -> Result<Self::Ok, Self::Err> {
        let kind = by.into_inner();
        self.with(|s| {
            s.km_packages
                .iter()
                .find(|p| p.is_applicable_for(kind))
                .cloned()
                .map(Applicable)
        })
    }
}

impl Database<Insert<KmRecord>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(record): Insert<KmRecord>,
    ) -> Result<Self::Ok, Self::Err> {
        self.with(|s| {
            _ = s
                .km_records
                .insert((record.contract_id, record.period), record);
        })
    }
}

impl Database<Select<By<Option<KmRecord>, (contract::Id, Period)>>>
    for InMemory
{
    type Ok = Option<KmRecord>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<KmRecord>, (contract::Id, Period)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        self.with(|s| s.km_records.get(&key).cloned())
    }
}

impl Database<Select<By<Option<Latest<KmRecord>>, contract::Id>>>
    for InMemory
{
    type Ok = Option<Latest<KmRecord>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Latest<KmRecord>>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let contract_id = by.into_inner();
        self.with(|s| {
            s.km_records
                .values()
                .filter(|r| r.contract_id == contract_id)
                .max_by_key(|r| r.period)
                .cloned()
                .map(Latest)
        })
    }
}

impl Database<Select<By<Option<Open<EarlyTermination>>, contract::Id>>>
    for InMemory
{
    type Ok = Option<Open<EarlyTermination>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Open<EarlyTermination>>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let contract_id = by.into_inner();
        self.with(|s| {
            s.early_terminations
                .values()
                .find(|t| t.contract_id == contract_id && t.is_open())
                .cloned()
                .map(Open)
        })
    }
}

impl Database<Select<By<Vec<Overdue<Rental>>, Date>>> for InMemory {
    type Ok = Vec<Overdue<Rental>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Overdue<Rental>>, Date>>,
    ) -> Result<Self::Ok, Self::Err> {
        let today = by.into_inner();
        self.with(|s| {
            s.rentals
                .values()
                .filter(|r| {
                    r.status == rental::Status::Active && r.ends_on < today
                })
                .cloned()
                .map(Overdue)
                .collect()
        })
    }
}
