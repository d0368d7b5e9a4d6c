//! [`Query`] collection related to leasing billing.

use common::operations::By;

use crate::{
    domain::{
        contract,
        leasing::{invoice, Invoice, KmRecord, Period},
    },
    read::leasing::Latest,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`KmRecord`] of a contract for a [`Period`].
pub type KmRecordFor =
    DatabaseQuery<By<Option<KmRecord>, (contract::Id, Period)>>;

/// Queries the latest [`KmRecord`] of a contract.
pub type LatestKmRecord =
    DatabaseQuery<By<Option<Latest<KmRecord>>, contract::Id>>;

/// Queries an [`Invoice`] by its [`invoice::Id`].
pub type InvoiceById = DatabaseQuery<By<Option<Invoice>, invoice::Id>>;
