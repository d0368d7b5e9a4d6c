//! [`Query`] collection related to [`Rental`]s.

use common::operations::By;
use time::Date;

use crate::{
    domain::{rental, Rental},
    read::rental::Overdue,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Rental`] by its [`rental::Id`].
pub type ById = DatabaseQuery<By<Option<Rental>, rental::Id>>;

/// Queries the active [`Rental`]s past their return date as of the provided
/// [`Date`].
pub type OverdueAsOf = DatabaseQuery<By<Vec<Overdue<Rental>>, Date>>;
