//! [`Query`] collection related to [`CustomerContract`]s.

use common::operations::By;
use time::Date;

use crate::{
    domain::{category, contract, customer, CustomerContract},
    read::contract::Active,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`CustomerContract`] by its [`contract::Id`].
pub type ById = DatabaseQuery<By<Option<CustomerContract>, contract::Id>>;

/// Queries the active [`CustomerContract`] of a customer for a category on
/// a [`Date`].
pub type ActiveFor = DatabaseQuery<
    By<Option<Active<CustomerContract>>, (customer::Id, category::Id, Date)>,
>;
