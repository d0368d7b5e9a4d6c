//! [`Query`] collection related to [`Vehicle`]s.

use common::operations::By;

use crate::domain::{category, vehicle, Category, Vehicle};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Vehicle`] by its [`vehicle::Id`].
pub type ById = DatabaseQuery<By<Option<Vehicle>, vehicle::Id>>;

/// Queries a [`Category`] by its [`category::Id`].
pub type CategoryById = DatabaseQuery<By<Option<Category>, category::Id>>;
