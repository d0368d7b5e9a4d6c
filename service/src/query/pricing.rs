//! [`Query`] collection related to the pricing catalogue.

use common::operations::By;
use time::Date;

use crate::{
    domain::{
        category,
        pricing::{Campaign, KmPackage, LeasingPlan, PricingRule, TermDiscount},
        rental,
    },
    read::pricing::Applicable,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries the [`PricingRule`]s scoped to a category.
pub type RulesByCategory =
    DatabaseQuery<By<Vec<PricingRule>, category::Id>>;

/// Queries the [`TermDiscount`]s applicable to a category (category-scoped
/// plus global ones).
pub type TermDiscountsByCategory =
    DatabaseQuery<By<Vec<TermDiscount>, category::Id>>;

/// Queries the active [`Campaign`]s valid on a [`Date`].
pub type CampaignsOn = DatabaseQuery<By<Vec<Campaign>, Date>>;

/// Queries the [`LeasingPlan`] applicable to a category, term and [`Date`].
pub type ApplicablePlan = DatabaseQuery<
    By<Option<Applicable<LeasingPlan>>, (category::Id, u32, Date)>,
>;

/// Queries the [`KmPackage`] applicable to a [`rental::Kind`].
pub type ApplicableKmPackage =
    DatabaseQuery<By<Option<Applicable<KmPackage>>, rental::Kind>>;
