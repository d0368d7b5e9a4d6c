//! Rate resolution engine.
//!
//! A quote is priced in three steps: an immutable [`Context`] is built from
//! pre-fetched rows, a [`strategy::Chain`] resolves the base price, and the
//! [`discount`] composer takes the applicable discounts off it. The engine
//! is pure: every lookup happens before it runs, so the same inputs always
//! price the same.

pub mod calendar;
pub mod context;
pub mod discount;
pub mod quote;
pub mod strategy;

#[doc(inline)]
pub use self::{
    context::Context,
    quote::{AppliedDiscount, BreakdownLine, LeasingQuote, RentalQuote},
    strategy::{Chain, Source, Strategy},
};
