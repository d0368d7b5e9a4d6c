//! Domain definitions.

pub mod branch;
pub mod category;
pub mod contract;
pub mod customer;
pub mod leasing;
pub mod pricing;
pub mod rental;
pub mod vehicle;

pub use self::{
    category::Category, contract::CustomerContract, rental::Rental,
    vehicle::Vehicle,
};
