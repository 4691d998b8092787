//! Shared domain logic for the Restaurant Ops Platform
//!
//! Pure, I/O-free core of the platform: measurement units, raw material and
//! recipe models, the recipe cost roll-up engine, and persistence-contract
//! validation. The backend supplies catalog snapshots and storage.

pub mod costing;
pub mod models;
pub mod units;
pub mod validation;

pub use costing::*;
pub use models::*;
pub use units::*;
pub use validation::*;
