//! HTTP handlers for the Restaurant Ops Platform

mod health;
mod pricing;
mod raw_material;
mod recipe;

pub use health::*;
pub use pricing::*;
pub use raw_material::*;
pub use recipe::*;
