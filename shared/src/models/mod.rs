//! Domain models for the Restaurant Ops Platform

mod raw_material;
mod recipe;

pub use raw_material::*;
pub use recipe::*;
