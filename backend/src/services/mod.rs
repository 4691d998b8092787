//! Business logic services for the Restaurant Ops Platform

pub mod pricing;
pub mod raw_material;
pub mod recipe;

pub use pricing::PricingService;
pub use raw_material::RawMaterialService;
pub use recipe::RecipeService;
