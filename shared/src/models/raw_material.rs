//! Raw material purchasing models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::units::Unit;

/// A purchasable raw material with the metadata needed to price consumption
///
/// Purchasing metadata comes in two mutually informative shapes, at most one
/// populated per material:
/// - `package_dimension` + `package_dimension_unit`: "this sack weighs 25 kg"
/// - `units_per_package` (+ optional `internal_unit_weight` +
///   `internal_unit`): "this case holds 24 bottles of 0.33 liter each".
///   Without `internal_unit_weight` the contents are discrete pieces priced
///   per package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMaterial {
    pub id: Uuid,
    pub name: String,
    /// Unit one `purchase_price` buys
    pub purchase_unit: Unit,
    /// Price for one purchase unit; zero means "not yet quoted"
    pub purchase_price: Decimal,
    pub vat_rate: Option<Decimal>,
    pub package_dimension: Option<Decimal>,
    pub package_dimension_unit: Option<Unit>,
    pub units_per_package: Option<Decimal>,
    pub internal_unit_weight: Option<Decimal>,
    pub internal_unit: Option<Unit>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
