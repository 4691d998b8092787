//! Recipe and ingredient models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::units::Unit;

/// Reference from an ingredient line to what it consumes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum IngredientRef {
    /// A purchasable raw material
    RawMaterial(Uuid),
    /// Another recipe used as a semi-finished component
    SemiFinished(Uuid),
}

/// One line of a recipe's bill of materials
///
/// Ingredients exist only embedded inside a recipe; they have no identity or
/// lifecycle of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    #[serde(flatten)]
    pub reference: IngredientRef,
    /// Consumed quantity, in `unit` for raw materials or in output units of
    /// the referenced semi-finished recipe
    pub quantity: Decimal,
    pub unit: Unit,
    /// Per-unit price captured when the line was added. Display/fallback
    /// only; live computation always re-resolves from the current catalog.
    pub unit_price_snapshot: Option<Decimal>,
}

/// A sellable product or semi-finished component with its bill of materials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub product_name: String,
    pub category: Option<String>,
    pub is_semi_finished: bool,
    /// Total output of one production run, set for semi-finished recipes
    pub yield_quantity: Option<Decimal>,
    pub yield_unit: Option<Unit>,
    pub ingredients: Vec<RecipeIngredient>,
    /// Zero when the channel is disabled
    pub sale_price_online: Decimal,
    pub sale_price_offline: Decimal,
    pub sold_online: bool,
    pub sold_offline: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cost fields derived from the current catalog, recomputed on every save
/// and read rather than maintained incrementally
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecipeCosting {
    pub total_cost: Decimal,
    pub unit_cost: Decimal,
    pub food_cost_online_pct: Decimal,
    pub food_cost_offline_pct: Decimal,
    pub margin_online: Decimal,
    pub margin_offline: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ingredient lines are stored as JSONB; this shape is the storage format.
    #[test]
    fn ingredient_line_json_shape() {
        let id = Uuid::nil();
        let line = RecipeIngredient {
            reference: IngredientRef::SemiFinished(id),
            quantity: Decimal::from(2),
            unit: Unit::Piece,
            unit_price_snapshot: None,
        };

        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["kind"], "semi_finished");
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["unit"], "piece");

        let back: RecipeIngredient = serde_json::from_value(json).unwrap();
        assert_eq!(back.reference, IngredientRef::SemiFinished(id));
    }
}
