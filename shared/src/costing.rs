//! Recipe cost roll-up engine
//!
//! Resolves heterogeneous purchasing/consumption units into money, sums
//! ingredient costs recursively through semi-finished components, and derives
//! per-channel food-cost and margin metrics. Everything here is pure
//! computation over an in-memory catalog snapshot: no I/O, no caching, safe
//! to call repeatedly as prices change.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{IngredientRef, RawMaterial, Recipe};
use crate::units::{convert, Unit, UnitConversionError};

/// Errors that abort a recipe's cost computation
///
/// A recipe with one unresolvable ingredient has no trustworthy total, so
/// these propagate instead of degrading to a plausible-looking number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostingError {
    #[error(transparent)]
    Unit(#[from] UnitConversionError),

    #[error("cyclic recipe reference involving recipe {0}")]
    CyclicReference(Uuid),
}

/// Non-fatal data-integrity findings surfaced alongside a computed cost
///
/// A dangling reference prices the line at zero but must be visible to the
/// operator, distinguishable from a legitimately zero cost.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostWarning {
    DanglingRawMaterial { material_id: Uuid },
    DanglingRecipe { recipe_id: Uuid },
}

/// Result of rolling up one recipe
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecipeCost {
    /// Sum of all resolved ingredient costs
    pub total_cost: Decimal,
    /// Per-unit cost: total divided by yield for semi-finished recipes,
    /// equal to total for finished products (one sellable item per batch)
    pub unit_cost: Decimal,
    pub warnings: Vec<CostWarning>,
}

/// Monetary cost of consuming `quantity` `unit` of a raw material.
///
/// Decision order, first matching rule wins:
/// 1. packaged material consumed as pieces: `purchase_price / units_per_package`
/// 2. weighted package: price spread over `units_per_package * internal_unit_weight`
///    of `internal_unit`, consumption converted into that unit
/// 3. dimensioned package: price spread over `package_dimension` of
///    `package_dimension_unit`
/// 4. direct: consumption converted into the purchase unit
///
/// A zero or negative purchase price means the material is not yet quoted
/// and resolves to zero cost.
pub fn resolve_material_cost(
    material: &RawMaterial,
    quantity: Decimal,
    unit: Unit,
) -> Result<Decimal, CostingError> {
    let price = material.purchase_price;
    if price <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    if let Some(units_per_package) = material.units_per_package {
        if units_per_package > Decimal::ZERO {
            // Rule 1: pieces out of a package, regardless of whether the
            // pieces also have a declared weight
            if unit == Unit::Piece {
                return Ok(quantity * (price / units_per_package));
            }

            // Rule 2: package contents measured by weight/volume
            if let (Some(weight), Some(internal_unit)) =
                (material.internal_unit_weight, material.internal_unit)
            {
                let total_content = units_per_package * weight;
                if total_content > Decimal::ZERO {
                    let converted = convert(quantity, unit, internal_unit)?;
                    return Ok(converted * (price / total_content));
                }
            }
        }
    }

    // Rule 3: single-dimension package ("this sack weighs 25 kg")
    if let (Some(dimension), Some(dimension_unit)) =
        (material.package_dimension, material.package_dimension_unit)
    {
        if dimension > Decimal::ZERO {
            let converted = convert(quantity, unit, dimension_unit)?;
            return Ok(converted * (price / dimension));
        }
    }

    // Rule 4: no packaging metadata, price applies to the purchase unit
    let converted = convert(quantity, unit, material.purchase_unit)?;
    Ok(converted * price)
}

/// Point-in-time snapshot of the raw material and recipe catalog
///
/// Built from the persistence collaborator's list operations before a round
/// of computations; the engine never reads storage itself.
#[derive(Debug, Clone, Default)]
pub struct CostCatalog {
    materials: HashMap<Uuid, RawMaterial>,
    recipes: HashMap<Uuid, Recipe>,
}

impl CostCatalog {
    pub fn new(
        materials: impl IntoIterator<Item = RawMaterial>,
        recipes: impl IntoIterator<Item = Recipe>,
    ) -> Self {
        Self {
            materials: materials.into_iter().map(|m| (m.id, m)).collect(),
            recipes: recipes.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    pub fn recipe(&self, id: Uuid) -> Option<&Recipe> {
        self.recipes.get(&id)
    }

    /// Insert or replace a recipe in the snapshot, e.g. to cost an edit
    /// before it is persisted
    pub fn upsert_recipe(&mut self, recipe: Recipe) {
        self.recipes.insert(recipe.id, recipe);
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    /// Roll up the full cost of a recipe against this snapshot.
    ///
    /// Nested semi-finished references recurse on their own unit cost; the
    /// ingredient quantity counts output units of the sub-recipe, with no
    /// unit conversion across recipe boundaries. The chain of recipe ids
    /// currently being resolved is tracked so mutual references fail fast
    /// instead of recursing forever.
    pub fn recipe_cost(&self, recipe: &Recipe) -> Result<RecipeCost, CostingError> {
        let mut warnings = Vec::new();
        let mut visiting = vec![recipe.id];
        let total_cost = self.total_cost(recipe, &mut visiting, &mut warnings)?;

        Ok(RecipeCost {
            total_cost,
            unit_cost: unit_cost_of(recipe, total_cost),
            warnings,
        })
    }

    fn total_cost(
        &self,
        recipe: &Recipe,
        visiting: &mut Vec<Uuid>,
        warnings: &mut Vec<CostWarning>,
    ) -> Result<Decimal, CostingError> {
        let mut total = Decimal::ZERO;

        for ingredient in &recipe.ingredients {
            match ingredient.reference {
                IngredientRef::RawMaterial(material_id) => {
                    match self.materials.get(&material_id) {
                        Some(material) => {
                            total += resolve_material_cost(
                                material,
                                ingredient.quantity,
                                ingredient.unit,
                            )?;
                        }
                        None => warnings.push(CostWarning::DanglingRawMaterial { material_id }),
                    }
                }
                IngredientRef::SemiFinished(recipe_id) => {
                    if visiting.contains(&recipe_id) {
                        return Err(CostingError::CyclicReference(recipe_id));
                    }
                    match self.recipes.get(&recipe_id) {
                        Some(sub) => {
                            visiting.push(recipe_id);
                            let sub_total = self.total_cost(sub, visiting, warnings)?;
                            visiting.pop();
                            total += ingredient.quantity * unit_cost_of(sub, sub_total);
                        }
                        None => warnings.push(CostWarning::DanglingRecipe { recipe_id }),
                    }
                }
            }
        }

        Ok(total)
    }
}

fn unit_cost_of(recipe: &Recipe, total_cost: Decimal) -> Decimal {
    if recipe.is_semi_finished {
        match recipe.yield_quantity {
            Some(yield_quantity) if yield_quantity > Decimal::ZERO => total_cost / yield_quantity,
            _ => total_cost,
        }
    } else {
        total_cost
    }
}

/// Food-cost percentage and margin for one sales channel
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChannelMetrics {
    pub food_cost_pct: Decimal,
    pub margin: Decimal,
}

/// Channel profitability for a given unit cost and sale price.
///
/// A disabled channel has its price forced to zero upstream; the cost ratio
/// is undefined there and both metrics report as zero by convention.
pub fn channel_metrics(unit_cost: Decimal, sale_price: Decimal, sold: bool) -> ChannelMetrics {
    if !sold || sale_price <= Decimal::ZERO {
        return ChannelMetrics {
            food_cost_pct: Decimal::ZERO,
            margin: Decimal::ZERO,
        };
    }

    ChannelMetrics {
        food_cost_pct: unit_cost / sale_price * Decimal::from(100),
        margin: sale_price - unit_cost,
    }
}

/// Food-cost percentage against the sale price net of a delivery-channel
/// fee. Reporting-only; never persisted on the recipe record.
pub fn net_food_cost_pct(unit_cost: Decimal, sale_price: Decimal, fee_pct: Decimal) -> Decimal {
    let hundred = Decimal::from(100);
    let net_price = sale_price * (hundred - fee_pct) / hundred;
    if net_price > Decimal::ZERO {
        unit_cost / net_price * hundred
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn material(purchase_unit: Unit, price: &str) -> RawMaterial {
        RawMaterial {
            id: Uuid::new_v4(),
            name: "test material".to_string(),
            purchase_unit,
            purchase_price: dec(price),
            vat_rate: None,
            package_dimension: None,
            package_dimension_unit: None,
            units_per_package: None,
            internal_unit_weight: None,
            internal_unit: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn direct_same_unit() {
        let flour = material(Unit::Kilogram, "1.20");
        let cost = resolve_material_cost(&flour, dec("3"), Unit::Kilogram).unwrap();
        assert_eq!(cost, dec("3.60"));
    }

    #[test]
    fn direct_with_mass_conversion() {
        // 1.20 per kilogram, consumed as 250 grams
        let flour = material(Unit::Kilogram, "1.20");
        let cost = resolve_material_cost(&flour, dec("250"), Unit::Gram).unwrap();
        assert_eq!(cost, dec("0.30"));
    }

    #[test]
    fn dimensioned_package() {
        // 25 kg sack for 20.00, consumed as 500 grams
        let mut salt = material(Unit::Sack, "20.00");
        salt.package_dimension = Some(dec("25"));
        salt.package_dimension_unit = Some(Unit::Kilogram);
        let cost = resolve_material_cost(&salt, dec("500"), Unit::Gram).unwrap();
        assert_eq!(cost, dec("0.40"));
    }

    #[test]
    fn weighted_package_by_volume() {
        // case of 24 bottles x 0.33 l for 48.00, consumed as 2 liters
        let mut cola = material(Unit::Case, "48.00");
        cola.units_per_package = Some(dec("24"));
        cola.internal_unit_weight = Some(dec("0.33"));
        cola.internal_unit = Some(Unit::Liter);
        let cost = resolve_material_cost(&cola, dec("2"), Unit::Liter).unwrap();
        // 48 / 7.92 per liter
        assert_eq!(cost.round_dp(4), dec("12.1212"));
    }

    #[test]
    fn pieces_from_weighted_package() {
        // same case consumed as 6 pieces: piece rule wins over weight rule
        let mut cola = material(Unit::Case, "48.00");
        cola.units_per_package = Some(dec("24"));
        cola.internal_unit_weight = Some(dec("0.33"));
        cola.internal_unit = Some(Unit::Liter);
        let cost = resolve_material_cost(&cola, dec("6"), Unit::Piece).unwrap();
        assert_eq!(cost, dec("12.00"));
    }

    #[test]
    fn pieces_from_discrete_package() {
        // package of 40 napkin rolls, no per-piece weight
        let mut rolls = material(Unit::Package, "10.00");
        rolls.units_per_package = Some(dec("40"));
        let cost = resolve_material_cost(&rolls, dec("4"), Unit::Piece).unwrap();
        assert_eq!(cost, dec("1.00"));
    }

    #[test]
    fn unquoted_material_costs_zero() {
        let draft = material(Unit::Kilogram, "0");
        let cost = resolve_material_cost(&draft, dec("10"), Unit::Gram).unwrap();
        assert_eq!(cost, Decimal::ZERO);
    }

    #[test]
    fn incompatible_consumption_unit_fails() {
        let flour = material(Unit::Kilogram, "1.20");
        let err = resolve_material_cost(&flour, dec("1"), Unit::Liter).unwrap_err();
        assert_eq!(
            err,
            CostingError::Unit(UnitConversionError::Incompatible {
                from: Unit::Liter,
                to: Unit::Kilogram,
            })
        );
    }

    #[test]
    fn net_food_cost_applies_fee() {
        // cost 4.00, price 10.00, 20% fee -> net price 8.00 -> 50%
        assert_eq!(
            net_food_cost_pct(dec("4"), dec("10"), dec("20")),
            dec("50")
        );
    }

    #[test]
    fn net_food_cost_zero_when_fee_consumes_price() {
        assert_eq!(
            net_food_cost_pct(dec("4"), dec("10"), dec("100")),
            Decimal::ZERO
        );
    }

    #[test]
    fn disabled_channel_reports_zero() {
        let metrics = channel_metrics(dec("5"), dec("12"), false);
        assert_eq!(metrics.food_cost_pct, Decimal::ZERO);
        assert_eq!(metrics.margin, Decimal::ZERO);
    }
}
