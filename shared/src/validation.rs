//! Validation and normalization for the recipe persistence contract
//!
//! These checks run before a recipe is handed to storage. Uniqueness of the
//! product name is enforced by the backend against existing records; the
//! pure invariants live here.

use rust_decimal::Decimal;

use crate::models::{Recipe, RecipeIngredient};

/// Round a monetary or quantity value to 2 decimal places for storage
pub fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// Validate the structural invariants of a recipe before persistence
pub fn validate_recipe(recipe: &Recipe) -> Result<(), &'static str> {
    if recipe.product_name.trim().is_empty() {
        return Err("product name required");
    }

    if !recipe.is_semi_finished && recipe.ingredients.is_empty() {
        return Err("ingredients required");
    }

    validate_ingredients(&recipe.ingredients)?;

    if recipe.sale_price_online < Decimal::ZERO || recipe.sale_price_offline < Decimal::ZERO {
        return Err("sale price cannot be negative");
    }

    if recipe.is_semi_finished {
        if let Some(yield_quantity) = recipe.yield_quantity {
            if yield_quantity <= Decimal::ZERO {
                return Err("yield quantity must be positive");
            }
        }
    }

    Ok(())
}

/// Validate ingredient lines: quantities must be strictly positive
pub fn validate_ingredients(ingredients: &[RecipeIngredient]) -> Result<(), &'static str> {
    for ingredient in ingredients {
        if ingredient.quantity <= Decimal::ZERO {
            return Err("ingredient quantity must be positive");
        }
        if let Some(snapshot) = ingredient.unit_price_snapshot {
            if snapshot < Decimal::ZERO {
                return Err("ingredient price snapshot cannot be negative");
            }
        }
    }
    Ok(())
}

/// Case-insensitive product-name collision among finished products.
///
/// Semi-finished recipes may share names freely, and a record never
/// collides with itself while under edit. The database mirrors this rule
/// with a partial unique index on `LOWER(product_name)` and remains the
/// authoritative guard against concurrent saves.
pub fn is_duplicate_product_name<'a>(
    existing: impl IntoIterator<Item = &'a Recipe>,
    candidate: &Recipe,
) -> bool {
    if candidate.is_semi_finished {
        return false;
    }

    let name = candidate.product_name.to_lowercase();
    existing.into_iter().any(|recipe| {
        !recipe.is_semi_finished
            && recipe.id != candidate.id
            && recipe.product_name.to_lowercase() == name
    })
}

/// Normalize numeric fields for storage and force disabled channels to a
/// zero sale price (a disabled channel reports zero metrics by convention)
pub fn normalize_recipe(recipe: &mut Recipe) {
    if !recipe.sold_online {
        recipe.sale_price_online = Decimal::ZERO;
    }
    if !recipe.sold_offline {
        recipe.sale_price_offline = Decimal::ZERO;
    }

    recipe.sale_price_online = round_to_cents(recipe.sale_price_online);
    recipe.sale_price_offline = round_to_cents(recipe.sale_price_offline);
    recipe.yield_quantity = recipe.yield_quantity.map(round_to_cents);

    for ingredient in &mut recipe.ingredients {
        ingredient.quantity = round_to_cents(ingredient.quantity);
        ingredient.unit_price_snapshot = ingredient.unit_price_snapshot.map(round_to_cents);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientRef;
    use crate::units::Unit;
    use chrono::Utc;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn ingredient(quantity: &str) -> RecipeIngredient {
        RecipeIngredient {
            reference: IngredientRef::RawMaterial(Uuid::new_v4()),
            quantity: dec(quantity),
            unit: Unit::Gram,
            unit_price_snapshot: None,
        }
    }

    fn recipe(is_semi_finished: bool, ingredients: Vec<RecipeIngredient>) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            product_name: "Margherita".to_string(),
            category: None,
            is_semi_finished,
            yield_quantity: None,
            yield_unit: None,
            ingredients,
            sale_price_online: dec("9.50"),
            sale_price_offline: dec("8.00"),
            sold_online: true,
            sold_offline: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn finished_recipe_requires_ingredients() {
        let empty = recipe(false, vec![]);
        assert_eq!(validate_recipe(&empty), Err("ingredients required"));
    }

    #[test]
    fn semi_finished_may_be_drafted_without_ingredients() {
        let mut draft = recipe(true, vec![]);
        draft.yield_quantity = Some(dec("10"));
        assert!(validate_recipe(&draft).is_ok());
    }

    #[test]
    fn product_name_required() {
        let mut unnamed = recipe(true, vec![ingredient("1")]);
        unnamed.product_name = "   ".to_string();
        assert_eq!(validate_recipe(&unnamed), Err("product name required"));
    }

    #[test]
    fn zero_quantity_rejected() {
        let bad = recipe(false, vec![ingredient("0")]);
        assert_eq!(
            validate_recipe(&bad),
            Err("ingredient quantity must be positive")
        );
    }

    #[test]
    fn negative_price_rejected() {
        let mut bad = recipe(false, vec![ingredient("1")]);
        bad.sale_price_online = dec("-1");
        assert_eq!(validate_recipe(&bad), Err("sale price cannot be negative"));
    }

    #[test]
    fn zero_yield_rejected_for_semi_finished() {
        let mut bad = recipe(true, vec![ingredient("1")]);
        bad.yield_quantity = Some(Decimal::ZERO);
        assert_eq!(
            validate_recipe(&bad),
            Err("yield quantity must be positive")
        );
    }

    #[test]
    fn normalization_rounds_to_two_decimals() {
        let mut r = recipe(false, vec![ingredient("0.333")]);
        r.sale_price_online = dec("9.999");
        normalize_recipe(&mut r);
        assert_eq!(r.sale_price_online, dec("10.00"));
        assert_eq!(r.ingredients[0].quantity, dec("0.33"));
    }

    #[test]
    fn duplicate_name_differing_only_by_case_is_detected() {
        let existing = recipe(false, vec![ingredient("1")]);
        let mut candidate = recipe(false, vec![ingredient("1")]);
        candidate.product_name = "MARGHERITA".to_string();
        assert!(is_duplicate_product_name([&existing], &candidate));
    }

    #[test]
    fn editing_the_same_record_is_not_a_duplicate() {
        let existing = recipe(false, vec![ingredient("1")]);
        let mut candidate = existing.clone();
        candidate.product_name = "margherita".to_string();
        assert!(!is_duplicate_product_name([&existing], &candidate));
    }

    #[test]
    fn semi_finished_names_do_not_collide() {
        let semi = recipe(true, vec![ingredient("1")]);
        let finished = recipe(false, vec![ingredient("1")]);

        // a finished candidate ignores semi-finished names
        assert!(!is_duplicate_product_name([&semi], &finished));
        // a semi-finished candidate never collides at all
        assert!(!is_duplicate_product_name([&finished], &semi));
    }

    #[test]
    fn disabled_channel_price_forced_to_zero() {
        let mut r = recipe(false, vec![ingredient("1")]);
        r.sold_online = false;
        r.sale_price_online = dec("12.00");
        normalize_recipe(&mut r);
        assert_eq!(r.sale_price_online, Decimal::ZERO);
        assert_eq!(r.sale_price_offline, dec("8.00"));
    }
}
