//! Recipe service: catalog CRUD and the cost roll-up save pipeline
//!
//! A recipe save validates the persistence contract, normalizes numerics,
//! checks product-name uniqueness, recomputes costs against a fresh catalog
//! snapshot and stores the computed fields alongside the record. Reads
//! recompute against current prices; the stored figures are only what was
//! true at the last save.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::costing::{channel_metrics, net_food_cost_pct, CostCatalog, CostWarning};
use shared::validation::{is_duplicate_product_name, normalize_recipe, validate_recipe};
use shared::{ChannelMetrics, Recipe, RecipeCosting, RecipeIngredient, Unit};

use super::raw_material::RawMaterialService;

/// Recipe service backed by the `recipes` table
#[derive(Clone)]
pub struct RecipeService {
    db: PgPool,
}

/// Database row for a recipe; the ingredient list is embedded JSONB and the
/// cost columns hold what was computed at the last save
#[derive(Debug, FromRow)]
struct RecipeRow {
    id: Uuid,
    product_name: String,
    category: Option<String>,
    is_semi_finished: bool,
    yield_quantity: Option<Decimal>,
    yield_unit: Option<String>,
    ingredients: serde_json::Value,
    sale_price_online: Decimal,
    sale_price_offline: Decimal,
    sold_online: bool,
    sold_offline: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RecipeRow {
    fn into_recipe(self) -> AppResult<Recipe> {
        let ingredients: Vec<RecipeIngredient> = serde_json::from_value(self.ingredients)
            .map_err(|e| AppError::Internal(format!("corrupt ingredient list: {}", e)))?;

        Ok(Recipe {
            id: self.id,
            product_name: self.product_name,
            category: self.category,
            is_semi_finished: self.is_semi_finished,
            yield_quantity: self.yield_quantity,
            yield_unit: self
                .yield_unit
                .as_deref()
                .map(|s| {
                    Unit::parse(s)
                        .ok_or_else(|| AppError::Internal(format!("unknown unit in database: {}", s)))
                })
                .transpose()?,
            ingredients,
            sale_price_online: self.sale_price_online,
            sale_price_offline: self.sale_price_offline,
            sold_online: self.sold_online,
            sold_offline: self.sold_offline,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Input for creating or replacing a recipe
#[derive(Debug, Deserialize)]
pub struct SaveRecipeInput {
    pub product_name: String,
    pub category: Option<String>,
    pub is_semi_finished: bool,
    pub yield_quantity: Option<Decimal>,
    pub yield_unit: Option<Unit>,
    pub ingredients: Vec<RecipeIngredient>,
    pub sale_price_online: Decimal,
    pub sale_price_offline: Decimal,
    pub sold_online: bool,
    pub sold_offline: bool,
}

/// A recipe together with costs recomputed against the current catalog
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub costing: RecipeCosting,
    pub warnings: Vec<CostWarning>,
}

/// Full cost breakdown for a recipe, including the fee-adjusted online
/// food-cost percentage (reporting-only, never persisted)
#[derive(Debug, Serialize)]
pub struct CostBreakdown {
    pub recipe_id: Uuid,
    pub product_name: String,
    pub total_cost: Decimal,
    pub unit_cost: Decimal,
    pub online: ChannelMetrics,
    pub offline: ChannelMetrics,
    pub net_food_cost_online_pct: Decimal,
    pub warnings: Vec<CostWarning>,
}

const SELECT_COLUMNS: &str = "id, product_name, category, is_semi_finished, yield_quantity, \
     yield_unit, ingredients, sale_price_online, sale_price_offline, \
     sold_online, sold_offline, created_at, updated_at";

impl RecipeService {
    /// Create a new RecipeService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a recipe, computing and storing its cost fields
    pub async fn create_recipe(&self, input: SaveRecipeInput) -> AppResult<RecipeDetail> {
        self.save_recipe(Uuid::new_v4(), input, true).await
    }

    /// Replace a recipe, recomputing and storing its cost fields
    pub async fn update_recipe(
        &self,
        recipe_id: Uuid,
        input: SaveRecipeInput,
    ) -> AppResult<RecipeDetail> {
        self.save_recipe(recipe_id, input, false).await
    }

    async fn save_recipe(
        &self,
        recipe_id: Uuid,
        input: SaveRecipeInput,
        is_create: bool,
    ) -> AppResult<RecipeDetail> {
        let now = Utc::now();
        let mut recipe = Recipe {
            id: recipe_id,
            product_name: input.product_name.trim().to_string(),
            category: input.category,
            is_semi_finished: input.is_semi_finished,
            yield_quantity: input.yield_quantity,
            yield_unit: input.yield_unit,
            ingredients: input.ingredients,
            sale_price_online: input.sale_price_online,
            sale_price_offline: input.sale_price_offline,
            sold_online: input.sold_online,
            sold_offline: input.sold_offline,
            created_at: now,
            updated_at: now,
        };

        validate_recipe(&recipe).map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        normalize_recipe(&mut recipe);

        // One catalog snapshot backs both the duplicate-name check and the
        // cost computation. It includes the incoming ingredient list before
        // costing, so self-edits price consistently.
        let mut catalog = self.load_catalog().await?;
        if is_duplicate_product_name(catalog.recipes(), &recipe) {
            return Err(AppError::DuplicateEntry("product name".to_string()));
        }
        catalog.upsert_recipe(recipe.clone());
        let cost = catalog.recipe_cost(&recipe)?;

        let costing = derive_costing(&recipe, cost.total_cost, cost.unit_cost);
        let ingredients_json = serde_json::to_value(&recipe.ingredients)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let sql = if is_create {
            format!(
                r#"
                INSERT INTO recipes (
                    id, product_name, category, is_semi_finished, yield_quantity,
                    yield_unit, ingredients, sale_price_online, sale_price_offline,
                    sold_online, sold_offline, total_cost, unit_cost,
                    food_cost_online_pct, food_cost_offline_pct,
                    margin_online, margin_offline
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
                RETURNING {SELECT_COLUMNS}
                "#
            )
        } else {
            format!(
                r#"
                UPDATE recipes
                SET product_name = $2, category = $3, is_semi_finished = $4,
                    yield_quantity = $5, yield_unit = $6, ingredients = $7,
                    sale_price_online = $8, sale_price_offline = $9,
                    sold_online = $10, sold_offline = $11, total_cost = $12,
                    unit_cost = $13, food_cost_online_pct = $14,
                    food_cost_offline_pct = $15, margin_online = $16,
                    margin_offline = $17, updated_at = NOW()
                WHERE id = $1
                RETURNING {SELECT_COLUMNS}
                "#
            )
        };

        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(recipe.id)
            .bind(&recipe.product_name)
            .bind(&recipe.category)
            .bind(recipe.is_semi_finished)
            .bind(recipe.yield_quantity)
            .bind(recipe.yield_unit.map(|u| u.as_str()))
            .bind(&ingredients_json)
            .bind(recipe.sale_price_online)
            .bind(recipe.sale_price_offline)
            .bind(recipe.sold_online)
            .bind(recipe.sold_offline)
            .bind(costing.total_cost)
            .bind(costing.unit_cost)
            .bind(costing.food_cost_online_pct)
            .bind(costing.food_cost_offline_pct)
            .bind(costing.margin_online)
            .bind(costing.margin_offline)
            .fetch_optional(&self.db)
            .await
            // A concurrent save can slip past the snapshot check; the
            // partial unique index reports it as a constraint violation
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.constraint() == Some("recipes_product_name_unique") {
                        return AppError::DuplicateEntry("product name".to_string());
                    }
                }
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::NotFound("Recipe".to_string()))?;

        Ok(RecipeDetail {
            recipe: row.into_recipe()?,
            costing,
            warnings: cost.warnings,
        })
    }

    /// Get a recipe with costs recomputed against current prices
    pub async fn get_recipe(&self, recipe_id: Uuid) -> AppResult<RecipeDetail> {
        let catalog = self.load_catalog().await?;
        let recipe = catalog
            .recipe(recipe_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Recipe".to_string()))?;

        let cost = catalog.recipe_cost(&recipe)?;
        let costing = derive_costing(&recipe, cost.total_cost, cost.unit_cost);

        Ok(RecipeDetail {
            recipe,
            costing,
            warnings: cost.warnings,
        })
    }

    /// List all recipes (catalog view; cost recomputation happens on
    /// detail reads and saves)
    pub async fn list_recipes(&self) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM recipes ORDER BY product_name"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|r| r.into_recipe()).collect()
    }

    /// Delete a recipe. Recipes still referencing it as a semi-finished
    /// component will carry a dangling-reference warning.
    pub async fn delete_recipe(&self, recipe_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Recipe".to_string()));
        }

        Ok(())
    }

    /// Full cost breakdown for one recipe, including the fee-adjusted
    /// online food-cost percentage
    pub async fn cost_breakdown(
        &self,
        recipe_id: Uuid,
        delivery_fee_pct: Decimal,
    ) -> AppResult<CostBreakdown> {
        let catalog = self.load_catalog().await?;
        let recipe = catalog
            .recipe(recipe_id)
            .ok_or_else(|| AppError::NotFound("Recipe".to_string()))?;

        let cost = catalog.recipe_cost(recipe)?;

        Ok(CostBreakdown {
            recipe_id: recipe.id,
            product_name: recipe.product_name.clone(),
            total_cost: cost.total_cost,
            unit_cost: cost.unit_cost,
            online: channel_metrics(cost.unit_cost, recipe.sale_price_online, recipe.sold_online),
            offline: channel_metrics(
                cost.unit_cost,
                recipe.sale_price_offline,
                recipe.sold_offline,
            ),
            net_food_cost_online_pct: if recipe.sold_online {
                net_food_cost_pct(cost.unit_cost, recipe.sale_price_online, delivery_fee_pct)
            } else {
                Decimal::ZERO
            },
            warnings: cost.warnings,
        })
    }

    /// Snapshot the full catalog for a round of cost computations
    pub async fn load_catalog(&self) -> AppResult<CostCatalog> {
        let materials = RawMaterialService::new(self.db.clone())
            .list_materials()
            .await?;
        let recipes = self.list_recipes().await?;
        Ok(CostCatalog::new(materials, recipes))
    }
}

/// Assemble the persisted cost fields from a computed roll-up
fn derive_costing(recipe: &Recipe, total_cost: Decimal, unit_cost: Decimal) -> RecipeCosting {
    let online = channel_metrics(unit_cost, recipe.sale_price_online, recipe.sold_online);
    let offline = channel_metrics(unit_cost, recipe.sale_price_offline, recipe.sold_offline);

    RecipeCosting {
        total_cost,
        unit_cost,
        food_cost_online_pct: online.food_cost_pct,
        food_cost_offline_pct: offline.food_cost_pct,
        margin_online: online.margin,
        margin_offline: offline.margin,
    }
}
