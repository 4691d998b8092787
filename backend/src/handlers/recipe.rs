//! HTTP handlers for recipe management and cost breakdowns

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::pricing::PricingService;
use crate::services::recipe::{CostBreakdown, RecipeDetail, RecipeService, SaveRecipeInput};
use crate::AppState;
use shared::Recipe;

/// Create a recipe
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(input): Json<SaveRecipeInput>,
) -> AppResult<Json<RecipeDetail>> {
    let service = RecipeService::new(state.db);
    let recipe = service.create_recipe(input).await?;
    Ok(Json(recipe))
}

/// Get a recipe with costs recomputed against current prices
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<Json<RecipeDetail>> {
    let service = RecipeService::new(state.db);
    let recipe = service.get_recipe(recipe_id).await?;
    Ok(Json(recipe))
}

/// Update a recipe
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Json(input): Json<SaveRecipeInput>,
) -> AppResult<Json<RecipeDetail>> {
    let service = RecipeService::new(state.db);
    let recipe = service.update_recipe(recipe_id, input).await?;
    Ok(Json(recipe))
}

/// Delete a recipe
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = RecipeService::new(state.db);
    service.delete_recipe(recipe_id).await?;
    Ok(Json(()))
}

/// List all recipes
pub async fn list_recipes(State(state): State<AppState>) -> AppResult<Json<Vec<Recipe>>> {
    let service = RecipeService::new(state.db);
    let recipes = service.list_recipes().await?;
    Ok(Json(recipes))
}

/// Full cost breakdown for a recipe, including the fee-adjusted online
/// food-cost percentage
pub async fn get_cost_breakdown(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<Json<CostBreakdown>> {
    let pricing = PricingService::new(
        state.db.clone(),
        state.config.pricing.default_delivery_fee_pct,
    );
    let fee_pct = pricing.delivery_fee_pct().await?;

    let service = RecipeService::new(state.db);
    let breakdown = service.cost_breakdown(recipe_id, fee_pct).await?;
    Ok(Json(breakdown))
}
