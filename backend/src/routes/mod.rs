//! Route definitions for the Restaurant Ops Platform

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Raw material catalog
        .nest("/raw-materials", raw_material_routes())
        // Recipes and cost breakdowns
        .nest("/recipes", recipe_routes())
        // Pricing settings and reporting
        .route(
            "/settings/pricing",
            get(handlers::get_pricing_settings).put(handlers::update_pricing_settings),
        )
        .route("/reports/food-cost", get(handlers::get_food_cost_report))
}

/// Raw material catalog routes
fn raw_material_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_materials).post(handlers::create_material),
        )
        .route(
            "/:material_id",
            get(handlers::get_material)
                .put(handlers::update_material)
                .delete(handlers::delete_material),
        )
}

/// Recipe management routes
fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_recipes).post(handlers::create_recipe),
        )
        .route(
            "/:recipe_id",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .route("/:recipe_id/cost", get(handlers::get_cost_breakdown))
}
