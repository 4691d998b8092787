//! HTTP handlers for pricing settings and the food-cost report

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::pricing::{
    FoodCostReportRow, PricingService, PricingSettings, UpdatePricingSettingsInput,
};
use crate::AppState;

fn pricing_service(state: AppState) -> PricingService {
    PricingService::new(state.db, state.config.pricing.default_delivery_fee_pct)
}

/// Get current pricing settings
pub async fn get_pricing_settings(
    State(state): State<AppState>,
) -> AppResult<Json<PricingSettings>> {
    let settings = pricing_service(state).get_settings().await?;
    Ok(Json(settings))
}

/// Update the delivery fee percentage
pub async fn update_pricing_settings(
    State(state): State<AppState>,
    Json(input): Json<UpdatePricingSettingsInput>,
) -> AppResult<Json<PricingSettings>> {
    let settings = pricing_service(state).update_settings(input).await?;
    Ok(Json(settings))
}

/// Food-cost report across the sellable catalog
pub async fn get_food_cost_report(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<FoodCostReportRow>>> {
    let report = pricing_service(state).food_cost_report().await?;
    Ok(Json(report))
}
