//! Channel pricing settings and the food-cost report
//!
//! The delivery-channel fee percentage is operator-editable state stored in
//! `pricing_settings`, seeded from configuration. It is always passed into
//! the pricing calculator explicitly so the arithmetic stays pure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::costing::{channel_metrics, net_food_cost_pct};
use shared::validation::round_to_cents;

use super::recipe::RecipeService;

const DELIVERY_FEE_KEY: &str = "delivery_fee_pct";

/// Pricing settings and reporting service
#[derive(Clone)]
pub struct PricingService {
    db: PgPool,
    default_delivery_fee_pct: Decimal,
}

/// Current pricing settings
#[derive(Debug, Clone, Serialize)]
pub struct PricingSettings {
    pub delivery_fee_pct: Decimal,
}

/// Input for updating pricing settings
#[derive(Debug, Deserialize)]
pub struct UpdatePricingSettingsInput {
    pub delivery_fee_pct: Decimal,
}

/// One row of the food-cost report
#[derive(Debug, Serialize)]
pub struct FoodCostReportRow {
    pub recipe_id: Uuid,
    pub product_name: String,
    pub unit_cost: Decimal,
    pub food_cost_online_pct: Decimal,
    pub net_food_cost_online_pct: Decimal,
    pub food_cost_offline_pct: Decimal,
    pub margin_online: Decimal,
    pub margin_offline: Decimal,
}

impl PricingService {
    /// Create a new PricingService instance
    pub fn new(db: PgPool, default_delivery_fee_pct: Decimal) -> Self {
        Self {
            db,
            default_delivery_fee_pct,
        }
    }

    /// Current delivery fee percentage, falling back to the configured
    /// default until an operator stores one
    pub async fn delivery_fee_pct(&self) -> AppResult<Decimal> {
        let stored = sqlx::query_scalar::<_, Decimal>(
            "SELECT value FROM pricing_settings WHERE key = $1",
        )
        .bind(DELIVERY_FEE_KEY)
        .fetch_optional(&self.db)
        .await?;

        Ok(stored.unwrap_or(self.default_delivery_fee_pct))
    }

    /// Get current pricing settings
    pub async fn get_settings(&self) -> AppResult<PricingSettings> {
        Ok(PricingSettings {
            delivery_fee_pct: self.delivery_fee_pct().await?,
        })
    }

    /// Store a new delivery fee percentage
    pub async fn update_settings(
        &self,
        input: UpdatePricingSettingsInput,
    ) -> AppResult<PricingSettings> {
        if input.delivery_fee_pct < Decimal::ZERO || input.delivery_fee_pct > Decimal::from(100) {
            return Err(AppError::Validation {
                field: "delivery_fee_pct".to_string(),
                message: "Delivery fee must be between 0 and 100%".to_string(),
            });
        }

        let value = round_to_cents(input.delivery_fee_pct);
        sqlx::query(
            r#"
            INSERT INTO pricing_settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            "#,
        )
        .bind(DELIVERY_FEE_KEY)
        .bind(value)
        .execute(&self.db)
        .await?;

        Ok(PricingSettings {
            delivery_fee_pct: value,
        })
    }

    /// Food-cost report across the sellable catalog, computed against
    /// current prices. A recipe whose graph cannot be costed aborts the
    /// report; a partial report would hide the problem.
    pub async fn food_cost_report(&self) -> AppResult<Vec<FoodCostReportRow>> {
        let fee_pct = self.delivery_fee_pct().await?;
        let catalog = RecipeService::new(self.db.clone()).load_catalog().await?;

        let mut rows = Vec::new();
        for recipe in catalog.recipes().filter(|r| !r.is_semi_finished) {
            let cost = catalog.recipe_cost(recipe)?;
            let online = channel_metrics(cost.unit_cost, recipe.sale_price_online, recipe.sold_online);
            let offline =
                channel_metrics(cost.unit_cost, recipe.sale_price_offline, recipe.sold_offline);

            rows.push(FoodCostReportRow {
                recipe_id: recipe.id,
                product_name: recipe.product_name.clone(),
                unit_cost: cost.unit_cost,
                food_cost_online_pct: online.food_cost_pct,
                net_food_cost_online_pct: if recipe.sold_online {
                    net_food_cost_pct(cost.unit_cost, recipe.sale_price_online, fee_pct)
                } else {
                    Decimal::ZERO
                },
                food_cost_offline_pct: offline.food_cost_pct,
                margin_online: online.margin,
                margin_offline: offline.margin,
            });
        }

        rows.sort_by(|a, b| a.product_name.cmp(&b.product_name));
        Ok(rows)
    }
}
