//! Raw material catalog service
//!
//! Owns the purchasing side of the catalog: what a material costs, in what
//! unit it is bought, and how a package breaks down into consumable units.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation::round_to_cents;
use shared::{RawMaterial, Unit};

/// Raw material service backed by the `raw_materials` table
#[derive(Clone)]
pub struct RawMaterialService {
    db: PgPool,
}

/// Database row for a raw material; units travel as text
#[derive(Debug, FromRow)]
struct RawMaterialRow {
    id: Uuid,
    name: String,
    purchase_unit: String,
    purchase_price: Decimal,
    vat_rate: Option<Decimal>,
    package_dimension: Option<Decimal>,
    package_dimension_unit: Option<String>,
    units_per_package: Option<Decimal>,
    internal_unit_weight: Option<Decimal>,
    internal_unit: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RawMaterialRow {
    fn into_material(self) -> AppResult<RawMaterial> {
        Ok(RawMaterial {
            id: self.id,
            name: self.name,
            purchase_unit: unit_from_db(&self.purchase_unit)?,
            purchase_price: self.purchase_price,
            vat_rate: self.vat_rate,
            package_dimension: self.package_dimension,
            package_dimension_unit: self
                .package_dimension_unit
                .as_deref()
                .map(unit_from_db)
                .transpose()?,
            units_per_package: self.units_per_package,
            internal_unit_weight: self.internal_unit_weight,
            internal_unit: self.internal_unit.as_deref().map(unit_from_db).transpose()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Input for creating or replacing a raw material
#[derive(Debug, Deserialize)]
pub struct SaveRawMaterialInput {
    pub name: String,
    pub purchase_unit: Unit,
    pub purchase_price: Decimal,
    pub vat_rate: Option<Decimal>,
    pub package_dimension: Option<Decimal>,
    pub package_dimension_unit: Option<Unit>,
    pub units_per_package: Option<Decimal>,
    pub internal_unit_weight: Option<Decimal>,
    pub internal_unit: Option<Unit>,
}

const SELECT_COLUMNS: &str = "id, name, purchase_unit, purchase_price, vat_rate, \
     package_dimension, package_dimension_unit, units_per_package, \
     internal_unit_weight, internal_unit, created_at, updated_at";

impl RawMaterialService {
    /// Create a new RawMaterialService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a raw material
    pub async fn create_material(&self, input: SaveRawMaterialInput) -> AppResult<RawMaterial> {
        let input = validate_material_input(input)?;

        let row = sqlx::query_as::<_, RawMaterialRow>(&format!(
            r#"
            INSERT INTO raw_materials (
                name, purchase_unit, purchase_price, vat_rate,
                package_dimension, package_dimension_unit, units_per_package,
                internal_unit_weight, internal_unit
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.purchase_unit.as_str())
        .bind(input.purchase_price)
        .bind(input.vat_rate)
        .bind(input.package_dimension)
        .bind(input.package_dimension_unit.map(|u| u.as_str()))
        .bind(input.units_per_package)
        .bind(input.internal_unit_weight)
        .bind(input.internal_unit.map(|u| u.as_str()))
        .fetch_one(&self.db)
        .await?;

        row.into_material()
    }

    /// Replace a raw material's purchasing metadata
    pub async fn update_material(
        &self,
        material_id: Uuid,
        input: SaveRawMaterialInput,
    ) -> AppResult<RawMaterial> {
        let input = validate_material_input(input)?;

        let row = sqlx::query_as::<_, RawMaterialRow>(&format!(
            r#"
            UPDATE raw_materials
            SET name = $1, purchase_unit = $2, purchase_price = $3, vat_rate = $4,
                package_dimension = $5, package_dimension_unit = $6,
                units_per_package = $7, internal_unit_weight = $8,
                internal_unit = $9, updated_at = NOW()
            WHERE id = $10
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.purchase_unit.as_str())
        .bind(input.purchase_price)
        .bind(input.vat_rate)
        .bind(input.package_dimension)
        .bind(input.package_dimension_unit.map(|u| u.as_str()))
        .bind(input.units_per_package)
        .bind(input.internal_unit_weight)
        .bind(input.internal_unit.map(|u| u.as_str()))
        .bind(material_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Raw material".to_string()))?;

        row.into_material()
    }

    /// Delete a raw material. Recipes still referencing it will carry a
    /// dangling-reference warning on their next cost computation.
    pub async fn delete_material(&self, material_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM raw_materials WHERE id = $1")
            .bind(material_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Raw material".to_string()));
        }

        Ok(())
    }

    /// Get a raw material by ID
    pub async fn get_material(&self, material_id: Uuid) -> AppResult<RawMaterial> {
        let row = sqlx::query_as::<_, RawMaterialRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM raw_materials WHERE id = $1"
        ))
        .bind(material_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Raw material".to_string()))?;

        row.into_material()
    }

    /// List the full raw material catalog
    pub async fn list_materials(&self) -> AppResult<Vec<RawMaterial>> {
        let rows = sqlx::query_as::<_, RawMaterialRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM raw_materials ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|r| r.into_material()).collect()
    }
}

/// Normalize and validate purchasing metadata before storage
fn validate_material_input(mut input: SaveRawMaterialInput) -> AppResult<SaveRawMaterialInput> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation {
            field: "name".to_string(),
            message: "Material name is required".to_string(),
        });
    }

    if input.purchase_price < Decimal::ZERO {
        return Err(AppError::Validation {
            field: "purchase_price".to_string(),
            message: "Purchase price cannot be negative".to_string(),
        });
    }

    if input.package_dimension.is_some() != input.package_dimension_unit.is_some() {
        return Err(AppError::Validation {
            field: "package_dimension".to_string(),
            message: "Package dimension and its unit must be set together".to_string(),
        });
    }

    if input.internal_unit_weight.is_some() {
        if input.units_per_package.is_none() || input.internal_unit.is_none() {
            return Err(AppError::Validation {
                field: "internal_unit_weight".to_string(),
                message: "Per-unit weight requires units per package and a content unit"
                    .to_string(),
            });
        }
    }

    for (field, value) in [
        ("package_dimension", input.package_dimension),
        ("units_per_package", input.units_per_package),
        ("internal_unit_weight", input.internal_unit_weight),
    ] {
        if let Some(value) = value {
            if value <= Decimal::ZERO {
                return Err(AppError::Validation {
                    field: field.to_string(),
                    message: format!("{} must be positive", field),
                });
            }
        }
    }

    input.purchase_price = round_to_cents(input.purchase_price);
    Ok(input)
}

/// Convert a stored unit string back into a Unit
fn unit_from_db(s: &str) -> AppResult<Unit> {
    Unit::parse(s).ok_or_else(|| AppError::Internal(format!("unknown unit in database: {}", s)))
}
