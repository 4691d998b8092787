//! HTTP handlers for the raw material catalog

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::raw_material::{RawMaterialService, SaveRawMaterialInput};
use crate::AppState;
use shared::RawMaterial;

/// Create a raw material
pub async fn create_material(
    State(state): State<AppState>,
    Json(input): Json<SaveRawMaterialInput>,
) -> AppResult<Json<RawMaterial>> {
    let service = RawMaterialService::new(state.db);
    let material = service.create_material(input).await?;
    Ok(Json(material))
}

/// Get a raw material by ID
pub async fn get_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> AppResult<Json<RawMaterial>> {
    let service = RawMaterialService::new(state.db);
    let material = service.get_material(material_id).await?;
    Ok(Json(material))
}

/// Update a raw material
pub async fn update_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
    Json(input): Json<SaveRawMaterialInput>,
) -> AppResult<Json<RawMaterial>> {
    let service = RawMaterialService::new(state.db);
    let material = service.update_material(material_id, input).await?;
    Ok(Json(material))
}

/// Delete a raw material
pub async fn delete_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = RawMaterialService::new(state.db);
    service.delete_material(material_id).await?;
    Ok(Json(()))
}

/// List the raw material catalog
pub async fn list_materials(State(state): State<AppState>) -> AppResult<Json<Vec<RawMaterial>>> {
    let service = RawMaterialService::new(state.db);
    let materials = service.list_materials().await?;
    Ok(Json(materials))
}
