//! Material preset routes

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::materials::{find_preset, preset_catalog};
use crate::domain::{ApplyPresetRequest, MaterialType, QuoteSnapshot};
use crate::error::{ApiError, ApiResult};

/// GET /materials/presets
pub async fn list_presets() -> impl IntoResponse {
    DataResponse::new(preset_catalog())
}

/// POST /materials/:material/preset
///
/// Copy a catalog product's brand, yield and price into a material slot.
pub async fn apply_preset(
    State(state): State<Arc<AppState>>,
    Path(material): Path<String>,
    Json(req): Json<ApplyPresetRequest>,
) -> ApiResult<impl IntoResponse> {
    let material: MaterialType = material
        .parse()
        .map_err(|e: crate::domain::materials::UnknownMaterial| ApiError::bad_request(e.to_string()))?;

    let preset = find_preset(material, &req.brand).ok_or_else(|| {
        ApiError::not_found(format!("No {} preset named '{}'", material, req.brand.trim()))
    })?;

    let config = state.session.update(|current| {
        let mut next = current.clone();
        *next.materials.get_mut(material) = preset.to_config();
        next
    })?;

    tracing::info!(material = %material, brand = preset.brand, "Preset applied");
    Ok(DataResponse::new(QuoteSnapshot::new(&config)))
}
