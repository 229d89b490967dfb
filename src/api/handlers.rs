use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::model::WardPlan;

use super::error::ApiError;
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub ward_id: String,
    pub ward_name: String,
    pub data: WardPlan,
}

/// POST /api/login: exact passphrase match. The response carries the
/// ward identity and plan but never the passphrase itself.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.password.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Password is required",
        ));
    }

    let ward = state
        .store
        .find_by_passphrase(&req.password)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Invalid password"))?;

    info!(ward = %ward.id, "ward authenticated");
    Ok(Json(LoginResponse {
        success: true,
        ward_id: ward.id,
        ward_name: ward.name,
        data: ward.plan,
    }))
}

#[derive(Debug, Serialize)]
pub struct WardResponse {
    pub id: String,
    pub name: String,
    pub data: WardPlan,
}

/// GET /api/ward/{id}
pub async fn get_ward(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WardResponse>, ApiError> {
    let ward = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Ward not found"))?;

    Ok(Json(WardResponse {
        id: ward.id,
        name: ward.name,
        data: ward.plan,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateWardRequest {
    pub data: Option<WardPlan>,
}

/// POST /api/ward/{id}: last-write-wins full plan replacement.
pub async fn update_ward(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateWardRequest>,
) -> Result<Json<Value>, ApiError> {
    let plan = req
        .data
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "Data is required"))?;

    state.store.replace_plan(&id, &plan).await?;
    Ok(Json(json!({ "success": true })))
}
