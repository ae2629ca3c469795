use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::types::MonitoriaRequest;
use super::validation::validate_monitoria;
use super::{ApiError, ApiResponse, AppState};
use crate::db::MonitoriaInput;
use crate::entities::monitorias;

/// Shape-check the body and check that every referenced row exists,
/// reporting both kinds of failure together.
async fn validated_input(
    state: &AppState,
    request: &MonitoriaRequest,
) -> Result<MonitoriaInput, ApiError> {
    let (draft, mut errors) = validate_monitoria(request);
    let store = state.store();

    if let Some(id) = draft.persona_id
        && !store.persona_exists(id).await?
    {
        errors.add("persona_id", "The selected persona_id is invalid.");
    }
    if let Some(id) = draft.tipo_monitoria_id
        && !store.tipo_monitoria_exists(id).await?
    {
        errors.add("tipo_monitoria_id", "The selected tipo_monitoria_id is invalid.");
    }
    if let Some(id) = draft.dependencia_id
        && !store.dependencia_exists(id).await?
    {
        errors.add("dependencia_id", "The selected dependencia_id is invalid.");
    }
    if let Some(id) = draft.periodo_academico_id
        && !store.periodo_exists(id).await?
    {
        errors.add(
            "periodo_academico_id",
            "The selected periodo_academico_id is invalid.",
        );
    }
    errors.into_result()?;

    draft
        .into_input()
        .ok_or_else(|| ApiError::validation("The given data was invalid"))
}

pub async fn list_monitorias(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<monitorias::Model>>>, ApiError> {
    let monitorias = state.store().list_monitorias().await?;
    Ok(Json(ApiResponse::success(monitorias)))
}

pub async fn get_monitoria(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<monitorias::Model>>, ApiError> {
    let monitoria = state
        .store()
        .get_monitoria(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Monitoria", &id))?;
    Ok(Json(ApiResponse::success(monitoria)))
}

pub async fn create_monitoria(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MonitoriaRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let input = validated_input(&state, &request).await?;

    let monitoria = state.store().create_monitoria(input).await?;
    tracing::info!(monitoria_id = %monitoria.id, "Monitoria created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Monitoria created successfully",
            monitoria,
        )),
    ))
}

pub async fn update_monitoria(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<MonitoriaRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<monitorias::Model>>, ApiError> {
    let Json(request) = payload?;

    if !state.store().monitoria_exists(&id).await? {
        return Err(ApiError::not_found("Monitoria", &id));
    }

    let input = validated_input(&state, &request).await?;
    let monitoria = state
        .store()
        .update_monitoria(&id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Monitoria", &id))?;

    Ok(Json(ApiResponse::with_message(
        "Monitoria updated successfully",
        monitoria,
    )))
}

pub async fn delete_monitoria(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().delete_monitoria(&id).await? {
        return Err(ApiError::not_found("Monitoria", &id));
    }
    tracing::info!(monitoria_id = %id, "Monitoria deleted");
    Ok(Json(ApiResponse::message("Monitoria deleted successfully")))
}
