use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::types::JustificacionRequest;
use super::validation::validate_justificacion;
use super::{ApiError, ApiResponse, AppState};
use crate::entities::justificaciones;

pub async fn list_justificaciones(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<justificaciones::Model>>>, ApiError> {
    let justificaciones = state.store().list_justificaciones().await?;
    Ok(Json(ApiResponse::success(justificaciones)))
}

/// GET /monitorias/{id}/justificaciones
pub async fn list_for_monitoria(
    State(state): State<Arc<AppState>>,
    Path(monitoria_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<justificaciones::Model>>>, ApiError> {
    if !state.store().monitoria_exists(&monitoria_id).await? {
        return Err(ApiError::not_found("Monitoria", &monitoria_id));
    }

    let justificaciones = state
        .store()
        .list_justificaciones_for_monitoria(&monitoria_id)
        .await?;
    Ok(Json(ApiResponse::success(justificaciones)))
}

pub async fn get_justificacion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<justificaciones::Model>>, ApiError> {
    let justificacion = state
        .store()
        .get_justificacion(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Justificacion", &id))?;
    Ok(Json(ApiResponse::success(justificacion)))
}

pub async fn create_justificacion(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<JustificacionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let (draft, mut errors) = validate_justificacion(&request);
    let store = state.store();

    if let Some(id) = draft.monitoria_id.as_deref()
        && !store.monitoria_exists(id).await?
    {
        errors.add("monitoria_id", "The selected monitoria_id is invalid.");
    }
    if let Some(id) = draft.persona_id
        && !store.persona_exists(id).await?
    {
        errors.add("persona_id", "The selected persona_id is invalid.");
    }
    if let Some(id) = draft.periodo_academico_id
        && !store.periodo_exists(id).await?
    {
        errors.add(
            "periodo_academico_id",
            "The selected periodo_academico_id is invalid.",
        );
    }
    if let Some(id) = draft.tipo_justificacion_id
        && !store.tipo_justificacion_exists(id).await?
    {
        errors.add(
            "tipo_justificacion_id",
            "The selected tipo_justificacion_id is invalid.",
        );
    }
    errors.into_result()?;

    let input = draft
        .into_input()
        .ok_or_else(|| ApiError::validation("The given data was invalid"))?;

    let justificacion = store.create_justificacion(input).await?;
    tracing::info!(
        justificacion_id = %justificacion.id,
        monitoria_id = %justificacion.monitoria_id,
        "Justificacion created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Justificacion created successfully",
            justificacion,
        )),
    ))
}

pub async fn delete_justificacion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().delete_justificacion(&id).await? {
        return Err(ApiError::not_found("Justificacion", &id));
    }
    Ok(Json(ApiResponse::message(
        "Justificacion deleted successfully",
    )))
}
