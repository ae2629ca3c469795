//! CRUD handlers for the reference tables.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::types::{CatalogRequest, PeriodoRequest, PersonaRequest, TipoJustificacionRequest};
use super::validation::{validate_catalog, validate_periodo, validate_persona, validate_tipo_justificacion};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::FieldErrors;
use crate::entities::{
    dependencias, periodos_academicos, personas, tipos_justificacion, tipos_monitoria,
};

fn deleted(resource: &str) -> Json<ApiResponse<()>> {
    Json(ApiResponse::message(format!("{resource} deleted successfully")))
}

// ============================================================================
// Personas
// ============================================================================

pub async fn list_personas(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<personas::Model>>>, ApiError> {
    let personas = state.store().list_personas().await?;
    Ok(Json(ApiResponse::success(personas)))
}

pub async fn get_persona(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<personas::Model>>, ApiError> {
    let persona = state
        .store()
        .get_persona(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Persona", id))?;
    Ok(Json(ApiResponse::success(persona)))
}

async fn check_numero_documento(
    state: &AppState,
    numero_documento: Option<&str>,
    except_id: Option<i32>,
) -> Result<(), ApiError> {
    if let Some(numero) = numero_documento
        && state
            .store()
            .numero_documento_taken(numero, except_id)
            .await?
    {
        return Err(FieldErrors::single(
            "numero_documento",
            "The numero_documento has already been taken.",
        )
        .into());
    }
    Ok(())
}

pub async fn create_persona(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PersonaRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let input = validate_persona(&request)?;
    check_numero_documento(&state, input.numero_documento.as_deref(), None).await?;

    let persona = state.store().create_persona(input).await?;
    tracing::info!(persona_id = persona.id, "Persona created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Persona created successfully", persona)),
    ))
}

pub async fn update_persona(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<PersonaRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<personas::Model>>, ApiError> {
    let Json(request) = payload?;
    let input = validate_persona(&request)?;
    check_numero_documento(&state, input.numero_documento.as_deref(), Some(id)).await?;

    let persona = state
        .store()
        .update_persona(id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Persona", id))?;

    Ok(Json(ApiResponse::with_message(
        "Persona updated successfully",
        persona,
    )))
}

pub async fn delete_persona(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().delete_persona(id).await? {
        return Err(ApiError::not_found("Persona", id));
    }
    Ok(deleted("Persona"))
}

// ============================================================================
// Dependencias
// ============================================================================

pub async fn list_dependencias(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<dependencias::Model>>>, ApiError> {
    let dependencias = state.store().list_dependencias().await?;
    Ok(Json(ApiResponse::success(dependencias)))
}

pub async fn get_dependencia(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<dependencias::Model>>, ApiError> {
    let dependencia = state
        .store()
        .get_dependencia(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Dependencia", id))?;
    Ok(Json(ApiResponse::success(dependencia)))
}

pub async fn create_dependencia(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CatalogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let input = validate_catalog(&request)?;
    let dependencia = state.store().create_dependencia(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Dependencia created successfully",
            dependencia,
        )),
    ))
}

pub async fn update_dependencia(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<CatalogRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<dependencias::Model>>, ApiError> {
    let Json(request) = payload?;
    let input = validate_catalog(&request)?;

    let dependencia = state
        .store()
        .update_dependencia(id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Dependencia", id))?;

    Ok(Json(ApiResponse::with_message(
        "Dependencia updated successfully",
        dependencia,
    )))
}

pub async fn delete_dependencia(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().delete_dependencia(id).await? {
        return Err(ApiError::not_found("Dependencia", id));
    }
    Ok(deleted("Dependencia"))
}

// ============================================================================
// Tipos de monitoria
// ============================================================================

pub async fn list_tipos_monitoria(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<tipos_monitoria::Model>>>, ApiError> {
    let tipos = state.store().list_tipos_monitoria().await?;
    Ok(Json(ApiResponse::success(tipos)))
}

pub async fn get_tipo_monitoria(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<tipos_monitoria::Model>>, ApiError> {
    let tipo = state
        .store()
        .get_tipo_monitoria(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tipo de monitoria", id))?;
    Ok(Json(ApiResponse::success(tipo)))
}

pub async fn create_tipo_monitoria(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CatalogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let input = validate_catalog(&request)?;
    let tipo = state.store().create_tipo_monitoria(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Tipo de monitoria created successfully",
            tipo,
        )),
    ))
}

pub async fn update_tipo_monitoria(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<CatalogRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<tipos_monitoria::Model>>, ApiError> {
    let Json(request) = payload?;
    let input = validate_catalog(&request)?;

    let tipo = state
        .store()
        .update_tipo_monitoria(id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Tipo de monitoria", id))?;

    Ok(Json(ApiResponse::with_message(
        "Tipo de monitoria updated successfully",
        tipo,
    )))
}

pub async fn delete_tipo_monitoria(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().delete_tipo_monitoria(id).await? {
        return Err(ApiError::not_found("Tipo de monitoria", id));
    }
    Ok(deleted("Tipo de monitoria"))
}

// ============================================================================
// Periodos academicos
// ============================================================================

pub async fn list_periodos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<periodos_academicos::Model>>>, ApiError> {
    let periodos = state.store().list_periodos().await?;
    Ok(Json(ApiResponse::success(periodos)))
}

pub async fn get_periodo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<periodos_academicos::Model>>, ApiError> {
    let periodo = state
        .store()
        .get_periodo(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Periodo academico", id))?;
    Ok(Json(ApiResponse::success(periodo)))
}

pub async fn create_periodo(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PeriodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let input = validate_periodo(&request)?;
    let periodo = state.store().create_periodo(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Periodo academico created successfully",
            periodo,
        )),
    ))
}

pub async fn update_periodo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<PeriodoRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<periodos_academicos::Model>>, ApiError> {
    let Json(request) = payload?;
    let input = validate_periodo(&request)?;

    let periodo = state
        .store()
        .update_periodo(id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Periodo academico", id))?;

    Ok(Json(ApiResponse::with_message(
        "Periodo academico updated successfully",
        periodo,
    )))
}

pub async fn delete_periodo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().delete_periodo(id).await? {
        return Err(ApiError::not_found("Periodo academico", id));
    }
    Ok(deleted("Periodo academico"))
}

// ============================================================================
// Tipos de justificacion
// ============================================================================

pub async fn list_tipos_justificacion(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<tipos_justificacion::Model>>>, ApiError> {
    let tipos = state.store().list_tipos_justificacion().await?;
    Ok(Json(ApiResponse::success(tipos)))
}

pub async fn get_tipo_justificacion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<tipos_justificacion::Model>>, ApiError> {
    let tipo = state
        .store()
        .get_tipo_justificacion(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tipo de justificacion", id))?;
    Ok(Json(ApiResponse::success(tipo)))
}

async fn check_tipo_justificacion_nombre(
    state: &AppState,
    nombre: &str,
    except_id: Option<i32>,
) -> Result<(), ApiError> {
    if state
        .store()
        .tipo_justificacion_nombre_taken(nombre, except_id)
        .await?
    {
        return Err(FieldErrors::single("nombre", "The nombre has already been taken.").into());
    }
    Ok(())
}

pub async fn create_tipo_justificacion(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TipoJustificacionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let input = validate_tipo_justificacion(&request)?;
    check_tipo_justificacion_nombre(&state, &input.nombre, None).await?;

    let tipo = state.store().create_tipo_justificacion(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Tipo de justificacion created successfully",
            tipo,
        )),
    ))
}

pub async fn update_tipo_justificacion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<TipoJustificacionRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<tipos_justificacion::Model>>, ApiError> {
    let Json(request) = payload?;
    let input = validate_tipo_justificacion(&request)?;
    check_tipo_justificacion_nombre(&state, &input.nombre, Some(id)).await?;

    let tipo = state
        .store()
        .update_tipo_justificacion(id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Tipo de justificacion", id))?;

    Ok(Json(ApiResponse::with_message(
        "Tipo de justificacion updated successfully",
        tipo,
    )))
}

pub async fn delete_tipo_justificacion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().delete_tipo_justificacion(id).await? {
        return Err(ApiError::not_found("Tipo de justificacion", id));
    }
    Ok(deleted("Tipo de justificacion"))
}
