use serde::{Deserialize, Serialize};

use crate::domain::FieldErrors;

/// Envelope shared by every JSON response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Machine readable error code, e.g. `INVALID_TOKEN`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
            errors: None,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
            errors: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
            errors: None,
        }
    }

    pub fn error(
        code: impl Into<String>,
        message: impl Into<String>,
        errors: Option<FieldErrors>,
    ) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error: Some(code.into()),
            errors,
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// ============================================================================
// Resources
// ============================================================================

/// Integer fields arrive as JSON numbers or numeric strings, so they are
/// taken as raw values and checked by the validators.
#[derive(Debug, Default, Deserialize)]
pub struct MonitoriaRequest {
    pub persona_id: Option<serde_json::Value>,
    pub tipo_monitoria_id: Option<serde_json::Value>,
    pub dependencia_id: Option<serde_json::Value>,
    pub periodo_academico_id: Option<serde_json::Value>,
    pub descripcion: Option<String>,
    pub inicio: Option<String>,
    pub fin: Option<String>,
    pub horas_asignadas: Option<serde_json::Value>,
    pub estado: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JustificacionRequest {
    pub monitoria_id: Option<String>,
    pub persona_id: Option<serde_json::Value>,
    pub periodo_academico_id: Option<serde_json::Value>,
    pub tipo_justificacion_id: Option<serde_json::Value>,
    pub descripcion: Option<String>,
    pub fecha: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PersonaRequest {
    pub tipo_documento: Option<String>,
    pub numero_documento: Option<String>,
    #[serde(rename = "nombreA")]
    pub nombre_a: Option<String>,
    #[serde(rename = "nombreB")]
    pub nombre_b: Option<String>,
    #[serde(rename = "apellidoA")]
    pub apellido_a: Option<String>,
    #[serde(rename = "apellidoB")]
    pub apellido_b: Option<String>,
    pub correo_electronico: Option<String>,
    pub telefono: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub direccion: Option<String>,
    pub estado: Option<String>,
}

/// Body for dependencias and tipos de monitoria.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogRequest {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub estado: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PeriodoRequest {
    pub nombre: Option<String>,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    pub estado: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TipoJustificacionRequest {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
}
