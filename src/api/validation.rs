//! Request validation.
//!
//! Validators record every failure into a [`FieldErrors`] instead of bailing
//! on the first one, so a request is rejected wholesale with all of its
//! problems listed.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::types::{
    CatalogRequest, JustificacionRequest, MonitoriaRequest, PeriodoRequest, PersonaRequest,
    RegisterRequest, TipoJustificacionRequest,
};
use crate::constants::{estados, limits};
use crate::db::{
    CatalogInput, JustificacionInput, MonitoriaInput, PeriodoInput, PersonaInput,
    TipoJustificacionInput,
};
use crate::domain::FieldErrors;

/// Storage format for date-time columns.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage format for date-only columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex")
    })
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// RFC 3339.
#[must_use]
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT) {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn check_max(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("The {field} may not be greater than {max} characters."),
        );
    }
}

/// Required string, trimmed. Records an error and returns `None` when absent.
pub fn required_string(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let Some(value) = present(value) else {
        errors.add(field, format!("The {field} field is required."));
        return None;
    };
    check_max(errors, field, value, max);
    Some(value.to_string())
}

/// Optional string, trimmed; blank becomes `None`.
pub fn optional_string(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let value = present(value)?;
    check_max(errors, field, value, max);
    Some(value.to_string())
}

/// Required date; returns the parsed value.
pub fn required_datetime(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
) -> Option<NaiveDateTime> {
    let Some(value) = present(value) else {
        errors.add(field, format!("The {field} field is required."));
        return None;
    };
    let parsed = parse_datetime(value);
    if parsed.is_none() {
        errors.add(field, format!("The {field} is not a valid date."));
    }
    parsed
}

fn optional_date(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<String> {
    let value = present(value)?;
    match parse_datetime(value) {
        Some(dt) => Some(dt.format(DATE_FORMAT).to_string()),
        None => {
            errors.add(field, format!("The {field} is not a valid date."));
            None
        }
    }
}

/// Integer given as a JSON number or a numeric string.
pub fn required_integer(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<i64> {
    let parsed = match value {
        None | Some(Value::Null) => {
            errors.add(field, format!("The {field} field is required."));
            return None;
        }
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add(field, format!("The {field} field is required."));
            return None;
        }
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    if parsed.is_none() {
        errors.add(field, format!("The {field} must be an integer."));
    }
    parsed
}

/// Required reference to an integer-keyed row; existence is checked later.
pub fn required_id(errors: &mut FieldErrors, field: &str, value: Option<&Value>) -> Option<i32> {
    let id = required_integer(errors, field, value)?;
    match i32::try_from(id) {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.add(field, format!("The selected {field} is invalid."));
            None
        }
    }
}

/// Optional value restricted to `allowed`, falling back to `default`.
pub fn one_of(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    allowed: &[&str],
    default: Option<&str>,
) -> Option<String> {
    let value = match (present(value), default) {
        (Some(value), _) => value,
        (None, Some(default)) => return Some(default.to_string()),
        (None, None) => {
            errors.add(field, format!("The {field} field is required."));
            return None;
        }
    };

    if allowed.contains(&value) {
        Some(value.to_string())
    } else {
        errors.add(field, format!("The selected {field} is invalid."));
        None
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Validated registration fields.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Shape checks for a registration. Email uniqueness needs the store and is
/// checked by the auth service.
pub fn validate_register(
    req: RegisterRequest,
    password_min_length: usize,
) -> Result<Registration, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required_string(&mut errors, "name", req.name.as_deref(), limits::MAX_NAME_LENGTH);
    let email = required_string(
        &mut errors,
        "email",
        req.email.as_deref(),
        limits::MAX_EMAIL_LENGTH,
    )
    .map(|e| e.to_lowercase());
    if let Some(email) = &email
        && !is_valid_email(email)
    {
        errors.add("email", "The email must be a valid email address.");
    }

    let password = match req.password.filter(|p| !p.is_empty()) {
        Some(password) => {
            if password.chars().count() < password_min_length {
                errors.add(
                    "password",
                    format!("The password must be at least {password_min_length} characters."),
                );
            }
            if req.password_confirmation.as_deref() != Some(password.as_str()) {
                errors.add("password", "The password confirmation does not match.");
            }
            Some(password)
        }
        None => {
            errors.add("password", "The password field is required.");
            None
        }
    };

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) if errors.is_empty() => Ok(Registration {
            name,
            email,
            password,
        }),
        _ => Err(errors),
    }
}

/// Login only checks presence; wrong values are reported as invalid
/// credentials, not field errors.
pub fn validate_login(
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = required_string(&mut errors, "email", email.as_deref(), limits::MAX_EMAIL_LENGTH)
        .map(|e| e.to_lowercase());
    let password = password.filter(|p| !p.is_empty());
    if password.is_none() {
        errors.add("password", "The password field is required.");
    }

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok((email, password)),
        _ => Err(errors),
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Monitoria fields that passed their shape checks.
///
/// Reference ids that parsed are kept even when other fields failed, so the
/// handler can add existence errors to the same set before rejecting.
#[derive(Debug, Default)]
pub struct MonitoriaDraft {
    pub persona_id: Option<i32>,
    pub tipo_monitoria_id: Option<i32>,
    pub dependencia_id: Option<i32>,
    pub periodo_academico_id: Option<i32>,
    pub descripcion: Option<String>,
    pub inicio: Option<String>,
    pub fin: Option<String>,
    pub horas_asignadas: Option<i32>,
    pub estado: Option<String>,
}

impl MonitoriaDraft {
    /// `None` while any required field is missing.
    #[must_use]
    pub fn into_input(self) -> Option<MonitoriaInput> {
        Some(MonitoriaInput {
            persona_id: self.persona_id?,
            tipo_monitoria_id: self.tipo_monitoria_id?,
            dependencia_id: self.dependencia_id?,
            periodo_academico_id: self.periodo_academico_id?,
            descripcion: self.descripcion,
            inicio: self.inicio?,
            fin: self.fin?,
            horas_asignadas: self.horas_asignadas?,
            estado: self.estado?,
        })
    }
}

/// Shape checks for a monitoria. Foreign key existence is checked by the
/// handler against the store, into the returned error set.
pub fn validate_monitoria(req: &MonitoriaRequest) -> (MonitoriaDraft, FieldErrors) {
    let mut errors = FieldErrors::new();

    let persona_id = required_id(&mut errors, "persona_id", req.persona_id.as_ref());
    let tipo_monitoria_id =
        required_id(&mut errors, "tipo_monitoria_id", req.tipo_monitoria_id.as_ref());
    let dependencia_id = required_id(&mut errors, "dependencia_id", req.dependencia_id.as_ref());
    let periodo_academico_id = required_id(
        &mut errors,
        "periodo_academico_id",
        req.periodo_academico_id.as_ref(),
    );
    let descripcion = optional_string(
        &mut errors,
        "descripcion",
        req.descripcion.as_deref(),
        limits::MAX_DESCRIPCION_LENGTH,
    );
    let inicio = required_datetime(&mut errors, "inicio", req.inicio.as_deref());
    let fin = required_datetime(&mut errors, "fin", req.fin.as_deref());
    if let (Some(inicio), Some(fin)) = (inicio, fin)
        && fin < inicio
    {
        errors.add("fin", "The fin must be a date after or equal to inicio.");
    }

    let horas_asignadas = required_integer(
        &mut errors,
        "horas_asignadas",
        req.horas_asignadas.as_ref(),
    )
    .and_then(|h| match i32::try_from(h) {
        Ok(h) if h >= 1 => Some(h),
        _ => {
            errors.add("horas_asignadas", "The horas_asignadas must be at least 1.");
            None
        }
    });
    let estado = one_of(
        &mut errors,
        "estado",
        req.estado.as_deref(),
        estados::ALL,
        None,
    );

    let draft = MonitoriaDraft {
        persona_id,
        tipo_monitoria_id,
        dependencia_id,
        periodo_academico_id,
        descripcion,
        inicio: inicio.map(|dt| dt.format(DATETIME_FORMAT).to_string()),
        fin: fin.map(|dt| dt.format(DATETIME_FORMAT).to_string()),
        horas_asignadas,
        estado,
    };
    (draft, errors)
}

/// Justificacion fields that passed their shape checks.
#[derive(Debug, Default)]
pub struct JustificacionDraft {
    pub monitoria_id: Option<String>,
    pub persona_id: Option<i32>,
    pub periodo_academico_id: Option<i32>,
    pub tipo_justificacion_id: Option<i32>,
    pub descripcion: Option<String>,
    pub fecha: Option<String>,
}

impl JustificacionDraft {
    #[must_use]
    pub fn into_input(self) -> Option<JustificacionInput> {
        Some(JustificacionInput {
            monitoria_id: self.monitoria_id?,
            persona_id: self.persona_id?,
            periodo_academico_id: self.periodo_academico_id?,
            tipo_justificacion_id: self.tipo_justificacion_id?,
            descripcion: self.descripcion?,
            fecha: self.fecha,
        })
    }
}

pub fn validate_justificacion(req: &JustificacionRequest) -> (JustificacionDraft, FieldErrors) {
    let mut errors = FieldErrors::new();

    let monitoria_id = required_string(&mut errors, "monitoria_id", req.monitoria_id.as_deref(), 36);
    let persona_id = required_id(&mut errors, "persona_id", req.persona_id.as_ref());
    let periodo_academico_id = required_id(
        &mut errors,
        "periodo_academico_id",
        req.periodo_academico_id.as_ref(),
    );
    let tipo_justificacion_id = required_id(
        &mut errors,
        "tipo_justificacion_id",
        req.tipo_justificacion_id.as_ref(),
    );
    let descripcion = present(req.descripcion.as_deref()).map(str::to_string);
    if descripcion.is_none() {
        errors.add("descripcion", "The descripcion field is required.");
    }
    let fecha = optional_date(&mut errors, "fecha", req.fecha.as_deref());

    let draft = JustificacionDraft {
        monitoria_id,
        persona_id,
        periodo_academico_id,
        tipo_justificacion_id,
        descripcion,
        fecha,
    };
    (draft, errors)
}

pub fn validate_persona(req: &PersonaRequest) -> Result<PersonaInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let tipo_documento =
        required_string(&mut errors, "tipo_documento", req.tipo_documento.as_deref(), 50);
    let numero_documento =
        optional_string(&mut errors, "numero_documento", req.numero_documento.as_deref(), 45);
    let nombre_a = optional_string(&mut errors, "nombreA", req.nombre_a.as_deref(), 45);
    let nombre_b = optional_string(&mut errors, "nombreB", req.nombre_b.as_deref(), 45);
    let apellido_a = optional_string(&mut errors, "apellidoA", req.apellido_a.as_deref(), 45);
    let apellido_b = optional_string(&mut errors, "apellidoB", req.apellido_b.as_deref(), 45);
    let correo_electronico = optional_string(
        &mut errors,
        "correo_electronico",
        req.correo_electronico.as_deref(),
        100,
    );
    if let Some(correo) = &correo_electronico
        && !is_valid_email(correo)
    {
        errors.add(
            "correo_electronico",
            "The correo_electronico must be a valid email address.",
        );
    }
    let telefono = optional_string(&mut errors, "telefono", req.telefono.as_deref(), 20);
    let fecha_nacimiento =
        optional_date(&mut errors, "fecha_nacimiento", req.fecha_nacimiento.as_deref());
    let direccion = optional_string(&mut errors, "direccion", req.direccion.as_deref(), 255);
    let estado = one_of(
        &mut errors,
        "estado",
        req.estado.as_deref(),
        estados::PERSONA_ALL,
        Some("1"),
    );

    match (tipo_documento, estado) {
        (Some(tipo_documento), Some(estado)) if errors.is_empty() => Ok(PersonaInput {
            tipo_documento,
            numero_documento,
            nombre_a,
            nombre_b,
            apellido_a,
            apellido_b,
            correo_electronico,
            telefono,
            fecha_nacimiento,
            direccion,
            estado,
        }),
        _ => Err(errors),
    }
}

pub fn validate_catalog(req: &CatalogRequest) -> Result<CatalogInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let nombre = required_string(&mut errors, "nombre", req.nombre.as_deref(), 100);
    let descripcion = optional_string(
        &mut errors,
        "descripcion",
        req.descripcion.as_deref(),
        limits::MAX_DESCRIPCION_LENGTH,
    );
    let estado = one_of(
        &mut errors,
        "estado",
        req.estado.as_deref(),
        estados::ALL,
        Some(estados::ACTIVO),
    );

    match (nombre, estado) {
        (Some(nombre), Some(estado)) if errors.is_empty() => Ok(CatalogInput {
            nombre,
            descripcion,
            estado,
        }),
        _ => Err(errors),
    }
}

pub fn validate_periodo(req: &PeriodoRequest) -> Result<PeriodoInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let nombre = required_string(&mut errors, "nombre", req.nombre.as_deref(), 100);
    let fecha_inicio = required_datetime(&mut errors, "fecha_inicio", req.fecha_inicio.as_deref());
    let fecha_fin = required_datetime(&mut errors, "fecha_fin", req.fecha_fin.as_deref());
    if let (Some(inicio), Some(fin)) = (fecha_inicio, fecha_fin)
        && fin < inicio
    {
        errors.add(
            "fecha_fin",
            "The fecha_fin must be a date after or equal to fecha_inicio.",
        );
    }
    let estado = one_of(
        &mut errors,
        "estado",
        req.estado.as_deref(),
        estados::ALL,
        Some(estados::ACTIVO),
    );

    match (nombre, fecha_inicio, fecha_fin, estado) {
        (Some(nombre), Some(inicio), Some(fin), Some(estado)) if errors.is_empty() => {
            Ok(PeriodoInput {
                nombre,
                fecha_inicio: inicio.format(DATE_FORMAT).to_string(),
                fecha_fin: fin.format(DATE_FORMAT).to_string(),
                estado,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_tipo_justificacion(
    req: &TipoJustificacionRequest,
) -> Result<TipoJustificacionInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let nombre = required_string(&mut errors, "nombre", req.nombre.as_deref(), 100);
    let descripcion = optional_string(
        &mut errors,
        "descripcion",
        req.descripcion.as_deref(),
        limits::MAX_DESCRIPCION_LENGTH,
    );

    match nombre {
        Some(nombre) if errors.is_empty() => Ok(TipoJustificacionInput {
            nombre,
            descripcion,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register(password: &str, confirmation: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some("Juan Pérez".into()),
            email: Some("Juan@Ejemplo.com".into()),
            password: Some(password.into()),
            password_confirmation: Some(confirmation.into()),
        }
    }

    fn monitoria() -> MonitoriaRequest {
        MonitoriaRequest {
            persona_id: Some(json!(1)),
            tipo_monitoria_id: Some(json!("2")),
            dependencia_id: Some(json!(3)),
            periodo_academico_id: Some(json!(4)),
            descripcion: Some("Monitoria de cálculo".into()),
            inicio: Some("2025-02-01".into()),
            fin: Some("2025-06-30 18:00:00".into()),
            horas_asignadas: Some(json!(10)),
            estado: Some("activo".into()),
        }
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("juan@ejemplo.com"));
        assert!(!is_valid_email("juan@ejemplo"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email("@ejemplo.com"));
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 2, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(parse_datetime("2025-02-01"), Some(expected));
        assert_eq!(parse_datetime("2025-02-01 00:00:00"), Some(expected));
        assert_eq!(parse_datetime("2025-02-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_datetime("01/02/2025"), None);
    }

    #[test]
    fn test_register_valid() {
        let reg = validate_register(register("password123", "password123"), 8).unwrap();
        assert_eq!(reg.email, "juan@ejemplo.com");
        assert_eq!(reg.name, "Juan Pérez");
    }

    #[test]
    fn test_register_confirmation_mismatch() {
        let errors = validate_register(register("password123", "different123"), 8).unwrap_err();
        assert!(errors.contains("password"));
        assert!(!errors.contains("email"));
    }

    #[test]
    fn test_register_reports_everything() {
        let errors = validate_register(RegisterRequest::default(), 8).unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("email"));
        assert!(errors.contains("password"));
    }

    #[test]
    fn test_register_short_password() {
        let errors = validate_register(register("short", "short"), 8).unwrap_err();
        assert_eq!(
            errors.get("password").and_then(|m| m.first()).map(String::as_str),
            Some("The password must be at least 8 characters.")
        );
    }

    #[test]
    fn test_login_requires_fields() {
        let errors = validate_login(None, Some(String::new())).unwrap_err();
        assert!(errors.contains("email"));
        assert!(errors.contains("password"));
    }

    #[test]
    fn test_monitoria_valid_normalizes_dates() {
        let (draft, errors) = validate_monitoria(&monitoria());
        assert!(errors.is_empty());
        let input = draft.into_input().unwrap();
        assert_eq!(input.tipo_monitoria_id, 2);
        assert_eq!(input.inicio, "2025-02-01 00:00:00");
        assert_eq!(input.fin, "2025-06-30 18:00:00");
    }

    #[test]
    fn test_monitoria_empty_reports_all_required() {
        let (draft, errors) = validate_monitoria(&MonitoriaRequest::default());
        assert!(draft.into_input().is_none());
        for field in [
            "persona_id",
            "tipo_monitoria_id",
            "dependencia_id",
            "periodo_academico_id",
            "inicio",
            "fin",
            "horas_asignadas",
            "estado",
        ] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert!(!errors.contains("descripcion"));
    }

    #[test]
    fn test_monitoria_fin_before_inicio() {
        let req = MonitoriaRequest {
            inicio: Some("2025-06-30".into()),
            fin: Some("2025-02-01".into()),
            ..monitoria()
        };
        let (_, errors) = validate_monitoria(&req);
        assert!(errors.contains("fin"));
    }

    #[test]
    fn test_monitoria_rejects_bad_values() {
        let req = MonitoriaRequest {
            horas_asignadas: Some(json!(0)),
            estado: Some("pausado".into()),
            descripcion: Some("x".repeat(256)),
            persona_id: Some(json!("abc")),
            ..monitoria()
        };
        let (draft, errors) = validate_monitoria(&req);
        assert!(errors.contains("horas_asignadas"));
        assert!(errors.contains("estado"));
        assert!(errors.contains("descripcion"));
        assert!(errors.contains("persona_id"));
        assert!(draft.persona_id.is_none());
    }

    #[test]
    fn test_monitoria_keeps_parsed_ids_alongside_errors() {
        let req = MonitoriaRequest {
            horas_asignadas: Some(json!(0)),
            ..monitoria()
        };
        let (draft, errors) = validate_monitoria(&req);
        assert!(errors.contains("horas_asignadas"));
        assert_eq!(draft.persona_id, Some(1));
        assert_eq!(draft.periodo_academico_id, Some(4));
    }

    #[test]
    fn test_justificacion_keeps_parsed_ids_alongside_errors() {
        let (draft, errors) = validate_justificacion(&JustificacionRequest {
            monitoria_id: Some("abc".into()),
            persona_id: Some(json!(5)),
            ..Default::default()
        });
        assert!(errors.contains("descripcion"));
        assert!(errors.contains("tipo_justificacion_id"));
        assert_eq!(draft.monitoria_id.as_deref(), Some("abc"));
        assert_eq!(draft.persona_id, Some(5));
        assert!(draft.into_input().is_none());
    }

    #[test]
    fn test_catalog_defaults_estado() {
        let input = validate_catalog(&CatalogRequest {
            nombre: Some("Facultad de Ingeniería".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(input.estado, estados::ACTIVO);
        assert!(input.descripcion.is_none());
    }

    #[test]
    fn test_persona_checks_email_and_estado() {
        let errors = validate_persona(&PersonaRequest {
            tipo_documento: Some("CC".into()),
            correo_electronico: Some("nope".into()),
            estado: Some("activo".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(errors.contains("correo_electronico"));
        assert!(errors.contains("estado"));
    }

    #[test]
    fn test_periodo_order() {
        let errors = validate_periodo(&PeriodoRequest {
            nombre: Some("2025-1".into()),
            fecha_inicio: Some("2025-06-01".into()),
            fecha_fin: Some("2025-01-01".into()),
            estado: None,
        })
        .unwrap_err();
        assert!(errors.contains("fecha_fin"));
    }
}
