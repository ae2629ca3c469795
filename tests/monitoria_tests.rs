//! Integration tests for monitorias, justificaciones and the reference
//! tables they point at.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use monitorias::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    token: String,
}

impl TestApp {
    async fn spawn() -> Self {
        let db_path = std::env::temp_dir().join(format!(
            "monitorias-resource-test-{}.db",
            uuid::Uuid::new_v4()
        ));

        let mut config = Config::default();
        config.general.database_path = format!("sqlite:{}", db_path.display());
        config.security.argon2_memory_cost_kib = 1024;
        config.security.argon2_time_cost = 1;

        let state = monitorias::api::create_app_state_from_config(config, None)
            .await
            .expect("Failed to create app state");
        let router = monitorias::api::router(state);

        let mut app = Self {
            router,
            token: String::new(),
        };

        let (status, body) = app
            .send(
                "POST",
                "/api/register",
                Some(json!({
                    "name": "Admin",
                    "email": "admin@ejemplo.com",
                    "password": "password123",
                    "password_confirmation": "password123"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        app.token = body["data"]["token"].as_str().unwrap().to_string();
        app
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if !self.token.is_empty() {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn create(&self, uri: &str, body: Value) -> Value {
        let (status, response) = self.send("POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{uri}: {response}");
        response["data"]["id"].clone()
    }

    /// Persona, tipo, dependencia and periodo ids for a valid monitoria.
    async fn references(&self) -> (Value, Value, Value, Value) {
        let persona = self
            .create(
                "/api/personas",
                json!({
                    "tipo_documento": "CC",
                    "numero_documento": "1010101010",
                    "nombreA": "Ana",
                    "apellidoA": "Gómez",
                    "correo_electronico": "ana@ejemplo.com"
                }),
            )
            .await;
        let tipo = self
            .create(
                "/api/tipos-monitoria",
                json!({"nombre": "Académica", "descripcion": "Apoyo en asignaturas"}),
            )
            .await;
        let dependencia = self
            .create("/api/dependencias", json!({"nombre": "Facultad de Ingeniería"}))
            .await;
        let periodo = self
            .create(
                "/api/periodos-academicos",
                json!({
                    "nombre": "2025-1",
                    "fecha_inicio": "2025-02-01",
                    "fecha_fin": "2025-06-30"
                }),
            )
            .await;
        (persona, tipo, dependencia, periodo)
    }

    async fn create_monitoria(&self) -> (String, Value) {
        let (persona, tipo, dependencia, periodo) = self.references().await;
        let payload = json!({
            "persona_id": persona,
            "tipo_monitoria_id": tipo,
            "dependencia_id": dependencia,
            "periodo_academico_id": periodo,
            "descripcion": "Monitoria de cálculo diferencial",
            "inicio": "2025-02-03 08:00:00",
            "fin": "2025-06-27 18:00:00",
            "horas_asignadas": 64,
            "estado": "activo"
        });

        let (status, body) = self.send("POST", "/api/monitorias", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (body["data"]["id"].as_str().unwrap().to_string(), payload)
    }
}

#[tokio::test]
async fn test_create_monitoria() {
    let app = TestApp::spawn().await;
    let (persona, tipo, dependencia, periodo) = app.references().await;

    let (status, body) = app
        .send(
            "POST",
            "/api/monitorias",
            Some(json!({
                "persona_id": persona,
                "tipo_monitoria_id": tipo,
                "dependencia_id": dependencia,
                "periodo_academico_id": periodo,
                "inicio": "2025-02-03",
                "fin": "2025-06-27",
                "horas_asignadas": 64,
                "estado": "activo"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Monitoria created successfully");
    let id = body["data"]["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(body["data"]["inicio"], "2025-02-03 00:00:00");
    assert_eq!(body["data"]["horas_asignadas"], 64);
    assert!(body["data"]["descripcion"].is_null());
}

#[tokio::test]
async fn test_create_monitoria_empty_payload() {
    let app = TestApp::spawn().await;

    let (status, body) = app.send("POST", "/api/monitorias", Some(json!({}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "VALIDATION_ERROR");
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
        assert!(body["errors"][field].is_array(), "missing error for {field}");
    }
}

#[tokio::test]
async fn test_create_monitoria_unknown_references() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .send(
            "POST",
            "/api/monitorias",
            Some(json!({
                "persona_id": 999,
                "tipo_monitoria_id": 999,
                "dependencia_id": 999,
                "periodo_academico_id": 999,
                "inicio": "2025-02-03",
                "fin": "2025-06-27",
                "horas_asignadas": 10,
                "estado": "activo"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["persona_id"].is_array());
    assert!(body["errors"]["periodo_academico_id"].is_array());
    assert!(body["errors"].get("inicio").is_none());
}

#[tokio::test]
async fn test_create_monitoria_reports_shape_and_reference_errors_together() {
    let app = TestApp::spawn().await;
    let (_, tipo, dependencia, periodo) = app.references().await;

    let (status, body) = app
        .send(
            "POST",
            "/api/monitorias",
            Some(json!({
                "persona_id": 999,
                "tipo_monitoria_id": tipo,
                "dependencia_id": dependencia,
                "periodo_academico_id": periodo,
                "inicio": "2025-02-03",
                "fin": "2025-06-27",
                "horas_asignadas": 0,
                "estado": "activo"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["persona_id"][0],
        "The selected persona_id is invalid."
    );
    assert!(body["errors"]["horas_asignadas"].is_array());
    assert!(body["errors"].get("tipo_monitoria_id").is_none());
    assert!(body["errors"].get("periodo_academico_id").is_none());
}

#[tokio::test]
async fn test_create_monitoria_fin_before_inicio() {
    let app = TestApp::spawn().await;
    let (persona, tipo, dependencia, periodo) = app.references().await;

    let (status, body) = app
        .send(
            "POST",
            "/api/monitorias",
            Some(json!({
                "persona_id": persona,
                "tipo_monitoria_id": tipo,
                "dependencia_id": dependencia,
                "periodo_academico_id": periodo,
                "inicio": "2025-06-27",
                "fin": "2025-02-03",
                "horas_asignadas": 0,
                "estado": "pendiente"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["fin"].is_array());
    assert!(body["errors"]["horas_asignadas"].is_array());
    assert!(body["errors"]["estado"].is_array());
}

#[tokio::test]
async fn test_monitoria_show_update_delete() {
    let app = TestApp::spawn().await;
    let (id, mut payload) = app.create_monitoria().await;

    let (status, body) = app.send("GET", &format!("/api/monitorias/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["estado"], "activo");

    let (status, body) = app.send("GET", "/api/monitorias", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    payload["estado"] = json!("inactivo");
    payload["horas_asignadas"] = json!("32");
    let (status, body) = app
        .send("PUT", &format!("/api/monitorias/{id}"), Some(payload))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["estado"], "inactivo");
    assert_eq!(body["data"]["horas_asignadas"], 32);
    assert_eq!(body["data"]["id"], id.as_str());

    let (status, _) = app.send("DELETE", &format!("/api/monitorias/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send("GET", &format!("/api/monitorias/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) = app.send("DELETE", &format!("/api/monitorias/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_monitoria() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .send(
            "PUT",
            "/api/monitorias/00000000-0000-0000-0000-000000000000",
            Some(json!({})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_justificaciones_for_monitoria() {
    let app = TestApp::spawn().await;
    let (id, payload) = app.create_monitoria().await;

    let (status, body) = app.send("GET", "/api/tipos-justificacion", None).await;
    assert_eq!(status, StatusCode::OK);
    let tipos = body["data"].as_array().unwrap();
    assert_eq!(tipos.len(), 4);
    let enfermedad = tipos
        .iter()
        .find(|t| t["nombre"] == "Enfermedad")
        .unwrap()["id"]
        .clone();

    let (status, body) = app
        .send(
            "POST",
            "/api/justificaciones",
            Some(json!({
                "monitoria_id": id,
                "persona_id": payload["persona_id"],
                "periodo_academico_id": payload["periodo_academico_id"],
                "tipo_justificacion_id": enfermedad,
                "descripcion": "Incapacidad médica de tres días",
                "fecha": "2025-03-10"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let justificacion_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["fecha"], "2025-03-10");

    let (status, body) = app
        .send("GET", &format!("/api/monitorias/{id}/justificaciones"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .send("GET", &format!("/api/justificaciones/{justificacion_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // Deleting the monitoria cascades to its justificaciones.
    let (status, _) = app.send("DELETE", &format!("/api/monitorias/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send("GET", &format!("/api/justificaciones/{justificacion_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_justificacion_validation() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .send(
            "POST",
            "/api/justificaciones",
            Some(json!({
                "monitoria_id": "no-existe",
                "persona_id": 1,
                "periodo_academico_id": 1,
                "tipo_justificacion_id": 1
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["descripcion"].is_array());
    assert!(body["errors"]["monitoria_id"].is_array());
    assert!(body["errors"]["persona_id"].is_array());
    assert!(body["errors"]["periodo_academico_id"].is_array());
    // Tipo 1 is one of the seeded justification types.
    assert!(body["errors"].get("tipo_justificacion_id").is_none());
}

#[tokio::test]
async fn test_catalog_crud() {
    let app = TestApp::spawn().await;

    let id = app
        .create(
            "/api/dependencias",
            json!({"nombre": "Bienestar Universitario"}),
        )
        .await;

    let (status, body) = app.send("GET", &format!("/api/dependencias/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["estado"], "activo");

    let (status, body) = app
        .send(
            "PUT",
            &format!("/api/dependencias/{id}"),
            Some(json!({"nombre": "Bienestar", "estado": "inactivo"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nombre"], "Bienestar");
    assert_eq!(body["data"]["estado"], "inactivo");

    let (status, _) = app.send("DELETE", &format!("/api/dependencias/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("GET", &format!("/api/dependencias/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send("PUT", "/api/dependencias/999", Some(json!({"nombre": "X"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_persona_numero_documento_unique() {
    let app = TestApp::spawn().await;
    let persona = json!({"tipo_documento": "CC", "numero_documento": "123456"});

    let id = app.create("/api/personas", persona.clone()).await;

    let (status, body) = app.send("POST", "/api/personas", Some(persona.clone())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["numero_documento"].is_array());

    // Updating a persona with its own document number is fine.
    let (status, body) = app
        .send(
            "PUT",
            &format!("/api/personas/{id}"),
            Some(json!({
                "tipo_documento": "CC",
                "numero_documento": "123456",
                "nombreA": "Carlos"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["nombreA"], "Carlos");
    assert_eq!(body["data"]["estado"], "1");
}

#[tokio::test]
async fn test_deleting_reference_cascades() {
    let app = TestApp::spawn().await;
    let (id, payload) = app.create_monitoria().await;

    let persona_id = payload["persona_id"].as_i64().unwrap();
    let (status, _) = app
        .send("DELETE", &format!("/api/personas/{persona_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("GET", &format!("/api/monitorias/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
