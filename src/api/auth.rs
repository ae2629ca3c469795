use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::types::{LoginRequest, RegisterRequest};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::AuthContext;
use crate::services::{AuthResult, MeResult, RefreshResult};

// ============================================================================
// Middleware
// ============================================================================

/// Access gate for protected routes.
///
/// Resolves `Authorization: Bearer <token>` and attaches the resulting
/// [`AuthContext`] to the request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_bearer_token(request.headers()) else {
        return Err(ApiError::unauthorized());
    };

    let resolved = match state.auth_service().resolve_token(&token).await {
        Ok(Some(resolved)) => resolved,
        Ok(None) => {
            metrics::counter!("auth_events_total", "event" => "gate", "outcome" => "invalid_token")
                .increment(1);
            return Err(ApiError::invalid_token());
        }
        Err(err) => {
            return Err(ApiError::AuthenticationError(err.to_string()));
        }
    };

    let ctx = AuthContext {
        user_id: resolved.user.id,
        email: resolved.user.email,
        token_id: resolved.token_id,
    };

    tracing::Span::current().record("user_id", ctx.user_id.value());

    if let Err(err) = state.auth_service().touch_token(&ctx).await {
        tracing::warn!(error = %err, "Failed to update token last_used_at");
    }

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Bearer token from the `Authorization` header; the scheme is matched
/// case-insensitively.
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let result = state.auth_service().register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::<AuthResult>::with_message(
            "Usuario registrado exitosamente",
            result,
        )),
    ))
}

/// POST /login
/// Revokes every earlier token of the user and returns a fresh one
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AuthResult>>, ApiError> {
    let Json(request) = payload?;

    let result = state.auth_service().login(request).await?;

    Ok(Json(ApiResponse::with_message("Login exitoso", result)))
}

/// POST /logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.auth_service().logout(&ctx).await?;
    Ok(Json(ApiResponse::message("Sesión cerrada exitosamente")))
}

/// POST /logout-all
pub async fn logout_all(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.auth_service().logout_all(&ctx).await?;
    Ok(Json(ApiResponse::message(
        "Todas las sesiones han sido cerradas exitosamente",
    )))
}

/// GET /me
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<MeResult>>, ApiError> {
    let result = state.auth_service().me(&ctx).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// POST /refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<RefreshResult>>, ApiError> {
    let result = state.auth_service().refresh(&ctx).await?;
    Ok(Json(ApiResponse::with_message(
        "Token renovado exitosamente",
        result,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(
            extract_bearer_token(&headers("Bearer 1|abc")),
            Some("1|abc".to_string())
        );
        assert_eq!(
            extract_bearer_token(&headers("bearer  1|abc ")),
            Some("1|abc".to_string())
        );
    }

    #[test]
    fn test_extract_bearer_token_rejects_other_schemes() {
        assert_eq!(extract_bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }
}
