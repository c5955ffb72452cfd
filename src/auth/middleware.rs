use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use super::types::Caller;
use crate::shared::{AppError, AppState};

/// Bearer authentication middleware - validates the Authorization header and adds the Caller
/// to request extensions.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), auth::require_caller))
/// Handlers can then extract Extension(caller): Extension<Caller>.
#[instrument(skip(state, req, next))]
pub async fn require_caller(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!(uri = %req.uri(), "Missing Authorization header in request");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let claims = match state.token_config.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Authentication failed: {}", e);
            return Err(e);
        }
    };

    let caller = Caller::from(claims);
    debug!(user_id = %caller.user_id, role = %caller.role, "Caller authenticated");

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
