use crate::api::error::AppError;
use crate::entities::{prelude::Users, users};
use crate::utils::{auth::validate_jwt, cookies::token_from_headers};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use sea_orm::EntityTrait;
use tracing::debug;

pub const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// The user a request was authenticated as.
#[derive(Debug, Clone)]
pub struct AuthUser(pub users::Model);

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .or_else(|| token_from_headers(req.headers()))
        .ok_or_else(|| AppError::Unauthorized(NOT_AUTHORIZED.to_string()))?;

    let claims = validate_jwt(&token, &state.config.jwt_secret).map_err(|e| {
        debug!("Rejected token: {}", e);
        AppError::Unauthorized(NOT_AUTHORIZED.to_string())
    })?;

    // The account may have been removed after the token was issued
    let user = Users::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized(NOT_AUTHORIZED.to_string()))?;

    req.extensions_mut().insert(AuthUser(user));
    Ok(next.run(req).await)
}
