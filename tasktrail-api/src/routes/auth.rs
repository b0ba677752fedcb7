/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/login` - Exchange email and password for a session token

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tasktrail_shared::service::identity::{self, LoginRequest, LoginResponse};

/// Login
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "owner@example.com",
///   "password": "..."
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "access_token": "eyJ...",
///   "user": {
///     "id": "uuid",
///     "email": "owner@example.com",
///     "role": "OWNER",
///     "organizationId": "uuid"
///   }
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same body for both)
/// - `400 Bad Request`: Body is not JSON
/// - `422 Unprocessable Entity`: Missing fields, malformed email or empty password
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = body?;
    let response = identity::login(&state.db, &state.tokens, &req).await?;
    Ok(Json(response))
}
