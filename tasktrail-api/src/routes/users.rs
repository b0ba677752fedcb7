/// Organization user directory
///
/// - `GET /users` - Members of the caller's organization (ADMIN, OWNER)

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use tasktrail_shared::auth::policy::Actor;
use tasktrail_shared::service::users::{self, UserSummary};

/// Lists `{id, email, role}` for every user in the caller's organization
pub async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<UserSummary>>> {
    let members = users::list_organization_users(&state.db, &actor).await?;
    Ok(Json(members.into_iter().map(UserSummary::from).collect()))
}
