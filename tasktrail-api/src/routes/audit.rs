/// Audit trail
///
/// - `GET /audit-log` - Caller's organization audit entries, newest first (ADMIN, OWNER)

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use tasktrail_shared::audit;
use tasktrail_shared::auth::policy::Actor;
use tasktrail_shared::models::audit_log::AuditLogWithActor;

pub async fn list_audit_log(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<AuditLogWithActor>>> {
    Ok(Json(audit::list_for_organization(&state.db, &actor).await?))
}
