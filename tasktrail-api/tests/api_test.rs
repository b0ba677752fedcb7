/// Integration tests for the TaskTrail HTTP API
///
/// These tests drive the full router (JWT layer, handlers, services, SQLite)
/// through `tower::ServiceExt::oneshot`:
/// - Login and token handling
/// - Role gates per endpoint
/// - Tenant isolation
/// - Partial updates
/// - Audit trail side effects

mod common;

use axum::http::{Method, StatusCode};
use common::{TestContext, PASSWORD};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_login_returns_token_and_profile() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": ctx.admin.email, "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
    assert_eq!(body["user"]["email"], ctx.admin.email.as_str());
    assert_eq!(body["user"]["role"], "ADMIN");
    assert_eq!(body["user"]["organizationId"], ctx.organization.id.to_string());
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());

    // The issued token works against protected routes
    let token = body["access_token"].as_str().unwrap();
    let (status, _) = ctx.send(Method::GET, "/users", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_are_identical() {
    let ctx = TestContext::new().await.unwrap();

    let (wrong_status, wrong_body) = ctx
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": ctx.owner.email, "password": "not-the-password" })),
        )
        .await;
    let (unknown_status, unknown_body) = ctx
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "nobody@nowhere.test", "password": "not-the-password" })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_validation() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "not-an-email", "password": "" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_protected_routes_require_valid_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.send(Method::GET, "/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx.send(Method::GET, "/tasks", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Signed with a different secret
    let claims = tasktrail_shared::auth::jwt::Claims::new(
        ctx.owner.id,
        &ctx.owner.email,
        ctx.owner.role,
        ctx.owner.organization_id,
    );
    let forged =
        tasktrail_shared::auth::jwt::create_token(&claims, "some-other-secret-that-is-32-bytes").unwrap();
    let (status, _) = ctx.send(Method::GET, "/tasks", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_missing_user_is_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let mut ghost = ctx.owner.clone();
    ghost.id = Uuid::new_v4();

    let (status, body) = ctx.get("/tasks", &ghost).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_viewer_can_only_list() {
    let ctx = TestContext::new().await.unwrap();
    let task_id = ctx.create_task("Visible to viewer").await;
    let uri = format!("/tasks/{}", task_id);

    let (status, body) = ctx.get("/tasks", &ctx.viewer).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = ctx.get(&uri, &ctx.viewer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Insufficient permissions");

    let (status, _) = ctx.post("/tasks", &ctx.viewer, json!({ "title": "nope" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.put(&uri, &ctx.viewer, json!({ "status": "done" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.delete(&uri, &ctx.viewer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.get("/users", &ctx.viewer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.get("/audit-log", &ctx.viewer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_viewer_is_refused_before_body_is_read() {
    let ctx = TestContext::new().await.unwrap();
    let task_id = ctx.create_task("Guarded").await;
    let uri = format!("/tasks/{}", task_id);

    let (status, body) = ctx.post("/tasks", &ctx.viewer, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
    assert_eq!(body["message"], "Insufficient permissions");

    let (status, body) = ctx
        .post("/tasks", &ctx.viewer, json!({ "title": "x", "priority": "urgent" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = ctx.put(&uri, &ctx.viewer, json!({ "status": "blocked" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = ctx.send_raw(Method::POST, "/tasks", &ctx.viewer, "{not json").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let ctx = TestContext::new().await.unwrap();
    let task_id = ctx.create_task("Shape check").await;

    let (status, body) = ctx
        .post("/tasks", &ctx.admin, json!({ "title": "x", "priority": "urgent" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "body");

    let (status, body) = ctx
        .put(&format!("/tasks/{}", task_id), &ctx.admin, json!({ "status": "blocked" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = ctx.send_raw(Method::POST, "/tasks", &ctx.admin, "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    // Nothing was written, so nothing was audited beyond the setup task
    let (_, entries) = ctx.get("/audit-log", &ctx.owner).await;
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_can_do_everything_but_delete() {
    let ctx = TestContext::new().await.unwrap();

    let (status, created) = ctx
        .post("/tasks", &ctx.admin, json!({ "title": "Admin task", "category": "Work" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/tasks/{}", created["id"].as_str().unwrap());

    let (status, fetched) = ctx.get(&uri, &ctx.admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, _) = ctx.put(&uri, &ctx.admin, json!({ "priority": "low" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.delete(&uri, &ctx.admin).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx.delete(&uri, &ctx.owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = ctx.get(&uri, &ctx.owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_defaults_and_wire_format() {
    let ctx = TestContext::new().await.unwrap();

    let (status, task) = ctx
        .post(
            "/tasks",
            &ctx.admin,
            json!({ "title": "Defaults", "dueDate": "2030-01-15T09:00:00Z" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["title"], "Defaults");
    assert_eq!(task["category"], "General");
    assert_eq!(task["status"], "todo");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["organizationId"], ctx.organization.id.to_string());
    assert!(task["dueDate"].as_str().unwrap().starts_with("2030-01-15T09:00:00"));
    assert!(task["createdAt"].is_string());
    assert!(task["updatedAt"].is_string());
}

#[tokio::test]
async fn test_create_rejects_empty_title() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.post("/tasks", &ctx.owner, json!({ "title": "" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "title");
}

#[tokio::test]
async fn test_cross_tenant_access_is_not_found() {
    let ctx = TestContext::new().await.unwrap();
    let task_id = ctx.create_task("Acme secret").await;
    let uri = format!("/tasks/{}", task_id);

    let (status, body) = ctx.get(&uri, &ctx.outsider).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("title").is_none());

    let (status, _) = ctx.put(&uri, &ctx.outsider, json!({ "title": "pwned" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.delete(&uri, &ctx.outsider).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx.get("/tasks", &ctx.outsider).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    // Untouched for its own tenant
    let (_, task) = ctx.get(&uri, &ctx.owner).await;
    assert_eq!(task["title"], "Acme secret");
}

#[tokio::test]
async fn test_malformed_task_id_is_not_found() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.get("/tasks/not-a-uuid", &ctx.owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");

    let (status, _) = ctx.delete("/tasks/12345", &ctx.owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let ctx = TestContext::new().await.unwrap();

    let (_, created) = ctx
        .post(
            "/tasks",
            &ctx.owner,
            json!({
                "title": "Quarterly report",
                "description": "Numbers for Q3",
                "category": "Work",
                "priority": "high"
            }),
        )
        .await;
    let uri = format!("/tasks/{}", created["id"].as_str().unwrap());

    let (status, updated) = ctx.put(&uri, &ctx.admin, json!({ "status": "done" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "done");
    assert_eq!(updated["title"], "Quarterly report");
    assert_eq!(updated["description"], "Numbers for Q3");
    assert_eq!(updated["category"], "Work");
    assert_eq!(updated["priority"], "high");

    let (status, cleared) = ctx.put(&uri, &ctx.admin, json!({ "description": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["description"].is_null());
    assert_eq!(cleared["category"], "Work");
}

#[tokio::test]
async fn test_mutations_are_audited() {
    let ctx = TestContext::new().await.unwrap();

    let task_id = ctx.create_task("Audited").await;
    let uri = format!("/tasks/{}", task_id);
    ctx.put(&uri, &ctx.admin, json!({ "status": "in-progress" })).await;
    ctx.delete(&uri, &ctx.owner).await;

    let (status, log) = ctx.get("/audit-log", &ctx.admin).await;
    assert_eq!(status, StatusCode::OK);

    let entries = log.as_array().unwrap();
    assert_eq!(entries.len(), 3);

    let actions: Vec<&str> = entries.iter().map(|e| e["action"].as_str().unwrap()).collect();
    assert_eq!(actions, vec!["DELETE_TASK", "UPDATE_TASK", "CREATE_TASK"]);

    for entry in entries {
        assert_eq!(entry["resource"], "Task");
        assert_eq!(entry["resourceId"], task_id.as_str());
        assert_eq!(entry["organizationId"], ctx.organization.id.to_string());
    }

    assert_eq!(entries[0]["user"]["email"], ctx.owner.email.as_str());
    assert_eq!(entries[1]["user"]["role"], "ADMIN");

    // Other tenants see none of it
    let (_, foreign) = ctx.get("/audit-log", &ctx.outsider).await;
    assert!(foreign.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_denied_mutations_are_not_audited() {
    let ctx = TestContext::new().await.unwrap();

    ctx.post("/tasks", &ctx.viewer, json!({ "title": "nope" })).await;

    let (_, log) = ctx.get("/audit-log", &ctx.owner).await;
    assert!(log.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_users_directory_shape() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.get("/users", &ctx.admin).await;
    assert_eq!(status, StatusCode::OK);

    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 3);

    let emails: Vec<&str> = users.iter().map(|u| u["email"].as_str().unwrap()).collect();
    assert_eq!(
        emails,
        vec![ctx.owner.email.as_str(), ctx.admin.email.as_str(), ctx.viewer.email.as_str()]
    );

    for user in users {
        let keys: Vec<&String> = user.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3, "unexpected fields in {}", user);
    }
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let ctx = TestContext::new().await.unwrap();

    // Admin logs in and creates a task
    let (_, login) = ctx
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": ctx.admin.email, "password": PASSWORD })),
        )
        .await;
    let admin_token = login["access_token"].as_str().unwrap().to_string();

    let (status, task) = ctx
        .send(
            Method::POST,
            "/tasks",
            Some(&admin_token),
            Some(json!({ "title": "Launch", "priority": "high" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = task["id"].as_str().unwrap().to_string();

    // Viewer sees it in the list but cannot open it
    let (_, list) = ctx.get("/tasks", &ctx.viewer).await;
    assert_eq!(list[0]["id"], task_id.as_str());
    let (status, _) = ctx.get(&format!("/tasks/{}", task_id), &ctx.viewer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin completes it; owner deletes it
    let (_, done) = ctx
        .send(
            Method::PUT,
            &format!("/tasks/{}", task_id),
            Some(&admin_token),
            Some(json!({ "status": "done" })),
        )
        .await;
    assert_eq!(done["status"], "done");
    assert_eq!(done["priority"], "high");

    let (status, _) = ctx.delete(&format!("/tasks/{}", task_id), &ctx.owner).await;
    assert_eq!(status, StatusCode::OK);

    // The trail shows all three steps by the right people
    let (_, log) = ctx.get("/audit-log", &ctx.owner).await;
    let trail: Vec<(String, String)> = log
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["action"].as_str().unwrap().to_string(),
                e["user"]["email"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        trail,
        vec![
            ("DELETE_TASK".to_string(), ctx.owner.email.clone()),
            ("UPDATE_TASK".to_string(), ctx.admin.email.clone()),
            ("CREATE_TASK".to_string(), ctx.admin.email.clone()),
        ]
    );

    let (_, list) = ctx.get("/tasks", &ctx.owner).await;
    assert!(list.as_array().unwrap().is_empty());
}
