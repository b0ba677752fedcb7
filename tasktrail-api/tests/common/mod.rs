#![allow(dead_code)]

//! Common test utilities for integration tests
//!
//! Each `TestContext` owns a private in-memory database with the demo
//! organization (owner, admin, viewer) plus a second organization with one
//! owner, and a router built on top of it.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tasktrail_api::app::{build_router, AppState};
use tasktrail_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use tasktrail_shared::auth::jwt::{create_token, Claims};
use tasktrail_shared::db::{migrations::run_migrations, pool, seed};
use tasktrail_shared::models::organization::{CreateOrganization, Organization};
use tasktrail_shared::models::user::{CreateUser, Role, User};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret-key-32-bytes-min";
pub const PASSWORD: &str = seed::DEMO_PASSWORD;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: Router,
    pub config: Config,
    pub organization: Organization,
    pub other_organization: Organization,
    pub owner: User,
    pub admin: User,
    pub viewer: User,
    pub outsider: User,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            expiration_hours: 24,
        },
        seed_demo_data: true,
    }
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        let config = test_config();

        let db = pool::create_pool(pool::DatabaseConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let organization = seed::seed_demo_data(&db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("demo organization already present"))?;

        let members = User::list_by_organization(&db, organization.id).await?;
        let find = |role: Role| {
            members
                .iter()
                .find(|u| u.role == role)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("seed is missing a {} account", role))
        };
        let owner = find(Role::Owner)?;
        let admin = find(Role::Admin)?;
        let viewer = find(Role::Viewer)?;

        let other_organization = Organization::create(
            &db,
            CreateOrganization {
                name: "Globex".to_string(),
            },
        )
        .await?;

        // Reuse the seeded hash so the outsider can log in with the same password
        let outsider = User::create(
            &db,
            CreateUser {
                email: "owner@globex.test".to_string(),
                password_hash: owner.password_hash.clone(),
                role: Role::Owner,
                organization_id: other_organization.id,
            },
        )
        .await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            organization,
            other_organization,
            owner,
            admin,
            viewer,
            outsider,
        })
    }

    /// Mints a session token for `user` without going through login
    pub fn token_for(&self, user: &User) -> String {
        let claims = Claims::new(user.id, &user.email, user.role, user.organization_id);
        create_token(&claims, JWT_SECRET).unwrap()
    }

    /// Sends a request through the router and returns status plus JSON body
    ///
    /// Non-JSON and empty bodies come back as `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Sends `body` verbatim as `application/json`
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        user: &User,
        body: &str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token_for(user)))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str, user: &User) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(&self.token_for(user)), None).await
    }

    pub async fn post(&self, uri: &str, user: &User, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(&self.token_for(user)), Some(body))
            .await
    }

    pub async fn put(&self, uri: &str, user: &User, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(&self.token_for(user)), Some(body))
            .await
    }

    pub async fn delete(&self, uri: &str, user: &User) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(&self.token_for(user)), None)
            .await
    }

    /// Creates a task as the organization owner and returns its ID
    pub async fn create_task(&self, title: &str) -> String {
        let (status, body) = self
            .post("/tasks", &self.owner, serde_json::json!({ "title": title }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }
}
