//! Credential check and session resolution.
//!
//! `login` is read-only with respect to stored state: it verifies a password
//! and signs a session token. `resolve_actor` turns verified token claims back
//! into an [`Actor`] for the request, rejecting tokens whose user is gone.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::auth::jwt::{create_token, Claims};
use crate::auth::password::{verify_against_dummy, verify_password};
use crate::auth::policy::Actor;
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{Role, User};

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public view of the logged-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub organization_id: Uuid,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            organization_id: user.organization_id,
        }
    }
}

/// Successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// Signing parameters for session tokens
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub expires_in: Duration,
}

/// Checks an email/password pair and issues a session token
///
/// Unknown email and wrong password produce the same error, and both paths
/// run one Argon2 verification.
pub async fn login(
    pool: &SqlitePool,
    settings: &TokenSettings,
    request: &LoginRequest,
) -> ServiceResult<LoginResponse> {
    request.validate()?;

    let user = match User::find_by_email(pool, &request.email).await? {
        Some(user) => user,
        None => {
            verify_against_dummy(&request.password);
            debug!("Login attempt for unknown email");
            return Err(ServiceError::invalid_credentials());
        }
    };

    if !verify_password(&request.password, &user.password_hash)? {
        debug!(user_id = %user.id, "Login attempt with wrong password");
        return Err(ServiceError::invalid_credentials());
    }

    let claims = Claims::with_expiration(
        user.id,
        user.email.clone(),
        user.role,
        user.organization_id,
        settings.expires_in,
    );
    let access_token = create_token(&claims, &settings.secret)?;

    info!(
        user_id = %user.id,
        organization_id = %user.organization_id,
        role = %user.role,
        "User logged in"
    );

    Ok(LoginResponse {
        access_token,
        user: UserProfile::from(&user),
    })
}

/// Builds the request actor for a verified token
///
/// Organization and role come from the stored user, so a role change applies
/// to tokens issued before it.
pub async fn resolve_actor(pool: &SqlitePool, claims: &Claims) -> ServiceResult<Actor> {
    let user = User::find_by_id(pool, claims.sub)
        .await?
        .ok_or_else(|| ServiceError::Authentication("User not found".to_string()))?;

    Ok(Actor::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::validate_token;
    use crate::auth::password::hash_password;
    use crate::models::user::CreateUser;
    use crate::testing::{create_organization, migrated_pool};

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn settings() -> TokenSettings {
        TokenSettings {
            secret: SECRET.to_string(),
            expires_in: Duration::hours(24),
        }
    }

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn seeded() -> (SqlitePool, User) {
        let pool = migrated_pool().await;
        let org = create_organization(&pool, "Acme").await;
        let user = User::create(
            &pool,
            CreateUser {
                email: "admin@acme.test".to_string(),
                password_hash: hash_password("correct horse").unwrap(),
                role: Role::Admin,
                organization_id: org.id,
            },
        )
        .await
        .unwrap();
        (pool, user)
    }

    #[tokio::test]
    async fn test_login_issues_token_with_identity_claims() {
        let (pool, user) = seeded().await;

        let response = login(&pool, &settings(), &request("admin@acme.test", "correct horse"))
            .await
            .unwrap();

        assert_eq!(response.user, UserProfile::from(&user));

        let claims = validate_token(&response.access_token, SECRET).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "admin@acme.test");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.organization_id, user.organization_id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (pool, _) = seeded().await;

        let wrong_password = login(&pool, &settings(), &request("admin@acme.test", "nope"))
            .await
            .unwrap_err();
        let unknown_email = login(&pool, &settings(), &request("ghost@acme.test", "nope"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, ServiceError::Authentication(_)));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_input() {
        let (pool, _) = seeded().await;

        let err = login(&pool, &settings(), &request("not-an-email", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(fields) if fields.len() == 2));
    }

    #[tokio::test]
    async fn test_resolve_actor_requires_existing_user() {
        let (pool, user) = seeded().await;

        let claims = Claims::new(user.id, &user.email, user.role, user.organization_id);
        let actor = resolve_actor(&pool, &claims).await.unwrap();
        assert_eq!(actor, Actor::new(user.id, user.organization_id, Role::Admin));

        let ghost = Claims::new(Uuid::new_v4(), "ghost@acme.test", Role::Owner, user.organization_id);
        let err = resolve_actor(&pool, &ghost).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn test_resolve_actor_uses_stored_role() {
        let (pool, user) = seeded().await;
        let claims = Claims::new(user.id, &user.email, Role::Admin, user.organization_id);

        sqlx::query("UPDATE users SET role = 'VIEWER' WHERE id = ?")
            .bind(user.id)
            .execute(&pool)
            .await
            .unwrap();

        let actor = resolve_actor(&pool, &claims).await.unwrap();
        assert_eq!(actor.role, Role::Viewer);
    }
}
