/// HTTP client for the TaskTrail API
///
/// Wraps `reqwest` with the session cache: `login` stores the returned
/// session, and every other call sends its token as a bearer credential.
///
/// # Example
///
/// ```no_run
/// use tasktrail_client::client::ApiClient;
/// use tasktrail_client::session::MemorySessionStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let mut client = ApiClient::new("http://localhost:3000", MemorySessionStore::new())?;
/// client.login("admin@example.com", "password").await?;
///
/// for task in client.list_tasks().await? {
///     println!("{} [{}]", task.title, task.status.as_str());
/// }
/// # Ok(())
/// # }
/// ```

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tasktrail_shared::models::audit_log::AuditLogWithActor;
use tasktrail_shared::models::task::Task;
use tasktrail_shared::service::identity::{LoginRequest, LoginResponse, UserProfile};
use tasktrail_shared::service::tasks::{NewTask, TaskUpdate};
use tasktrail_shared::service::users::UserSummary;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};
use crate::session::{Session, SessionCache, SessionStore};

/// Server error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

/// Task deletion acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub success: bool,
}

/// Health endpoint body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub database: String,
}

pub struct ApiClient<S: SessionStore> {
    http: reqwest::Client,
    base_url: String,
    session: SessionCache<S>,
}

impl<S: SessionStore> ApiClient<S> {
    /// Creates a client and restores any stored session
    pub fn new(base_url: impl Into<String>, store: S) -> ClientResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            session: SessionCache::restore(store)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionCache<S> {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.session.current_user()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    /// Logs in and stores the session
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<&UserProfile> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response: LoginResponse = self
            .execute(self.request(Method::POST, "/auth/login").json(&body))
            .await?;

        self.session.set(Session::from(response))?;

        self.session
            .current_user()
            .ok_or(ClientError::NotAuthenticated)
    }

    /// Forgets the stored session
    pub fn logout(&mut self) -> ClientResult<()> {
        self.session.clear()?;
        Ok(())
    }

    pub async fn health(&self) -> ClientResult<Health> {
        self.execute(self.request(Method::GET, "/health")).await
    }

    pub async fn list_tasks(&self) -> ClientResult<Vec<Task>> {
        self.execute(self.authorized(Method::GET, "/tasks")?).await
    }

    pub async fn get_task(&self, id: Uuid) -> ClientResult<Task> {
        self.execute(self.authorized(Method::GET, &format!("/tasks/{}", id))?)
            .await
    }

    pub async fn create_task(&self, task: &NewTask) -> ClientResult<Task> {
        self.execute(self.authorized(Method::POST, "/tasks")?.json(task))
            .await
    }

    pub async fn update_task(&self, id: Uuid, changes: &TaskUpdate) -> ClientResult<Task> {
        self.execute(
            self.authorized(Method::PUT, &format!("/tasks/{}", id))?
                .json(changes),
        )
        .await
    }

    pub async fn delete_task(&self, id: Uuid) -> ClientResult<DeleteAck> {
        self.execute(self.authorized(Method::DELETE, &format!("/tasks/{}", id))?)
            .await
    }

    pub async fn organization_users(&self) -> ClientResult<Vec<UserSummary>> {
        self.execute(self.authorized(Method::GET, "/users")?).await
    }

    pub async fn audit_log(&self) -> ClientResult<Vec<AuditLogWithActor>> {
        self.execute(self.authorized(Method::GET, "/audit-log")?).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    fn authorized(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        debug!(status = %response.status(), url = %response.url(), "API response");

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or(ErrorBody {
            error: String::new(),
            message: text,
        });

        Err(ClientError::Api {
            status,
            error: body.error,
            message: body.message,
        })
    }
}
