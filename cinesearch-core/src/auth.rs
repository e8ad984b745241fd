//! Client for the register/login API.
//!
//! Nothing escapes this boundary as an error: validation problems, transport
//! failures and upstream rejections all become [`AuthOutcome::Failure`] with
//! a message fit for display. A token is written only on success.

use serde::{Deserialize, Serialize};

use crate::ValidationError;
use crate::config::ApiConfig;
use crate::session::{Session, SessionStore, UserProfile};
use crate::storage::StorageError;

/// Header carrying the authentication API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Email and password that passed local validation.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    email: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Validates that both fields are present.
    ///
    /// # Errors
    ///
    /// - `ValidationError::MissingField` - If the email or password is blank
    pub fn new(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField { field: "email" });
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField { field: "password" });
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Result of a register or login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Session stored; `user` is the persisted profile
    Success { user: UserProfile },
    /// Nothing stored; `message` explains why
    Failure { message: String },
}

impl AuthOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Success { user } => Some(user),
            Self::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message } => Some(message),
        }
    }
}

/// Internal failure taxonomy, flattened into a message at the boundary.
#[derive(Debug, thiserror::Error)]
enum AuthError {
    #[error("Could not reach the authentication server: {reason}")]
    Network { reason: String },

    #[error("{message}")]
    Rejected { message: String },

    #[error("Unexpected response from the authentication server: {reason}")]
    MalformedResponse { reason: String },

    #[error("Could not save the session: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Copy)]
enum AuthAction {
    Register,
    Login,
}

impl AuthAction {
    fn path(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Login => "login",
        }
    }

    fn generic_failure(self) -> &'static str {
        match self {
            Self::Register => "registration failed",
            Self::Login => "login failed",
        }
    }
}

/// Body returned by the authentication API.
#[derive(Debug, Deserialize)]
struct AuthReply {
    token: Option<String>,
    /// Numeric on register, absent on login
    id: Option<serde_json::Value>,
    error: Option<String>,
}

/// Register/login client that persists the resulting session.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    sessions: SessionStore,
}

impl AuthClient {
    /// Creates a client for the configured authentication API.
    ///
    /// Falls back to a default HTTP client if the configured one cannot be
    /// built.
    pub fn new(config: &ApiConfig, sessions: SessionStore) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: config.auth_base_url.trim_end_matches('/').to_string(),
            api_key: config.auth_api_key.clone(),
            sessions,
        }
    }

    /// Registers a new account and stores the session on success.
    ///
    /// The user identifier is the one assigned upstream when present,
    /// otherwise the current timestamp in milliseconds.
    pub async fn register(&self, email: &str, password: &str, name: Option<&str>) -> AuthOutcome {
        let credentials = match Credentials::new(email, password) {
            Ok(credentials) => credentials,
            Err(e) => return AuthOutcome::failure(e.to_string()),
        };

        let result = async {
            let reply = self.send(AuthAction::Register, &credentials).await?;
            let user = UserProfile {
                email: credentials.email().to_string(),
                name: name
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string),
                id: reply.id.as_ref().and_then(id_to_string).unwrap_or_else(timestamp_id),
            };
            self.start_session(reply, user)
        }
        .await;

        self.finish(AuthAction::Register, result)
    }

    /// Signs in and stores the session on success.
    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let credentials = match Credentials::new(email, password) {
            Ok(credentials) => credentials,
            Err(e) => return AuthOutcome::failure(e.to_string()),
        };

        let result = async {
            let reply = self.send(AuthAction::Login, &credentials).await?;
            let user = UserProfile {
                email: credentials.email().to_string(),
                name: None,
                id: timestamp_id(),
            };
            self.start_session(reply, user)
        }
        .await;

        self.finish(AuthAction::Login, result)
    }

    /// Ends the session by removing the stored token and profile.
    ///
    /// # Errors
    ///
    /// - `StorageError` - If the session entries could not be removed
    pub fn logout(&self) -> Result<(), StorageError> {
        self.sessions.clear()?;
        tracing::info!("Signed out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.sessions.is_authenticated()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.sessions.current_user()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    async fn send(&self, action: AuthAction, credentials: &Credentials) -> Result<AuthReply, AuthError> {
        let url = format!("{}/{}", self.base_url, action.path());
        tracing::debug!("POST {} for {}", url, credentials.email());

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::Network {
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| AuthError::Network {
            reason: e.to_string(),
        })?;
        let reply = serde_json::from_str::<AuthReply>(&body);

        if !status.is_success() {
            let message = reply
                .ok()
                .and_then(|r| r.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| action.generic_failure().to_string());
            tracing::debug!("{} rejected with {}: {}", action.path(), status, message);
            return Err(AuthError::Rejected { message });
        }

        reply.map_err(|e| AuthError::MalformedResponse {
            reason: e.to_string(),
        })
    }

    fn start_session(&self, reply: AuthReply, user: UserProfile) -> Result<UserProfile, AuthError> {
        let token = reply
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::MalformedResponse {
                reason: "missing token".to_string(),
            })?;

        self.sessions.save(&Session {
            token,
            user: user.clone(),
        })?;
        Ok(user)
    }

    fn finish(&self, action: AuthAction, result: Result<UserProfile, AuthError>) -> AuthOutcome {
        match result {
            Ok(user) => {
                tracing::info!("{} succeeded for {}", action.path(), user.email);
                AuthOutcome::Success { user }
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", action.path(), e);
                AuthOutcome::failure(e.to_string())
            }
        }
    }
}

fn id_to_string(id: &serde_json::Value) -> Option<String> {
    match id {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn timestamp_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
