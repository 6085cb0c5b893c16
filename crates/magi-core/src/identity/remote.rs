//! Hosted identity over the GoTrue HTTP API.
//!
//! The session returned at sign-in is kept in `session.json` under the data
//! directory so later invocations stay signed in.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use super::{validate_email, validate_password, validate_username, Identity, User};
use crate::error::{CoreError, IdentityError, Result};

/// Signed-in state as persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: User,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Value,
}

impl From<AuthUser> for User {
    fn from(user: AuthUser) -> Self {
        let username = user
            .user_metadata
            .get("username")
            .and_then(Value::as_str)
            .map(str::to_string);
        User {
            id: user.id,
            email: user.email,
            username,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self.expires_in.map(|secs| now + Duration::seconds(secs)),
            user: self.user.into(),
        }
    }
}

pub struct RemoteIdentity {
    base: Url,
    api_key: String,
    session_path: Option<PathBuf>,
    session: Option<Session>,
    client: Client,
    runtime: tokio::runtime::Runtime,
}

impl RemoteIdentity {
    /// Connect to `base` (the project URL), restoring a saved session from
    /// `session_path` when one exists.
    pub fn new(
        mut base: Url,
        api_key: impl Into<String>,
        session_path: Option<PathBuf>,
    ) -> Result<Self> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let session = match &session_path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                match serde_json::from_str::<Session>(&content) {
                    Ok(session) => Some(session),
                    Err(e) => {
                        warn!(error = %e, "ignoring unreadable session file");
                        None
                    }
                }
            }
            _ => None,
        };
        Ok(Self {
            base,
            api_key: api_key.into(),
            session_path,
            session,
            client: Client::new(),
            runtime,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    /// Trade the refresh token for a new session if the current one expired.
    pub fn ensure_fresh(&mut self, now: DateTime<Utc>) -> Result<()> {
        let Some(session) = &self.session else {
            return Ok(());
        };
        if !session.is_expired(now) {
            return Ok(());
        }
        let Some(refresh_token) = session.refresh_token.clone() else {
            self.store_session(None)?;
            return Err(IdentityError::NoSession.into());
        };
        let resp = match self.post(
            "auth/v1/token?grant_type=refresh_token",
            &json!({ "refresh_token": refresh_token }),
            None,
        ) {
            Ok(resp) => resp,
            Err(CoreError::Identity(IdentityError::Rejected(message))) => {
                warn!(%message, "refresh token rejected, dropping session");
                self.store_session(None)?;
                return Err(IdentityError::NoSession.into());
            }
            Err(e) => return Err(e),
        };
        let token: TokenResponse = self.runtime.block_on(resp.json()).map_err(IdentityError::from)?;
        info!("refreshed session");
        self.store_session(Some(token.into_session(now)))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| IdentityError::Transport(e.to_string()).into())
    }

    fn post(&self, path: &str, body: &Value, bearer: Option<&str>) -> Result<Response> {
        let url = self.endpoint(path)?;
        debug!(%url, "identity request");
        let mut request = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .json(body);
        if let Some(token) = bearer {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let resp = self
            .runtime
            .block_on(request.send())
            .map_err(IdentityError::from)?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body: Value = self.runtime.block_on(resp.json()).unwrap_or(Value::Null);
        let message = ["error_description", "msg", "message", "error"]
            .iter()
            .find_map(|k| body.get(*k).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());
        if status.is_client_error() {
            Err(IdentityError::Rejected(message).into())
        } else {
            Err(IdentityError::Transport(format!("HTTP {status}: {message}")).into())
        }
    }

    fn store_session(&mut self, session: Option<Session>) -> Result<()> {
        if let Some(path) = &self.session_path {
            match &session {
                Some(s) => std::fs::write(path, serde_json::to_string_pretty(s)?)?,
                None if path.exists() => std::fs::remove_file(path)?,
                None => {}
            }
        }
        self.session = session;
        Ok(())
    }
}

impl Identity for RemoteIdentity {
    fn sign_in(&mut self, email: &str, password: &str) -> Result<User> {
        validate_email(email)?;
        validate_password(password)?;
        let resp = self.post(
            "auth/v1/token?grant_type=password",
            &json!({ "email": email.trim(), "password": password }),
            None,
        )?;
        let token: TokenResponse = self.runtime.block_on(resp.json()).map_err(IdentityError::from)?;
        let session = token.into_session(Utc::now());
        let user = session.user.clone();
        self.store_session(Some(session))?;
        info!(user = %user.id, "signed in");
        Ok(user)
    }

    /// Providers that require email confirmation return no session; the
    /// user is created but stays signed out until confirmed.
    fn sign_up(&mut self, email: &str, password: &str, username: &str) -> Result<User> {
        validate_email(email)?;
        validate_password(password)?;
        validate_username(username)?;
        let resp = self.post(
            "auth/v1/signup",
            &json!({
                "email": email.trim(),
                "password": password,
                "data": { "username": username.trim() },
            }),
            None,
        )?;
        let body: Value = self.runtime.block_on(resp.json()).map_err(IdentityError::from)?;

        if body.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(body)?;
            let session = token.into_session(Utc::now());
            let user = session.user.clone();
            self.store_session(Some(session))?;
            return Ok(user);
        }
        let user: AuthUser = serde_json::from_value(body.get("user").cloned().unwrap_or(body))
            .map_err(CoreError::from)?;
        info!("signed up, confirmation pending");
        Ok(user.into())
    }

    fn sign_out(&mut self) -> Result<()> {
        let Some(token) = self.access_token().map(str::to_string) else {
            return Ok(());
        };
        let remote = self.post("auth/v1/logout", &json!({}), Some(&token));
        // Forget the session locally even if the provider call failed.
        self.store_session(None)?;
        remote.map(|_| ())
    }

    fn reset_password(&mut self, email: &str) -> Result<()> {
        validate_email(email)?;
        self.post("auth/v1/recover", &json!({ "email": email.trim() }), None)?;
        Ok(())
    }

    fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }
}
