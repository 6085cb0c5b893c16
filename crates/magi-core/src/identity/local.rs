//! Single-user identity for the local backends.

use std::path::{Path, PathBuf};

use super::{validate_email, validate_password, validate_username, Identity, User};
use crate::error::{IdentityError, Result};

/// Owner id used for local data.
pub const LOCAL_OWNER: &str = "local";

/// File whose presence in the data directory means "signed out".
pub const SIGNED_OUT_MARKER: &str = "signed_out";

/// The local user is signed in from the start. Signing out empties every
/// read and blocks mutations until signing in again.
#[derive(Debug, Clone)]
pub struct LocalIdentity {
    user: Option<User>,
    marker: Option<PathBuf>,
}

impl LocalIdentity {
    /// In-process identity; sign-out lasts until the value is dropped.
    pub fn new() -> Self {
        Self {
            user: Some(Self::owner()),
            marker: None,
        }
    }

    /// Start signed out.
    pub fn signed_out() -> Self {
        Self {
            user: None,
            marker: None,
        }
    }

    /// Identity whose sign-out is remembered in `dir` across runs.
    pub fn open(dir: &Path) -> Self {
        let marker = dir.join(SIGNED_OUT_MARKER);
        let user = if marker.exists() {
            None
        } else {
            Some(Self::owner())
        };
        Self {
            user,
            marker: Some(marker),
        }
    }

    fn owner() -> User {
        User {
            id: LOCAL_OWNER.to_string(),
            email: None,
            username: None,
        }
    }
}

impl Default for LocalIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl Identity for LocalIdentity {
    fn sign_in(&mut self, email: &str, password: &str) -> Result<User> {
        validate_email(email)?;
        validate_password(password)?;
        let user = User {
            email: Some(email.trim().to_string()),
            ..Self::owner()
        };
        if let Some(marker) = self.marker.as_ref().filter(|m| m.exists()) {
            std::fs::remove_file(marker)?;
        }
        self.user = Some(user.clone());
        Ok(user)
    }

    fn sign_up(&mut self, email: &str, password: &str, username: &str) -> Result<User> {
        validate_username(username)?;
        let mut user = self.sign_in(email, password)?;
        user.username = Some(username.trim().to_string());
        self.user = Some(user.clone());
        Ok(user)
    }

    fn sign_out(&mut self) -> Result<()> {
        if let Some(marker) = &self.marker {
            std::fs::write(marker, b"")?;
        }
        self.user = None;
        Ok(())
    }

    fn reset_password(&mut self, email: &str) -> Result<()> {
        validate_email(email)?;
        Err(IdentityError::Unsupported("password reset").into())
    }

    fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}
