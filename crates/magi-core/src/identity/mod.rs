//! Identity collaborator.
//!
//! The tracker only needs to know who the current user is. Providers:
//! - [`LocalIdentity`]: one implicit local owner, signed in until signing out
//! - [`RemoteIdentity`]: a hosted auth service with a persisted session
//!
//! Credentials are validated before any provider call.

pub mod local;
pub mod remote;
pub mod validation;

pub use local::LocalIdentity;
pub use remote::{RemoteIdentity, Session};
pub use validation::{validate_email, validate_password, validate_username};

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

pub trait Identity {
    fn sign_in(&mut self, email: &str, password: &str) -> Result<User>;

    fn sign_up(&mut self, email: &str, password: &str, username: &str) -> Result<User>;

    fn sign_out(&mut self) -> Result<()>;

    /// Ask the provider to send a password reset link.
    fn reset_password(&mut self, email: &str) -> Result<()>;

    fn current_user(&self) -> Option<&User>;
}
