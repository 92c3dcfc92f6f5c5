// src/auth/mod.rs — Mock authentication gate
//
// Accepts exactly one demo credential pair for login and any fully filled-in
// signup. The only state kept is the current User under `current_user`;
// passwords are never stored. This is a placeholder for a real credential
// service and carries no security guarantees.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::infra::errors::AuthError;
use crate::store::{self, KeyValueStore, CURRENT_USER_KEY};

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password";
pub const DEMO_NAME: &str = "Demo User";

/// The active account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Acknowledgement of a password reset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetAck {
    pub email: String,
}

impl ResetAck {
    pub fn message(&self) -> String {
        format!(
            "If an account exists for {}, a reset link has been sent.",
            self.email
        )
    }
}

pub struct AuthGate {
    store: Arc<dyn KeyValueStore>,
}

impl AuthGate {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The persisted user, if any. Unreadable or malformed values count as
    /// logged out.
    pub fn restore_session(&self) -> Option<User> {
        match store::load_json::<User>(self.store.as_ref(), CURRENT_USER_KEY) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Ignoring stored user: {e}");
                None
            }
        }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email != DEMO_EMAIL || password != DEMO_PASSWORD {
            tracing::info!(email, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        self.establish(User::new(email, DEMO_NAME))
    }

    /// Any signup with all three fields present succeeds. There is no
    /// uniqueness check.
    pub fn signup(&self, email: &str, password: &str, name: &str) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() || name.is_empty() {
            return Err(AuthError::MissingFields);
        }
        self.establish(User::new(email, name))
    }

    /// Always acknowledges; no lookup happens.
    pub fn request_password_reset(&self, email: &str) -> ResetAck {
        tracing::info!(email, "password reset requested");
        ResetAck {
            email: email.to_string(),
        }
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(CURRENT_USER_KEY)?;
        tracing::info!("logged out");
        Ok(())
    }

    fn establish(&self, user: User) -> Result<User, AuthError> {
        store::save_json(self.store.as_ref(), CURRENT_USER_KEY, &user)?;
        tracing::info!(email = %user.email, "logged in");
        Ok(user)
    }
}
