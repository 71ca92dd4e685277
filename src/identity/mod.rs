mod credentials;
mod password;
pub mod scope;
mod session;

use std::fmt;

use serde::Serialize;

pub use credentials::{Credential, LoginCredentials};
pub use password::{PasswordAuthenticator, RejectedIdentity};
pub use session::{Authenticator, SessionIdentity};

/// The authenticated principal of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: String,
    pub login_name: Option<String>,
}

impl Account {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            login_name: None,
        }
    }

    #[must_use]
    pub fn with_login_name(mut self, login_name: impl Into<String>) -> Self {
        self.login_name = Some(login_name.into());
        self
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.login_name {
            Some(login_name) => write!(f, "{} ({login_name})", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Authentication state of one session.
///
/// Implementations use interior mutability: the same identity is shared by every request
/// of its session. `account()` returns `Some` exactly when `is_logged_in()` is true.
pub trait Identity: Send + Sync {
    fn is_logged_in(&self) -> bool;

    fn account(&self) -> Option<Account>;

    /// Authenticate with the credentials extracted for the current request.
    fn login(&self, credentials: &LoginCredentials) -> Result<(), AuthenticationError>;

    fn logout(&self);
}

/// A rejected login attempt. Never fatal to the gate.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthenticationError {
    MissingCredential,
    UnsupportedCredential(&'static str),
    UnknownUser(String),
    InvalidPassword(String),
    AlreadyLoggedIn(Account),
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthenticationError::MissingCredential => write!(f, "No credential provided"),
            AuthenticationError::UnsupportedCredential(kind) => {
                write!(f, "Unsupported credential type: {kind}")
            }
            AuthenticationError::UnknownUser(user) => write!(f, "Unknown user: {user}"),
            AuthenticationError::InvalidPassword(user) => {
                write!(f, "Invalid password for user: {user}")
            }
            AuthenticationError::AlreadyLoggedIn(account) => {
                write!(f, "Already logged in as {account}")
            }
        }
    }
}

impl std::error::Error for AuthenticationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_display() {
        assert_eq!(Account::new("id_1").to_string(), "id_1");
        assert_eq!(
            Account::new("id_1").with_login_name("alice").to_string(),
            "id_1 (alice)"
        );
    }

    #[test]
    fn test_account_serialize() {
        let account = Account::new("id_1").with_login_name("alice");
        let value = serde_json::to_value(&account).unwrap();

        assert_eq!(value["id"], "id_1");
        assert_eq!(value["login_name"], "alice");
    }

    #[test]
    fn test_authentication_error_display() {
        let error = AuthenticationError::InvalidPassword("alice".to_string());
        assert_eq!(error.to_string(), "Invalid password for user: alice");

        let error = AuthenticationError::UnsupportedCredential("token");
        assert_eq!(error.to_string(), "Unsupported credential type: token");
    }
}
