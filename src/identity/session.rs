use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, instrument};

use crate::identity::{Account, AuthenticationError, Identity, LoginCredentials};

/// Validates credentials against an account store.
#[cfg_attr(test, mockall::automock)]
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, credentials: &LoginCredentials) -> Result<Account, AuthenticationError>;
}

/// Session-scoped identity that delegates credential checks to an [`Authenticator`].
pub struct SessionIdentity {
    authenticator: Arc<dyn Authenticator>,
    account: RwLock<Option<Account>>,
}

impl SessionIdentity {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            account: RwLock::new(None),
        }
    }
}

impl Identity for SessionIdentity {
    fn is_logged_in(&self) -> bool {
        self.account.read().is_some()
    }

    fn account(&self) -> Option<Account> {
        self.account.read().clone()
    }

    #[instrument(skip(self, credentials), fields(user_id = ?credentials.user_id()))]
    fn login(&self, credentials: &LoginCredentials) -> Result<(), AuthenticationError> {
        if let Some(account) = self.account() {
            return Err(AuthenticationError::AlreadyLoggedIn(account));
        }

        if !credentials.has_credential() {
            return Err(AuthenticationError::MissingCredential);
        }

        let account = self.authenticator.authenticate(credentials)?;
        debug!("Session established for account {account}");

        // another request of this session may have logged in meanwhile
        let mut slot = self.account.write();
        if let Some(current) = slot.as_ref() {
            return Err(AuthenticationError::AlreadyLoggedIn(current.clone()));
        }
        *slot = Some(account);
        Ok(())
    }

    fn logout(&self) {
        if let Some(account) = self.account.write().take() {
            debug!("Session closed for account {account}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_with(authenticator: MockAuthenticator) -> SessionIdentity {
        SessionIdentity::new(Arc::new(authenticator))
    }

    #[test]
    fn test_new_identity_is_anonymous() {
        let identity = identity_with(MockAuthenticator::new());

        assert!(!identity.is_logged_in());
        assert_eq!(identity.account(), None);
    }

    #[test]
    fn test_login_success() {
        let mut authenticator = MockAuthenticator::new();
        authenticator
            .expect_authenticate()
            .times(1)
            .returning(|_| Ok(Account::new("id_1").with_login_name("alice")));
        let identity = identity_with(authenticator);

        let credentials = LoginCredentials::new();
        credentials.set_password("alice", "password1");

        assert_eq!(identity.login(&credentials), Ok(()));
        assert!(identity.is_logged_in());
        assert_eq!(
            identity.account(),
            Some(Account::new("id_1").with_login_name("alice"))
        );
    }

    #[test]
    fn test_login_failure_leaves_identity_anonymous() {
        let mut authenticator = MockAuthenticator::new();
        authenticator
            .expect_authenticate()
            .times(1)
            .returning(|_| Err(AuthenticationError::InvalidPassword("alice".to_string())));
        let identity = identity_with(authenticator);

        let credentials = LoginCredentials::new();
        credentials.set_password("alice", "wrong");

        assert_eq!(
            identity.login(&credentials),
            Err(AuthenticationError::InvalidPassword("alice".to_string()))
        );
        assert!(!identity.is_logged_in());
        assert_eq!(identity.account(), None);
    }

    #[test]
    fn test_login_without_credential() {
        let mut authenticator = MockAuthenticator::new();
        authenticator.expect_authenticate().never();
        let identity = identity_with(authenticator);

        assert_eq!(
            identity.login(&LoginCredentials::new()),
            Err(AuthenticationError::MissingCredential)
        );
    }

    #[test]
    fn test_login_when_already_logged_in() {
        let mut authenticator = MockAuthenticator::new();
        authenticator
            .expect_authenticate()
            .times(1)
            .returning(|_| Ok(Account::new("id_1")));
        let identity = identity_with(authenticator);

        let credentials = LoginCredentials::new();
        credentials.set_password("alice", "password1");
        identity.login(&credentials).unwrap();

        assert_eq!(
            identity.login(&credentials),
            Err(AuthenticationError::AlreadyLoggedIn(Account::new("id_1")))
        );
    }

    #[test]
    fn test_logout() {
        let mut authenticator = MockAuthenticator::new();
        authenticator
            .expect_authenticate()
            .times(2)
            .returning(|_| Ok(Account::new("id_1")));
        let identity = identity_with(authenticator);

        let credentials = LoginCredentials::new();
        credentials.set_password("alice", "password1");
        identity.login(&credentials).unwrap();

        identity.logout();
        assert!(!identity.is_logged_in());
        assert_eq!(identity.account(), None);

        // a fresh login is possible after logout
        assert_eq!(identity.login(&credentials), Ok(()));
    }
}
