use std::collections::{BTreeMap, HashMap};
use std::fmt;

use argon2::password_hash::PasswordHashString;
use argon2::{Argon2, PasswordVerifier};
use tracing::{debug, instrument, warn};

use crate::configuration::IdentityConfig;
use crate::identity::{Account, AuthenticationError, Authenticator, Credential, LoginCredentials};

/// A configured identity the account store refused to load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectedIdentity {
    InvalidHash { id: String, username: String },
    /// `username` is already taken by the identity `kept`.
    DuplicateUsername {
        id: String,
        username: String,
        kept: String,
    },
}

impl fmt::Display for RejectedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RejectedIdentity::InvalidHash { id, username } => {
                write!(f, "identity '{id}' ({username}) has an invalid password hash")
            }
            RejectedIdentity::DuplicateUsername { id, username, kept } => write!(
                f,
                "identity '{id}' reuses username '{username}' of identity '{kept}'"
            ),
        }
    }
}

/// In-memory account store verifying argon2 password hashes.
pub struct PasswordAuthenticator {
    users: Users,
    rejected: Vec<RejectedIdentity>,
}

// Keyed by username: (identity id, password hash).
type Users = HashMap<String, (String, PasswordHashString)>;

// Identities are visited in id order, so the first id claiming a username keeps it.
fn build_users(identities: &HashMap<String, IdentityConfig>) -> (Users, Vec<RejectedIdentity>) {
    let mut users: Users = HashMap::new();
    let mut rejected = Vec::new();

    let identities = identities.iter().collect::<BTreeMap<_, _>>();
    for (id, config) in identities {
        let password_hash = match PasswordHashString::new(&config.password) {
            Ok(hash) => hash,
            Err(err) => {
                warn!("Invalid password hash for user {}: {err}", config.username);
                rejected.push(RejectedIdentity::InvalidHash {
                    id: id.clone(),
                    username: config.username.clone(),
                });
                continue;
            }
        };

        if let Some((kept, _)) = users.get(&config.username) {
            warn!(
                "Identity {id} reuses username {} of identity {kept}, ignoring it",
                config.username
            );
            rejected.push(RejectedIdentity::DuplicateUsername {
                id: id.clone(),
                username: config.username.clone(),
                kept: kept.clone(),
            });
            continue;
        }

        users.insert(config.username.clone(), (id.clone(), password_hash));
    }

    (users, rejected)
}

impl PasswordAuthenticator {
    pub fn new(identities: &HashMap<String, IdentityConfig>) -> Self {
        let (users, rejected) = build_users(identities);
        Self { users, rejected }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Configured identities that were not loaded, in id order.
    pub fn rejected(&self) -> &[RejectedIdentity] {
        &self.rejected
    }

    #[instrument(skip(self, password))]
    fn validate_password(&self, username: &str, password: &str) -> Result<Account, AuthenticationError> {
        let Some((identity_id, identity_password)) = self.users.get(username) else {
            debug!("Username not found in credentials");
            return Err(AuthenticationError::UnknownUser(username.to_string()));
        };

        let identity_password = identity_password.password_hash();

        match Argon2::default().verify_password(password.as_bytes(), &identity_password) {
            Ok(()) => Ok(Account::new(identity_id.clone()).with_login_name(username)),
            Err(error) => {
                debug!("Password verification failed: {error}");
                Err(AuthenticationError::InvalidPassword(username.to_string()))
            }
        }
    }
}

impl Authenticator for PasswordAuthenticator {
    fn authenticate(&self, credentials: &LoginCredentials) -> Result<Account, AuthenticationError> {
        match credentials.credential() {
            Some(Credential::Password(password)) => {
                let Some(username) = credentials.user_id() else {
                    return Err(AuthenticationError::UnknownUser(String::new()));
                };
                self.validate_password(&username, &password)
            }
            Some(other) => Err(AuthenticationError::UnsupportedCredential(other.kind())),
            None => Err(AuthenticationError::MissingCredential),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct TestConfig {
        identity: HashMap<String, IdentityConfig>,
    }

    static TEST_CONFIG: &str = r#"
    [identity.id_1]
    username = "user1"
    password = "$argon2id$v=19$m=19456,t=2,p=1$9pxWwg0VtZzDXno/25417Q$e+cuKy9VisJVxec/EEuKvvfIIIOy5yDGRzYKiuDLjx0"  # password is "password1"

    [identity.id_2]
    username = "user2"
    password = "$argon2id$v=19$m=19456,t=2,p=1$Uy1qF140d+2nOKIz1ZFltw$xAii0VrKbNn2d/rb5hUWUmEcwq6kjVFE5mW5ymzFudw"  # password is "password2"

    [identity.id_3]
    username = "user3"
    password = "invalid-password-hash"
    "#;

    fn build_authenticator() -> PasswordAuthenticator {
        let config: TestConfig = toml::from_str(TEST_CONFIG).expect("Failed to parse test config");
        PasswordAuthenticator::new(&config.identity)
    }

    fn password_credentials(username: &str, password: &str) -> LoginCredentials {
        let credentials = LoginCredentials::new();
        credentials.set_password(username, password);
        credentials
    }

    #[test]
    fn test_invalid_hashes_are_skipped() {
        let authenticator = build_authenticator();

        assert_eq!(authenticator.len(), 2);
        assert!(authenticator.users.contains_key("user1"));
        assert!(authenticator.users.contains_key("user2"));
        assert!(!authenticator.users.contains_key("user3"));
        assert_eq!(
            authenticator.rejected(),
            [RejectedIdentity::InvalidHash {
                id: "id_3".to_string(),
                username: "user3".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_username_keeps_first_identity() {
        let config: TestConfig = toml::from_str(
            r#"
            [identity.b_second]
            username = "user1"
            password = "$argon2id$v=19$m=19456,t=2,p=1$Uy1qF140d+2nOKIz1ZFltw$xAii0VrKbNn2d/rb5hUWUmEcwq6kjVFE5mW5ymzFudw"

            [identity.a_first]
            username = "user1"
            password = "$argon2id$v=19$m=19456,t=2,p=1$9pxWwg0VtZzDXno/25417Q$e+cuKy9VisJVxec/EEuKvvfIIIOy5yDGRzYKiuDLjx0"
            "#,
        )
        .unwrap();
        let authenticator = PasswordAuthenticator::new(&config.identity);

        assert_eq!(authenticator.len(), 1);
        assert_eq!(
            authenticator.rejected(),
            [RejectedIdentity::DuplicateUsername {
                id: "b_second".to_string(),
                username: "user1".to_string(),
                kept: "a_first".to_string(),
            }]
        );
        assert_eq!(
            authenticator.rejected()[0].to_string(),
            "identity 'b_second' reuses username 'user1' of identity 'a_first'"
        );

        let account = authenticator
            .authenticate(&password_credentials("user1", "password1"))
            .unwrap();
        assert_eq!(account.id, "a_first");
        assert!(authenticator
            .authenticate(&password_credentials("user1", "password2"))
            .is_err());
    }

    #[test]
    fn test_authenticate_valid_password() {
        let authenticator = build_authenticator();

        let account = authenticator
            .authenticate(&password_credentials("user1", "password1"))
            .unwrap();
        assert_eq!(account, Account::new("id_1").with_login_name("user1"));

        let account = authenticator
            .authenticate(&password_credentials("user2", "password2"))
            .unwrap();
        assert_eq!(account.id, "id_2");
    }

    #[test]
    fn test_authenticate_wrong_password() {
        let authenticator = build_authenticator();

        let result = authenticator.authenticate(&password_credentials("user1", "wrong_password"));
        assert_eq!(
            result,
            Err(AuthenticationError::InvalidPassword("user1".to_string()))
        );
    }

    #[test]
    fn test_authenticate_unknown_user() {
        let authenticator = build_authenticator();

        let result = authenticator.authenticate(&password_credentials("user3", "whatever"));
        assert_eq!(result, Err(AuthenticationError::UnknownUser("user3".to_string())));
    }

    #[test]
    fn test_authenticate_unsupported_credential() {
        let authenticator = build_authenticator();
        let credentials = LoginCredentials::new();
        credentials.set_credential(Credential::Token("abc".to_string()));

        assert_eq!(
            authenticator.authenticate(&credentials),
            Err(AuthenticationError::UnsupportedCredential("token"))
        );
    }

    #[test]
    fn test_authenticate_without_credential() {
        let authenticator = build_authenticator();

        assert_eq!(
            authenticator.authenticate(&LoginCredentials::new()),
            Err(AuthenticationError::MissingCredential)
        );
    }
}
