use std::collections::BTreeMap;
use std::fmt;

use parking_lot::RwLock;

use crate::http::PeerCertificate;

/// A credential value extracted from a request by the active scheme.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Password(String),
    Token(String),
    Digest(BTreeMap<String, String>),
    Certificate(PeerCertificate),
}

impl Credential {
    pub fn kind(&self) -> &'static str {
        match self {
            Credential::Password(_) => "password",
            Credential::Token(_) => "token",
            Credential::Digest(_) => "digest",
            Credential::Certificate(_) => "certificate",
        }
    }
}

// Never print secret material.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Credential::Digest(params) => f
                .debug_tuple("Digest")
                .field(&params.get("username"))
                .finish(),
            Credential::Certificate(certificate) => f
                .debug_tuple("Certificate")
                .field(&format_args!("{} bytes", certificate.0.len()))
                .finish(),
            Credential::Password(_) => f.debug_tuple("Password").field(&"<redacted>").finish(),
            Credential::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    user_id: Option<String>,
    credential: Option<Credential>,
}

/// Holder for the credential of the current request cycle.
///
/// Schemes fill it during extraction; `Identity::login` consumes it.
#[derive(Debug, Default)]
pub struct LoginCredentials {
    state: RwLock<State>,
}

impl LoginCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<String> {
        self.state.read().user_id.clone()
    }

    pub fn credential(&self) -> Option<Credential> {
        self.state.read().credential.clone()
    }

    pub fn has_credential(&self) -> bool {
        self.state.read().credential.is_some()
    }

    pub fn set_user_id(&self, user_id: impl Into<String>) {
        self.state.write().user_id = Some(user_id.into());
    }

    pub fn set_credential(&self, credential: Credential) {
        self.state.write().credential = Some(credential);
    }

    /// Store a user id and password pair, as extracted by password based schemes.
    pub fn set_password(&self, user_id: impl Into<String>, password: impl Into<String>) {
        let mut state = self.state.write();
        state.user_id = Some(user_id.into());
        state.credential = Some(Credential::Password(password.into()));
    }

    pub fn invalidate(&self) {
        let mut state = self.state.write();
        state.user_id = None;
        state.credential = None;
    }
}
