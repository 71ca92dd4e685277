mod registry;
mod resolver;

use std::fmt;

use hyper::http::request::Parts;
use hyper::Response;

use crate::configuration::InitParameters;
use crate::http::ResponseBody;
use crate::identity::LoginCredentials;
use crate::Error;

pub use registry::SchemeRegistry;
pub use resolver::resolve;

/// Type of an authentication scheme, as named by the `authType` init parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SchemeType {
    Basic,
    Digest,
    Form,
    ClientCert,
    Token,
    /// Externally supplied scheme, identified by its type name.
    Custom(String),
}

impl SchemeType {
    /// Match a name against the built-in types, ignoring case.
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "BASIC" => Some(SchemeType::Basic),
            "DIGEST" => Some(SchemeType::Digest),
            "FORM" => Some(SchemeType::Form),
            "CLIENT_CERT" => Some(SchemeType::ClientCert),
            "TOKEN" => Some(SchemeType::Token),
            _ => None,
        }
    }
}

impl fmt::Display for SchemeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SchemeType::Basic => write!(f, "BASIC"),
            SchemeType::Digest => write!(f, "DIGEST"),
            SchemeType::Form => write!(f, "FORM"),
            SchemeType::ClientCert => write!(f, "CLIENT_CERT"),
            SchemeType::Token => write!(f, "TOKEN"),
            SchemeType::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Capability contract of an HTTP authentication scheme.
///
/// Exactly one scheme is bound to a gate. It is initialized once, then shared read-only by
/// every request, so all request-time operations take `&self`.
pub trait AuthenticationScheme: Send + Sync {
    /// Type name used to identify the implementation, in diagnostics and for
    /// `authType` references to custom schemes.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Type this implementation provides. Built-in scheme implementations override it.
    fn scheme_type(&self) -> SchemeType {
        SchemeType::Custom(self.type_name().to_string())
    }

    /// One-time setup. An error prevents the gate from starting.
    fn initialize(&mut self, _config: &dyn InitParameters) -> Result<(), Error> {
        Ok(())
    }

    /// Store the credential carried by the request, if any.
    ///
    /// Called twice in the same cycle when re-authentication is forced.
    fn extract_credential(&self, request: &Parts, credentials: &LoginCredentials);

    /// Whether the targeted resource requires an authenticated identity. No side effects.
    fn is_protected(&self, request: &Parts) -> bool;

    /// Called after a successful login. `false` stops the pipeline because the scheme has
    /// produced the response itself (a redirect, for instance).
    fn post_authentication(&self, request: &Parts, response: &mut Response<ResponseBody>) -> bool;

    /// Write the challenge sent to an unauthenticated caller of a protected resource.
    fn challenge_client(&self, request: &Parts, response: &mut Response<ResponseBody>);
}
