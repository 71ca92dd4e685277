use std::fmt;

use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde_json::json;

use crate::http::ResponseBody;

/// Fatal gate errors.
///
/// Every variant denotes a misconfiguration: they are raised while the gate is built or
/// when a request cannot even be evaluated, and are never retried.
#[derive(Debug, PartialEq)]
pub enum Error {
    Initialization(String),
    SchemeNotConfigured,
    SchemeNotFound(String),
    SchemeUnsatisfied(String),
    AmbiguousScheme {
        message: String,
        candidates: Vec<String>,
    },
    ScopeUnsatisfied(&'static str),
    ScopeAmbiguous(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Initialization(err) => write!(f, "{err}"),
            Error::SchemeNotConfigured => write!(
                f,
                "No authentication scheme found. Register a preferred scheme or set the \
                 authType init parameter to a built-in type or a registered scheme type name."
            ),
            Error::SchemeNotFound(name) => {
                write!(f, "Authentication scheme type '{name}' could not be found.")
            }
            Error::SchemeUnsatisfied(name) => {
                write!(f, "No registered authentication scheme implements '{name}'.")
            }
            Error::AmbiguousScheme {
                message,
                candidates,
            } => {
                write!(f, "{message}")?;
                write!(f, "\nAmbiguous types:")?;
                for candidate in candidates {
                    write!(f, "\n  {candidate}")?;
                }
                Ok(())
            }
            Error::ScopeUnsatisfied(scope) => write!(f, "{scope} not found."),
            Error::ScopeAmbiguous(scope) => write!(f, "{scope} is ambiguous."),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn code(&self) -> &'static str {
        match self {
            Error::Initialization(_) => "INITIALIZATION_FAILED",
            Error::SchemeNotConfigured
            | Error::SchemeNotFound(_)
            | Error::SchemeUnsatisfied(_)
            | Error::AmbiguousScheme { .. } => "SCHEME_UNRESOLVED",
            Error::ScopeUnsatisfied(_) | Error::ScopeAmbiguous(_) => "SCOPE_UNRESOLVED",
        }
    }

    pub fn as_json(&self, request_id: Option<&String>) -> serde_json::Value {
        let message = self.to_string();

        if let Some(request_id) = request_id {
            json!({
                "errors": [{
                    "code": self.code(),
                    "message": message,
                    "detail": { "request_id": request_id }
                }]
            })
        } else {
            json!({
                "errors": [{
                    "code": self.code(),
                    "message": message,
                }]
            })
        }
    }

    /// Render the error as the response sent back to the caller.
    pub fn into_response(self, request_id: Option<&String>) -> Response<ResponseBody> {
        let body = self.as_json(request_id).to_string().into_bytes();

        let mut response = Response::new(ResponseBody::fixed(body));
        *response.status_mut() = self.status_code();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}
