use std::collections::BTreeMap;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hyper::header::{AsHeaderName, AUTHORIZATION};
use hyper::http::request::Parts;

use crate::http::PeerCertificate;

static BEARER_PREFIX: &str = "Bearer ";
static BASIC_PREFIX: &str = "Basic ";
static DIGEST_PREFIX: &str = "Digest ";

/// Request accessors used by scheme implementations to locate credentials.
pub trait HeaderExt {
    fn get_header<K: AsHeaderName>(&self, header: K) -> Option<String>;
    fn bearer_token(&self) -> Option<String>;
    fn basic_auth(&self) -> Option<(String, String)>;
    fn digest_auth(&self) -> Option<BTreeMap<String, String>>;
    fn peer_certificate(&self) -> Option<&PeerCertificate>;
}

impl HeaderExt for Parts {
    fn get_header<K>(&self, header: K) -> Option<String>
    where
        K: AsHeaderName,
    {
        self.headers
            .get(header)
            .and_then(|header| header.to_str().ok())
            .map(ToString::to_string)
    }

    fn bearer_token(&self) -> Option<String> {
        let authorization = self.get_header(AUTHORIZATION)?;
        authorization
            .strip_prefix(BEARER_PREFIX)
            .map(std::string::ToString::to_string)
    }

    fn basic_auth(&self) -> Option<(String, String)> {
        let authorization = self.get_header(AUTHORIZATION)?;

        let value = authorization.strip_prefix(BASIC_PREFIX)?;
        let value = BASE64_STANDARD.decode(value).ok()?;
        let value = String::from_utf8(value).ok()?;

        let (username, password) = value.split_once(':')?;
        Some((username.to_string(), password.to_string()))
    }

    fn digest_auth(&self) -> Option<BTreeMap<String, String>> {
        let authorization = self.get_header(AUTHORIZATION)?;
        let value = authorization.strip_prefix(DIGEST_PREFIX)?;

        let params = split_digest_params(value)
            .into_iter()
            .filter_map(|param| {
                let (key, value) = param.split_once('=')?;
                let value = value.trim().trim_matches('"');
                Some((key.trim().to_ascii_lowercase(), value.to_string()))
            })
            .collect::<BTreeMap<_, _>>();

        if params.is_empty() {
            None
        } else {
            Some(params)
        }
    }

    fn peer_certificate(&self) -> Option<&PeerCertificate> {
        self.extensions.get::<PeerCertificate>()
    }
}

// Splits on commas that are not inside a quoted value.
fn split_digest_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (index, c) in value.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                params.push(&value[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);

    params
        .into_iter()
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Credential;
    use hyper::header::USER_AGENT;
    use hyper::Request;
    use std::sync::Arc;

    #[test]
    fn test_get_header_exists() {
        let request = Request::builder()
            .header(USER_AGENT, "test-agent/1.0")
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();

        let result = parts.get_header(USER_AGENT);
        assert_eq!(result, Some("test-agent/1.0".to_string()));
    }

    #[test]
    fn test_get_header_missing() {
        let request = Request::builder().body(()).unwrap();
        let (parts, ()) = request.into_parts();

        assert_eq!(parts.get_header(USER_AGENT), None);
    }

    #[test]
    fn test_bearer_token() {
        let request = Request::builder()
            .header(AUTHORIZATION, "Bearer abc.def.ghi")
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();

        assert_eq!(parts.bearer_token(), Some("abc.def.ghi".to_string()));
        assert_eq!(parts.basic_auth(), None);
    }

    #[test]
    fn test_basic_auth() {
        let encoded = BASE64_STANDARD.encode("alice:s3cr:et");
        let request = Request::builder()
            .header(AUTHORIZATION, format!("Basic {encoded}"))
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();

        assert_eq!(
            parts.basic_auth(),
            Some(("alice".to_string(), "s3cr:et".to_string()))
        );
        assert_eq!(parts.bearer_token(), None);
    }

    #[test]
    fn test_basic_auth_invalid_base64() {
        let request = Request::builder()
            .header(AUTHORIZATION, "Basic !!not-base64!!")
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();

        assert_eq!(parts.basic_auth(), None);
    }

    #[test]
    fn test_digest_auth() {
        let request = Request::builder()
            .header(
                AUTHORIZATION,
                r#"Digest username="alice", realm="a, b", nonce="dcd98b", uri="/index", qop=auth, nc=00000001"#,
            )
            .body(())
            .unwrap();
        let (parts, ()) = request.into_parts();

        let params = parts.digest_auth().unwrap();
        assert_eq!(params.len(), 6);
        assert_eq!(params.get("username").map(String::as_str), Some("alice"));
        assert_eq!(params.get("realm").map(String::as_str), Some("a, b"));
        assert_eq!(params.get("qop").map(String::as_str), Some("auth"));

        let credential = Credential::Digest(params);
        assert_eq!(credential.kind(), "digest");
    }

    #[test]
    fn test_peer_certificate_extension() {
        let mut request = Request::builder().body(()).unwrap();
        let certificate = PeerCertificate(Arc::new(vec![0x30, 0x82]));
        request.extensions_mut().insert(certificate.clone());
        let (parts, ()) = request.into_parts();

        assert_eq!(parts.peer_certificate(), Some(&certificate));
    }
}
