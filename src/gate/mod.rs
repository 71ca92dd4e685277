mod settings;

use std::future::Future;

use hyper::header::HeaderMap;
use hyper::http::request::Parts;
use hyper::{Request, Response};
use tracing::{debug, instrument, warn};

use crate::configuration::InitParameters;
use crate::http::ResponseBody;
use crate::identity::scope::{self, CredentialsProvider, IdentityProvider};
use crate::identity::Account;
use crate::scheme::{self, AuthenticationScheme, SchemeRegistry};
use crate::Error;

pub use settings::GateSettings;

/// Outcome of the gate for one request.
#[derive(Debug)]
pub enum Verdict {
    /// Continue down the pipeline. `headers` were staged by the scheme and belong on the
    /// downstream response; `account` is the authenticated principal, if any.
    Proceed {
        account: Option<Account>,
        headers: HeaderMap,
    },
    /// Stop here and send this response (a challenge, or the scheme's own response).
    Halt(Response<ResponseBody>),
}

impl Verdict {
    fn pass_through(account: Option<Account>) -> Self {
        Verdict::Proceed {
            account,
            headers: HeaderMap::new(),
        }
    }
}

/// Authentication entry point placed in front of the request pipeline.
///
/// The scheme and the settings are fixed at construction; the gate itself is immutable and
/// can be shared across concurrent requests.
pub struct AuthenticationGate {
    scheme: Box<dyn AuthenticationScheme>,
    settings: GateSettings,
    identities: IdentityProvider,
    credentials: CredentialsProvider,
}

impl AuthenticationGate {
    /// Resolve and initialize the scheme, then read the gate settings.
    pub fn new(
        config: &dyn InitParameters,
        registry: SchemeRegistry,
        identities: IdentityProvider,
        credentials: CredentialsProvider,
    ) -> Result<Self, Error> {
        let mut scheme = scheme::resolve(registry, config)?;
        scheme.initialize(config)?;

        let settings = GateSettings::from_parameters(config);
        debug!(
            "Authentication gate ready with scheme {} (unprotected methods: {:?}, forced re-authentication: {})",
            scheme.type_name(),
            settings.unprotected_methods,
            settings.force_reauthentication
        );

        Ok(Self {
            scheme,
            settings,
            identities,
            credentials,
        })
    }

    pub fn scheme(&self) -> &dyn AuthenticationScheme {
        self.scheme.as_ref()
    }

    pub fn settings(&self) -> &GateSettings {
        &self.settings
    }

    /// Unprotected methods are never protected; otherwise the scheme decides.
    pub fn is_resource_protected(&self, parts: &Parts) -> bool {
        !self.settings.is_unprotected_method(parts.method.as_str())
            && self.scheme.is_protected(parts)
    }

    /// Run the authentication protocol for one request.
    #[instrument(skip_all, fields(scheme = self.scheme.type_name(), method = %parts.method, path = parts.uri.path()))]
    pub fn authenticate(&self, parts: &Parts) -> Result<Verdict, Error> {
        debug!("Preparing to authenticate");

        let identity = scope::select_unique(self.identities.lookup(parts), "Identity")?;
        let credentials =
            scope::select_unique(self.credentials.lookup(parts), "LoginCredentials")?;
        credentials.invalidate();

        self.scheme.extract_credential(parts, &credentials);
        debug!("Credentials extracted from request: {:?}", credentials.credential());

        if credentials.has_credential() && self.settings.force_reauthentication {
            debug!(
                "Forcing re-authentication. Logging out current account {:?}",
                identity.account()
            );
            identity.logout();
            self.scheme.extract_credential(parts, &credentials);
        }

        if !self.is_resource_protected(parts) || identity.is_logged_in() {
            debug!("Passing request through");
            return Ok(Verdict::pass_through(identity.account()));
        }

        if credentials.has_credential() {
            debug!("Authenticating using credentials {:?}", credentials.credential());
            if let Err(error) = identity.login(&credentials) {
                warn!(
                    user_id = ?credentials.user_id(),
                    "Authentication failed: {error}"
                );
            }
        }

        let mut response = Response::new(ResponseBody::empty());

        if !identity.is_logged_in() {
            debug!("Challenging client");
            self.scheme.challenge_client(parts, &mut response);
            return Ok(Verdict::Halt(response));
        }

        if self.scheme.post_authentication(parts, &mut response) {
            let account = identity.account();
            debug!("Authentication was successful. Account {account:?}");
            let (response_parts, _) = response.into_parts();
            Ok(Verdict::Proceed {
                account,
                headers: response_parts.headers,
            })
        } else {
            debug!("Authentication scheme does not want to continue processing the request");
            Ok(Verdict::Halt(response))
        }
    }

    /// Authenticate `request` and hand it to `next` when the gate lets it through.
    ///
    /// The authenticated account, if any, is inserted into the request extensions.
    pub fn filter<B, F>(&self, request: Request<B>, next: F) -> Result<Response<ResponseBody>, Error>
    where
        F: FnOnce(Request<B>) -> Response<ResponseBody>,
    {
        let (mut parts, body) = request.into_parts();

        match self.authenticate(&parts)? {
            Verdict::Proceed { account, headers } => {
                if let Some(account) = account {
                    parts.extensions.insert(account);
                }
                let mut response = next(Request::from_parts(parts, body));
                merge_headers(&mut response, &headers);
                Ok(response)
            }
            Verdict::Halt(response) => Ok(response),
        }
    }

    /// Same as [`AuthenticationGate::filter`], for asynchronous pipelines.
    pub async fn filter_async<B, F, Fut>(
        &self,
        request: Request<B>,
        next: F,
    ) -> Result<Response<ResponseBody>, Error>
    where
        F: FnOnce(Request<B>) -> Fut,
        Fut: Future<Output = Response<ResponseBody>>,
    {
        let (mut parts, body) = request.into_parts();

        match self.authenticate(&parts)? {
            Verdict::Proceed { account, headers } => {
                if let Some(account) = account {
                    parts.extensions.insert(account);
                }
                let mut response = next(Request::from_parts(parts, body)).await;
                merge_headers(&mut response, &headers);
                Ok(response)
            }
            Verdict::Halt(response) => Ok(response),
        }
    }
}

fn merge_headers(response: &mut Response<ResponseBody>, headers: &HeaderMap) {
    for (name, value) in headers {
        response.headers_mut().append(name, value.clone());
    }
}
