//! Lookup of the scoped collaborators the gate needs for every request.
//!
//! A provider returns every instance visible for the request; the gate requires exactly one.

use std::marker::PhantomData;
use std::sync::Arc;

use hyper::http::request::Parts;

use crate::identity::{Identity, LoginCredentials};
use crate::Error;

pub type IdentityProvider = Arc<dyn ScopeProvider<Arc<dyn Identity>>>;
pub type CredentialsProvider = Arc<dyn ScopeProvider<Arc<LoginCredentials>>>;

pub trait ScopeProvider<T>: Send + Sync {
    /// Every instance in scope for this request.
    fn lookup(&self, parts: &Parts) -> Vec<T>;
}

/// Resolve a lookup to its single instance. `scope` names the collaborator in errors.
pub fn select_unique<T>(mut instances: Vec<T>, scope: &'static str) -> Result<T, Error> {
    match instances.len() {
        0 => Err(Error::ScopeUnsatisfied(scope)),
        1 => instances.pop().ok_or(Error::ScopeUnsatisfied(scope)),
        _ => Err(Error::ScopeAmbiguous(scope)),
    }
}

/// A single instance used for every request.
pub struct Shared<T>(pub T);

impl<T> ScopeProvider<T> for Shared<T>
where
    T: Clone + Send + Sync,
{
    fn lookup(&self, _parts: &Parts) -> Vec<T> {
        vec![self.0.clone()]
    }
}

/// Instance inserted into the request extensions by an upstream session layer.
pub struct RequestExtension<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> RequestExtension<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for RequestExtension<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScopeProvider<T> for RequestExtension<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn lookup(&self, parts: &Parts) -> Vec<T> {
        parts.extensions.get::<T>().cloned().into_iter().collect()
    }
}

/// Fresh, empty credentials for every request.
pub struct PerRequest;

impl ScopeProvider<Arc<LoginCredentials>> for PerRequest {
    fn lookup(&self, _parts: &Parts) -> Vec<Arc<LoginCredentials>> {
        vec![Arc::new(LoginCredentials::new())]
    }
}
