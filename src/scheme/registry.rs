use std::collections::BTreeSet;

use crate::scheme::{AuthenticationScheme, SchemeType};

/// Scheme instances the resolver may choose from.
///
/// Preferred schemes are the application's explicit choice and override the `authType`
/// init parameter; plain candidates are looked up by type.
#[derive(Default)]
pub struct SchemeRegistry {
    pub(super) preferred: Vec<Box<dyn AuthenticationScheme>>,
    pub(super) candidates: Vec<Box<dyn AuthenticationScheme>>,
    declared_types: BTreeSet<String>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_preferred<S: AuthenticationScheme + 'static>(mut self, scheme: S) -> Self {
        self.preferred.push(Box::new(scheme));
        self
    }

    #[must_use]
    pub fn with_candidate<S: AuthenticationScheme + 'static>(mut self, scheme: S) -> Self {
        self.candidates.push(Box::new(scheme));
        self
    }

    /// Make a custom scheme type name resolvable even when no candidate is registered yet.
    #[must_use]
    pub fn with_declared_type(mut self, name: impl Into<String>) -> Self {
        self.declared_types.insert(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.preferred.is_empty() && self.candidates.is_empty()
    }

    /// Whether `name` refers to a scheme type this registry knows about.
    pub fn knows_type(&self, name: &str) -> bool {
        self.declared_types.contains(name)
            || self.candidates.iter().any(|candidate| {
                candidate.type_name() == name
                    || candidate.scheme_type() == SchemeType::Custom(name.to_string())
            })
    }
}
