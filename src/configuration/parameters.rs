use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

pub const AUTH_TYPE_INIT_PARAM: &str = "authType";
pub const UNPROTECTED_METHODS_INIT_PARAM: &str = "unprotectedMethods";
pub const FORCE_REAUTHENTICATION_INIT_PARAM: &str = "forceReAuthentication";

/// Read access to the gate's init parameters.
///
/// The gate reads its own keys from it and hands the same source to the scheme's
/// `initialize`, so schemes can read their own settings (realm, login page, ...).
pub trait InitParameters {
    fn init_parameter(&self, name: &str) -> Option<String>;
}

/// Init parameters held as a name/value map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterConfig {
    parameters: BTreeMap<String, String>,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(name.into(), value.into());
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }
}

impl InitParameters for FilterConfig {
    fn init_parameter(&self, name: &str) -> Option<String> {
        self.parameters.get(name).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for FilterConfig
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let parameters = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self { parameters }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParameterValue {
    String(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    List(Vec<String>),
}

impl From<ParameterValue> for String {
    fn from(value: ParameterValue) -> Self {
        match value {
            ParameterValue::String(value) => value,
            ParameterValue::Bool(value) => value.to_string(),
            ParameterValue::Integer(value) => value.to_string(),
            ParameterValue::Float(value) => value.to_string(),
            ParameterValue::List(values) => values.join(","),
        }
    }
}

impl<'de> Deserialize<'de> for FilterConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = BTreeMap::<String, ParameterValue>::deserialize(deserializer)?;
        Ok(values.into_iter().collect())
    }
}
