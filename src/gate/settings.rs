use std::collections::HashSet;

use crate::configuration::{
    InitParameters, AUTH_TYPE_INIT_PARAM, FORCE_REAUTHENTICATION_INIT_PARAM,
    UNPROTECTED_METHODS_INIT_PARAM,
};

/// Gate settings, fixed once the gate is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GateSettings {
    pub auth_type: Option<String>,
    pub unprotected_methods: HashSet<String>,
    pub force_reauthentication: bool,
}

impl GateSettings {
    pub fn from_parameters(config: &dyn InitParameters) -> Self {
        let unprotected_methods = config
            .init_parameter(UNPROTECTED_METHODS_INIT_PARAM)
            .map(|methods| parse_methods(&methods))
            .unwrap_or_default();

        // only a case-insensitive "true" enables it, untrimmed
        let force_reauthentication = config
            .init_parameter(FORCE_REAUTHENTICATION_INIT_PARAM)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));

        Self {
            auth_type: config.init_parameter(AUTH_TYPE_INIT_PARAM),
            unprotected_methods,
            force_reauthentication,
        }
    }

    pub fn is_unprotected_method(&self, method: &str) -> bool {
        self.unprotected_methods
            .contains(&method.to_ascii_uppercase())
    }
}

fn parse_methods(methods: &str) -> HashSet<String> {
    methods
        .split(',')
        .map(str::trim)
        .filter(|method| !method.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}
