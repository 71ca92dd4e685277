use tracing::{debug, info, instrument};

use crate::configuration::{InitParameters, AUTH_TYPE_INIT_PARAM};
use crate::scheme::{AuthenticationScheme, SchemeRegistry, SchemeType};
use crate::Error;

fn ambiguous(message: &str, schemes: &[Box<dyn AuthenticationScheme>]) -> Error {
    Error::AmbiguousScheme {
        message: message.to_string(),
        candidates: schemes
            .iter()
            .map(|scheme| scheme.type_name().to_string())
            .collect(),
    }
}

/// Select the single scheme bound to the gate.
///
/// A preferred scheme wins over the `authType` init parameter, which is then never read.
/// Otherwise `authType` names a built-in type or a custom type known to the registry, and
/// exactly one candidate must implement it.
#[instrument(skip(registry, config))]
pub fn resolve(
    mut registry: SchemeRegistry,
    config: &dyn InitParameters,
) -> Result<Box<dyn AuthenticationScheme>, Error> {
    if registry.preferred.len() > 1 {
        return Err(ambiguous(
            "There is more than one preferred authentication scheme. Make sure only one is registered.",
            &registry.preferred,
        ));
    }
    if let Some(scheme) = registry.preferred.pop() {
        info!("Using preferred authentication scheme {}", scheme.type_name());
        return Ok(scheme);
    }

    let Some(auth_type) = config.init_parameter(AUTH_TYPE_INIT_PARAM) else {
        return Err(Error::SchemeNotConfigured);
    };

    let scheme_type = match SchemeType::builtin(&auth_type) {
        Some(scheme_type) => scheme_type,
        None if registry.knows_type(&auth_type) => {
            debug!("'{auth_type}' is not a built-in scheme type, using it as a type reference");
            SchemeType::Custom(auth_type.clone())
        }
        None => return Err(Error::SchemeNotFound(auth_type)),
    };

    let mut matching = std::mem::take(&mut registry.candidates)
        .into_iter()
        .filter(|candidate| {
            candidate.scheme_type() == scheme_type || candidate.type_name() == auth_type
        })
        .collect::<Vec<_>>();

    if matching.len() > 1 {
        return Err(ambiguous(
            "Authentication scheme type from the configuration is ambiguous.",
            &matching,
        ));
    }

    let scheme = matching
        .pop()
        .ok_or_else(|| Error::SchemeUnsatisfied(scheme_type.to_string()))?;
    info!(
        "Using authentication scheme {} for type {scheme_type}",
        scheme.type_name()
    );
    Ok(scheme)
}
