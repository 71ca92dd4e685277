use std::fmt;

use argh::FromArgs;
use auth_gate::configuration::Configuration;
use auth_gate::identity::{PasswordAuthenticator, RejectedIdentity};
use auth_gate::{GateSettings, SchemeType};
use tracing::{info, warn};

use crate::command;

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "check",
    description = "Validate the configuration and report the resulting gate settings"
)]
pub struct Options {}

#[derive(Debug, PartialEq)]
enum AuthType {
    Unset,
    Builtin(SchemeType),
    Reference(String),
}

#[derive(Debug)]
struct Report {
    auth_type: AuthType,
    unprotected_methods: Vec<String>,
    force_reauthentication: bool,
    accounts: usize,
    rejected: Vec<RejectedIdentity>,
}

impl Report {
    fn invalid_hashes(&self) -> usize {
        self.rejected
            .iter()
            .filter(|rejected| matches!(rejected, RejectedIdentity::InvalidHash { .. }))
            .count()
    }

    fn duplicate_usernames(&self) -> usize {
        self.rejected.len() - self.invalid_hashes()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.auth_type {
            AuthType::Unset => writeln!(
                f,
                "authType: not set, the application must register a preferred scheme"
            )?,
            AuthType::Builtin(scheme_type) => writeln!(f, "authType: {scheme_type} (built-in)")?,
            AuthType::Reference(name) => {
                writeln!(f, "authType: {name} (custom scheme type reference)")?;
            }
        }

        if self.unprotected_methods.is_empty() {
            writeln!(f, "unprotectedMethods: none")?;
        } else {
            writeln!(f, "unprotectedMethods: {}", self.unprotected_methods.join(", "))?;
        }
        writeln!(f, "forceReAuthentication: {}", self.force_reauthentication)?;
        write!(
            f,
            "accounts: {} usable, {} invalid hash, {} duplicate username",
            self.accounts,
            self.invalid_hashes(),
            self.duplicate_usernames()
        )
    }
}

pub struct Command {
    config: Configuration,
}

impl Command {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<(), command::Error> {
        let report = self.report();
        for rejected in &report.rejected {
            warn!("Ignoring {rejected}");
        }
        info!("Configuration is valid");

        println!("{report}");
        Ok(())
    }

    fn report(&self) -> Report {
        let settings = GateSettings::from_parameters(&self.config.gate);

        let auth_type = match settings.auth_type.as_deref() {
            None => AuthType::Unset,
            Some(name) => SchemeType::builtin(name)
                .map_or_else(|| AuthType::Reference(name.to_string()), AuthType::Builtin),
        };

        let mut unprotected_methods = settings
            .unprotected_methods
            .iter()
            .cloned()
            .collect::<Vec<_>>();
        unprotected_methods.sort();

        let authenticator = PasswordAuthenticator::new(&self.config.identity);

        Report {
            auth_type,
            unprotected_methods,
            force_reauthentication: settings.force_reauthentication,
            accounts: authenticator.len(),
            rejected: authenticator.rejected().to_vec(),
        }
    }
}
