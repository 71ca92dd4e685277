use std::collections::BTreeMap;

use crate::command;
use argh::FromArgs;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Params, PasswordHasher, Version};
use auth_gate::configuration::IdentityConfig;
use serde::Serialize;

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "argon",
    description = "Hash a password following the argon2id algorithm"
)]
pub struct Options {
    #[argh(option, short = 'u')]
    /// print a complete `[identity]` entry for this username instead of the bare hash
    username: Option<String>,

    #[argh(option)]
    /// key of the printed `[identity]` entry, defaults to the username
    id: Option<String>,
}

#[derive(Serialize)]
struct IdentityEntry<'a> {
    identity: BTreeMap<&'a str, IdentityConfig>,
}

pub struct Command {
    options: Options,
}

impl Command {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn run(&self) -> Result<(), command::Error> {
        let password = rpassword::prompt_password("Input Password: ")?;
        let confirmation = rpassword::prompt_password("Confirm Password: ")?;

        let hash = hash_confirmed(&password, &confirmation)?;
        println!("{}", self.render(hash)?);
        Ok(())
    }

    fn render(&self, hash: String) -> Result<String, command::Error> {
        let Some(username) = &self.options.username else {
            return Ok(hash);
        };
        let id = self.options.id.as_deref().unwrap_or(username.as_str());

        let entry = IdentityEntry {
            identity: BTreeMap::from([(
                id,
                IdentityConfig {
                    username: username.clone(),
                    password: hash,
                },
            )]),
        };
        Ok(toml::to_string(&entry)?)
    }
}

fn hash_confirmed(password: &str, confirmation: &str) -> Result<String, command::Error> {
    if password.is_empty() {
        return Err(command::Error::EmptyPassword);
    }
    if password != confirmation {
        return Err(command::Error::PasswordMismatch);
    }
    hash_password(password)
}

fn hash_password(password: &str) -> Result<String, command::Error> {
    let salt = SaltString::generate(OsRng);

    let config = Params::default();
    let argon = argon2::Argon2::new(Algorithm::Argon2id, Version::V0x13, config);
    let hash = argon.hash_password(password.as_bytes(), &salt)?;

    Ok(hash.to_string())
}
