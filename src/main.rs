#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use crate::command::{argon, check};
use argh::FromArgs;
use auth_gate::configuration::Configuration;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

mod command;

fn set_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .try_init();
}

#[derive(FromArgs, PartialEq, Debug)]
/// Operator tooling for the authentication gate
struct GlobalArguments {
    #[argh(option, short = 'c', default = "String::from(\"config.toml\")")]
    /// the path to the configuration file, defaults to `config.toml`
    config: String,

    #[argh(subcommand)]
    subcommand: SubCommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
enum SubCommand {
    Argon(argon::Options),
    Check(check::Options),
}

fn main() -> Result<(), command::Error> {
    let cli_args: GlobalArguments = argh::from_env();
    set_tracing();

    match cli_args.subcommand {
        SubCommand::Argon(options) => argon::Command::new(options).run(),
        SubCommand::Check(_) => {
            let config = Configuration::load(&cli_args.config)?;
            check::Command::new(config).run()
        }
    }
}
