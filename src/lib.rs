#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

//! Request-level authentication gate.
//!
//! For every inbound request the [`AuthenticationGate`] decides, through the single
//! [`AuthenticationScheme`] resolved at startup, whether the request continues down the
//! pipeline, is challenged, or is rejected.

pub mod configuration;
mod error;
pub mod gate;
pub mod http;
pub mod identity;
pub mod scheme;

pub use error::Error;
pub use gate::{AuthenticationGate, GateSettings, Verdict};
pub use identity::{Account, AuthenticationError, Credential, Identity, LoginCredentials};
pub use scheme::{AuthenticationScheme, SchemeRegistry, SchemeType};
