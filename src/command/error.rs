use argon2::password_hash;
use auth_gate::configuration;
use std::{fmt, io};

#[derive(Debug)]
pub enum Error {
    IO(io::Error),
    Configuration(configuration::Error),
    Hashing(String),
    EmptyPassword,
    PasswordMismatch,
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IO(err) => write!(f, "IO error: {err}"),
            Error::Configuration(err) => {
                write!(f, "Configuration error:")?;
                write!(f, "{err}")
            }
            Error::Hashing(err) => write!(f, "Password hashing error: {err}"),
            Error::EmptyPassword => write!(f, "Password must not be empty"),
            Error::PasswordMismatch => write!(f, "Passwords do not match"),
            Error::Serialization(err) => write!(f, "Cannot render identity entry: {err}"),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IO(err)
    }
}

impl From<configuration::Error> for Error {
    fn from(err: configuration::Error) -> Self {
        Error::Configuration(err)
    }
}

impl From<password_hash::Error> for Error {
    fn from(err: password_hash::Error) -> Self {
        Error::Hashing(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::Hashing("unsupported algorithm".to_string());
        assert_eq!(
            format!("{error}"),
            "Password hashing error: unsupported algorithm"
        );

        let error: Error = configuration::Error::ConfigurationFileFormat("bad".to_string()).into();
        assert_eq!(
            format!("{error}"),
            "Configuration error:Configuration file format error.bad"
        );

        assert_eq!(format!("{}", Error::PasswordMismatch), "Passwords do not match");
    }

    #[test]
    fn test_from_argon2_error() {
        let error: Error = password_hash::Error::Algorithm.into();
        assert!(matches!(error, Error::Hashing(msg) if msg == "unsupported algorithm"));
    }
}
