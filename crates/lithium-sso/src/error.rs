use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not initialize Lithium SSO client: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Could not create Lithium token: {0}")]
    Validation(#[from] ValidationError),

    /// Compressor fault or unreadable config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IV must be 16 alphanumeric characters")]
    InvalidIv,
}

/// Setup failures. Fatal for the client being constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("client id required")]
    ClientIdRequired,

    #[error("client domain required")]
    ClientDomainRequired,

    #[error("SSO key required")]
    KeyRequired,

    #[error("key must be 128-bit or 256-bit in length, got {0} bytes")]
    InvalidKeyLength(usize),

    #[error("key is not valid hexadecimal: {0}")]
    InvalidKeyEncoding(String),

    #[error("PrivacyGuard key required")]
    PrivacyGuardKeyRequired,
}

/// Per-call failures raised before any record is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} required")]
    MissingField(Field),
}

/// Identity claims that must be present on every token request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    UniqueId,
    Login,
    Email,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::UniqueId => "unique_id",
            Field::Login => "login",
            Field::Email => "email",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
