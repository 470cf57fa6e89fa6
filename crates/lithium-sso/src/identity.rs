use crate::{record::token_safe, utils::random};
use std::fmt;

/// Used when the caller supplies no usable server id.
pub const DEFAULT_SERVER_ID: &str = "34";

/// Number of random bytes behind the hex suffix (two hex digits each).
const SUFFIX_BYTES: usize = 16;

/// `<server id>-<32 uppercase hex digits>`, fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity(String);

impl ServerIdentity {
    pub fn generate(server_id: Option<&str>) -> Self {
        let id = server_id.map(str::trim).unwrap_or_default();
        let id = if id.is_empty() {
            DEFAULT_SERVER_ID.to_string()
        } else {
            token_safe(id)
        };

        Self(format!("{}-{}", id, random::random_hex_upper(SUFFIX_BYTES)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The random part after the last `-`.
    pub fn suffix(&self) -> &str {
        self.0.rsplit_once('-').map(|(_, s)| s).unwrap_or_default()
    }
}

impl fmt::Display for ServerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
