use crate::error::ConfigError;
use std::fmt;

/// A 128-bit or 256-bit AES key. Cipher width follows the key length.
#[derive(Clone, PartialEq, Eq)]
pub enum SsoKey {
    Aes128([u8; 16]),
    Aes256([u8; 32]),
}

impl SsoKey {
    /// Decodes a key from its hexadecimal representation (either case).
    pub fn from_hex(hex_key: &str) -> Result<Self, ConfigError> {
        let hex_key = hex_key.trim();
        if hex_key.is_empty() {
            return Err(ConfigError::KeyRequired);
        }
        let bytes =
            hex::decode(hex_key).map_err(|e| ConfigError::InvalidKeyEncoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        match bytes.len() {
            0 => Err(ConfigError::KeyRequired),
            16 => {
                let mut key = [0u8; 16];
                key.copy_from_slice(bytes);
                Ok(Self::Aes128(key))
            }
            32 => {
                let mut key = [0u8; 32];
                key.copy_from_slice(bytes);
                Ok(Self::Aes256(key))
            }
            len => Err(ConfigError::InvalidKeyLength(len)),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Aes128(key) => key,
            Self::Aes256(key) => key,
        }
    }

    pub fn bits(&self) -> usize {
        self.as_bytes().len() * 8
    }
}

impl TryFrom<&str> for SsoKey {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_hex(value)
    }
}

impl TryFrom<&[u8]> for SsoKey {
    type Error = ConfigError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(value)
    }
}

impl fmt::Debug for SsoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SsoKey(AES-{}, <redacted>)", self.bits())
    }
}
