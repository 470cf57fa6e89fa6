use crate::{
    error::{Error, Result},
    key::SsoKey,
    utils::{
        crypto::{AesCbcProvider, CompressionFormat},
        random::{self, IV_CHARSET, IV_LEN},
    },
};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};

/// Leading marker of every token, identifies the encoding version.
pub const TOKEN_PREFIX: &str = "~2";
pub const TOKEN_IV_SEPARATOR: char = '~';

/// Compress, encrypt and frame a payload into an opaque token:
/// `~2<iv>~<url-safe base64 ciphertext>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCodec {
    compression: CompressionFormat,
}

impl TokenCodec {
    pub fn new(compression: CompressionFormat) -> Self {
        Self { compression }
    }

    pub fn compression(&self) -> CompressionFormat {
        self.compression
    }

    /// Encodes `payload` under `key` with a fresh IV from the OS CSPRNG.
    pub fn encode(&self, payload: &[u8], key: &SsoKey) -> Result<String> {
        self.encode_with_iv(payload, key, &random::random_iv())
    }

    /// Encodes with a caller-chosen IV. The IV is written into the token as-is,
    /// so every byte must come from [`IV_CHARSET`]; anything else is rejected
    /// with [`Error::InvalidIv`]. Reusing an IV under one key leaks plaintext
    /// structure.
    pub fn encode_with_iv(&self, payload: &[u8], key: &SsoKey, iv: &[u8; IV_LEN]) -> Result<String> {
        if !iv.iter().all(|b| IV_CHARSET.contains(b)) {
            return Err(Error::InvalidIv);
        }

        let compressed = self.compression.compress(payload)?;

        let ciphertext = match key {
            SsoKey::Aes128(k) => AesCbcProvider::encrypt_128(&compressed, k, iv),
            SsoKey::Aes256(k) => AesCbcProvider::encrypt_256(&compressed, k, iv),
        };

        let body = url_safe_base64(&ciphertext);

        let mut token = String::with_capacity(TOKEN_PREFIX.len() + IV_LEN + 1 + body.len());
        token.push_str(TOKEN_PREFIX);
        token.extend(iv.iter().map(|&b| b as char));
        token.push(TOKEN_IV_SEPARATOR);
        token.push_str(&body);
        Ok(token)
    }
}

/// Standard base64 with `+` -> `-`, `/` -> `_`, `=` -> `.`.
pub fn url_safe_base64(data: &[u8]) -> String {
    URL_SAFE.encode(data).replace('=', ".")
}
