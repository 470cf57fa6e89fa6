use crate::{
    codec::TokenCodec,
    config::SsoConfig,
    error::{ConfigError, Result},
    identity::ServerIdentity,
    key::SsoKey,
    record::{self, AuthTokenRequest, RecordHeader, RequestContext},
    utils::crypto::CompressionFormat,
};
use chrono::Utc;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    PoisonError, RwLock,
};

/// Prefix of the cookie the remote service reads the token from.
pub const COOKIE_NAME_PREFIX: &str = "lithiumSSO%3A";

/// Issues SSO tokens for one client/community.
///
/// Safe to share between threads: the sequence counter is atomic and the
/// PrivacyGuard key sits behind a lock.
pub struct SsoClient {
    client_id: String,
    client_domain: String,
    key: SsoKey,
    server_identity: ServerIdentity,
    sequence: AtomicU64,
    context: RequestContext,
    codec: TokenCodec,
    privacy_guard: RwLock<Option<SsoKey>>,
}

impl SsoClient {
    pub fn builder() -> SsoClientBuilder {
        SsoClientBuilder::default()
    }

    /// Creates a client from a hexadecimal key, validating every argument.
    pub fn new(
        client_id: impl Into<String>,
        client_domain: impl Into<String>,
        sso_hex_key: &str,
        server_id: Option<&str>,
        context: RequestContext,
    ) -> Result<Self> {
        let mut builder = Self::builder()
            .client_id(client_id)
            .client_domain(client_domain)
            .hex_key(sso_hex_key)
            .request_context(context);
        if let Some(server_id) = server_id {
            builder = builder.server_id(server_id);
        }
        builder.build()
    }

    /// Builds a client from a parsed config, installing the PrivacyGuard key
    /// when one is configured.
    pub fn from_config(config: &SsoConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .client_id(&config.client_id)
            .client_domain(&config.client_domain)
            .hex_key(&config.sso_key)
            .request_context(config.request_context())
            .compression(config.compression);
        if let Some(server_id) = &config.server_id {
            builder = builder.server_id(server_id);
        }

        let client = builder.build()?;
        // A blank key in the config means PrivacyGuard is not configured.
        let pg_key = config
            .privacy_guard_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());
        if let Some(pg_key) = pg_key {
            client.init_privacy_guard(pg_key)?;
        }
        Ok(client)
    }

    /// Issues a token using the request context captured at construction.
    pub fn issue_token(&self, request: &AuthTokenRequest) -> Result<String> {
        self.issue_token_with_context(request, &self.context)
    }

    /// Issues a token for a specific end-user request context.
    pub fn issue_token_with_context(
        &self,
        request: &AuthTokenRequest,
        context: &RequestContext,
    ) -> Result<String> {
        request.validate()?;

        let header = RecordHeader {
            server_identity: self.server_identity.as_str(),
            sequence: self.next_sequence(),
            timestamp_ms: Utc::now().timestamp_millis(),
            client_domain: &self.client_domain,
            client_id: &self.client_id,
        };
        let raw = record::build_record(&header, context, request);
        let token = self.codec.encode(raw.as_bytes(), &self.key)?;

        tracing::debug!(
            client_id = %self.client_id,
            sequence = header.sequence,
            settings = request.settings.len(),
            record_len = raw.len(),
            token_len = token.len(),
            "Issued SSO token"
        );

        Ok(token)
    }

    /// Installs the PrivacyGuard key (hexadecimal, 128 or 256 bit).
    /// A later call replaces the previous key.
    pub fn init_privacy_guard(&self, pg_hex_key: &str) -> Result<()> {
        if pg_hex_key.trim().is_empty() {
            return Err(ConfigError::PrivacyGuardKeyRequired.into());
        }
        let key = SsoKey::from_hex(pg_hex_key)?;
        self.set_privacy_guard_key(key);
        Ok(())
    }

    pub fn set_privacy_guard_key(&self, key: SsoKey) {
        tracing::info!(client_id = %self.client_id, bits = key.bits(), "PrivacyGuard key installed");
        *self
            .privacy_guard
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(key);
    }

    pub fn has_privacy_guard(&self) -> bool {
        self.privacy_guard
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Encrypts a single value under the PrivacyGuard key so it can be embedded
    /// in a token as an opaque string. Returns an empty string when no
    /// PrivacyGuard key is installed.
    pub fn privacy_guard_field(&self, value: &str) -> Result<String> {
        let guard = self
            .privacy_guard
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(key) => self.codec.encode(value.as_bytes(), key),
            None => Ok(String::new()),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_domain(&self) -> &str {
        &self.client_domain
    }

    pub fn server_identity(&self) -> &ServerIdentity {
        &self.server_identity
    }

    pub fn request_context(&self) -> &RequestContext {
        &self.context
    }

    /// Name of the cookie carrying the token, scoped to `client_domain`.
    pub fn cookie_name(&self) -> String {
        format!("{}{}", COOKIE_NAME_PREFIX, self.client_id)
    }

    /// Creates a tracing span carrying the client identity.
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "sso_client",
            client_id = %self.client_id,
            domain = %self.client_domain
        )
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }
}

impl std::fmt::Debug for SsoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsoClient")
            .field("client_id", &self.client_id)
            .field("client_domain", &self.client_domain)
            .field("key", &self.key)
            .field("server_identity", &self.server_identity)
            .field("compression", &self.codec.compression())
            .field("privacy_guard", &self.has_privacy_guard())
            .finish()
    }
}

enum KeyMaterial {
    Hex(String),
    Bytes(Vec<u8>),
}

#[derive(Default)]
pub struct SsoClientBuilder {
    client_id: Option<String>,
    client_domain: Option<String>,
    key: Option<KeyMaterial>,
    server_id: Option<String>,
    context: RequestContext,
    compression: CompressionFormat,
}

impl SsoClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_domain(mut self, domain: impl Into<String>) -> Self {
        self.client_domain = Some(domain.into());
        self
    }

    pub fn hex_key(mut self, hex_key: impl Into<String>) -> Self {
        self.key = Some(KeyMaterial::Hex(hex_key.into()));
        self
    }

    pub fn key_bytes(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(KeyMaterial::Bytes(key.into()));
        self
    }

    pub fn server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }

    pub fn request_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    pub fn compression(mut self, compression: CompressionFormat) -> Self {
        self.compression = compression;
        self
    }

    pub fn build(self) -> Result<SsoClient> {
        let client_id = self
            .client_id
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::ClientIdRequired)?;
        let client_domain = self
            .client_domain
            .filter(|domain| !domain.is_empty())
            .ok_or(ConfigError::ClientDomainRequired)?;
        let key = match self.key {
            Some(KeyMaterial::Hex(hex_key)) => SsoKey::from_hex(&hex_key)?,
            Some(KeyMaterial::Bytes(bytes)) => SsoKey::from_bytes(&bytes)?,
            None => return Err(ConfigError::KeyRequired.into()),
        };

        let server_identity = ServerIdentity::generate(self.server_id.as_deref());
        let seed = Utc::now().timestamp_millis().max(0) as u64;

        tracing::info!(
            client_id = %client_id,
            domain = %client_domain,
            bits = key.bits(),
            server_identity = %server_identity,
            "SSO client initialized"
        );

        Ok(SsoClient {
            client_id,
            client_domain,
            key,
            server_identity,
            sequence: AtomicU64::new(seed),
            context: self.context,
            codec: TokenCodec::new(self.compression),
            privacy_guard: RwLock::new(None),
        })
    }
}
