use crate::{error::Result, record::RequestContext, utils::crypto::CompressionFormat};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};

/// Deployment settings for one [`SsoClient`](crate::SsoClient).
///
/// Keys are hexadecimal strings. They are validated when the client is built,
/// not when the config is parsed.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SsoConfig {
    pub client_id: String,

    pub client_domain: String,

    pub sso_key: String,

    #[serde(default)]
    pub server_id: Option<String>,

    #[serde(default)]
    pub user_agent: String,

    #[serde(default)]
    pub referer: String,

    #[serde(default)]
    pub remote_addr: String,

    #[serde(default)]
    pub compression: CompressionFormat,

    #[serde(default)]
    pub privacy_guard_key: Option<String>,
}

impl SsoConfig {
    pub fn builder() -> SsoConfigBuilder {
        SsoConfigBuilder::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn request_context(&self) -> RequestContext {
        RequestContext::new(&self.user_agent, &self.referer, &self.remote_addr)
    }
}

impl fmt::Debug for SsoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SsoConfig")
            .field("client_id", &self.client_id)
            .field("client_domain", &self.client_domain)
            .field("sso_key", &"<redacted>")
            .field("server_id", &self.server_id)
            .field("user_agent", &self.user_agent)
            .field("referer", &self.referer)
            .field("remote_addr", &self.remote_addr)
            .field("compression", &self.compression)
            .field(
                "privacy_guard_key",
                &self.privacy_guard_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Default)]
pub struct SsoConfigBuilder {
    client_id: Option<String>,
    client_domain: Option<String>,
    sso_key: Option<String>,
    server_id: Option<String>,
    request: RequestContext,
    compression: Option<CompressionFormat>,
    privacy_guard_key: Option<String>,
}

impl SsoConfigBuilder {
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_domain(mut self, domain: impl Into<String>) -> Self {
        self.client_domain = Some(domain.into());
        self
    }

    pub fn sso_key(mut self, hex_key: impl Into<String>) -> Self {
        self.sso_key = Some(hex_key.into());
        self
    }

    pub fn server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.request.user_agent = user_agent.into();
        self
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.request.referer = referer.into();
        self
    }

    pub fn remote_addr(mut self, remote_addr: impl Into<String>) -> Self {
        self.request.remote_addr = remote_addr.into();
        self
    }

    pub fn request_context(mut self, context: RequestContext) -> Self {
        self.request = context;
        self
    }

    pub fn compression(mut self, compression: CompressionFormat) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn privacy_guard_key(mut self, hex_key: impl Into<String>) -> Self {
        self.privacy_guard_key = Some(hex_key.into());
        self
    }

    pub fn build(self) -> SsoConfig {
        SsoConfig {
            client_id: self.client_id.unwrap_or_default(),
            client_domain: self.client_domain.unwrap_or_default(),
            sso_key: self.sso_key.unwrap_or_default(),
            server_id: self.server_id,
            user_agent: self.request.user_agent,
            referer: self.request.referer,
            remote_addr: self.request.remote_addr,
            compression: self.compression.unwrap_or_default(),
            privacy_guard_key: self.privacy_guard_key,
        }
    }
}
