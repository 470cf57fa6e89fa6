//! Canonical plaintext record carried inside every token.
//!
//! ```text
//! Li|<version>|<server_identity>|<sequence>|<timestamp_ms>|<user_agent>|<referer>|
//! <remote_addr>|<domain>|<client_id>|<unique_id>|<login>|<email>|<settings>iL
//! ```

use crate::error::{Field, ValidationError};
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

pub const SEPARATOR: char = '|';
pub const SEPARATOR_SUBSTITUTE: char = '-';
pub const RECORD_OPEN: &str = "Li";
pub const RECORD_CLOSE: &str = "iL";
pub const PROTOCOL_VERSION: &str = "LiSSOv1.5";

/// Unique id understood by the remote service as "anonymous visitor".
pub const ANONYMOUS_UNIQUE_ID: &str = "$LiAnonPlz$";

/// Replaces every separator in `value` so it cannot split the record.
pub fn token_safe(value: &str) -> String {
    escaped_chars(value).collect()
}

fn escaped_chars(value: &str) -> impl Iterator<Item = char> + '_ {
    value.chars().map(|c| {
        if c == SEPARATOR {
            SEPARATOR_SUBSTITUTE
        } else {
            c
        }
    })
}

/// Profile settings passed through to the remote service, in insertion order.
///
/// Keys and values are written verbatim; neither `|` nor `=` is escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSettings {
    entries: Vec<(String, String)>,
}

impl ProfileSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a setting. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `key=value|key=value...`, empty when there are no settings.
    pub fn serialize_segment(&self) -> String {
        let mut out = String::new();
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(SEPARATOR);
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProfileSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut settings = Self::new();
        for (k, v) in iter {
            settings.insert(k, v);
        }
        settings
    }
}

impl Serialize for ProfileSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// Deserializes from a map, keeping document order.
impl<'de> Deserialize<'de> for ProfileSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SettingsVisitor;

        impl<'de> Visitor<'de> for SettingsVisitor {
            type Value = ProfileSettings;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of setting names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut settings = ProfileSettings::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    settings.insert(key, value);
                }
                Ok(settings)
            }
        }

        deserializer.deserialize_map(SettingsVisitor)
    }
}

/// Identity claims for one token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokenRequest {
    pub unique_id: String,
    pub login: String,
    pub email: String,
    #[serde(default)]
    pub settings: ProfileSettings,
}

impl AuthTokenRequest {
    pub fn new(
        unique_id: impl Into<String>,
        login: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            unique_id: unique_id.into(),
            login: login.into(),
            email: email.into(),
            settings: ProfileSettings::new(),
        }
    }

    pub fn anonymous(login: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(ANONYMOUS_UNIQUE_ID, login, email)
    }

    pub fn with_settings(mut self, settings: ProfileSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key, value);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let claims = [
            (Field::UniqueId, &self.unique_id),
            (Field::Login, &self.login),
            (Field::Email, &self.email),
        ];
        match claims.iter().find(|(_, value)| value.is_empty()) {
            Some((field, _)) => Err(ValidationError::MissingField(*field)),
            None => Ok(()),
        }
    }
}

/// HTTP request details of the end user, embedded for the remote service's
/// security checks. Any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub referer: String,
    #[serde(default)]
    pub remote_addr: String,
}

impl RequestContext {
    pub fn new(
        user_agent: impl Into<String>,
        referer: impl Into<String>,
        remote_addr: impl Into<String>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            referer: referer.into(),
            remote_addr: remote_addr.into(),
        }
    }
}

/// Appends separator-delimited fields between the `Li` and `iL` markers.
#[derive(Debug)]
pub struct RecordWriter {
    buf: String,
}

impl RecordWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = String::with_capacity(capacity);
        buf.push_str(RECORD_OPEN);
        Self { buf }
    }

    /// Writes an operator-controlled value without escaping.
    pub fn write_raw(&mut self, value: &str) -> &mut Self {
        self.buf.push(SEPARATOR);
        self.buf.push_str(value);
        self
    }

    /// Writes a caller-supplied value with separators replaced.
    pub fn write_escaped(&mut self, value: &str) -> &mut Self {
        self.buf.push(SEPARATOR);
        self.buf.extend(escaped_chars(value));
        self
    }

    pub fn write_display(&mut self, value: impl fmt::Display) -> &mut Self {
        use fmt::Write;
        self.buf.push(SEPARATOR);
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{}", value);
        self
    }

    pub fn finish(mut self) -> String {
        self.buf.push_str(RECORD_CLOSE);
        self.buf
    }
}

/// Everything that goes into one record besides the request itself.
#[derive(Debug, Clone, Copy)]
pub struct RecordHeader<'a> {
    pub server_identity: &'a str,
    pub sequence: u64,
    pub timestamp_ms: i64,
    pub client_domain: &'a str,
    pub client_id: &'a str,
}

/// Assembles the canonical record. The request must already be validated.
pub fn build_record(
    header: &RecordHeader<'_>,
    context: &RequestContext,
    request: &AuthTokenRequest,
) -> String {
    let settings = request.settings.serialize_segment();
    let mut record = RecordWriter::with_capacity(
        256 + context.user_agent.len() + context.referer.len() + settings.len(),
    );

    record
        .write_raw(PROTOCOL_VERSION)
        .write_raw(header.server_identity)
        .write_display(header.sequence)
        .write_display(header.timestamp_ms)
        .write_escaped(&context.user_agent)
        .write_escaped(&context.referer)
        .write_escaped(&context.remote_addr)
        .write_raw(header.client_domain)
        .write_raw(header.client_id)
        .write_escaped(&request.unique_id)
        .write_escaped(&request.login)
        .write_escaped(&request.email)
        .write_raw(&settings);

    record.finish()
}
