//! Lithium single-sign-on token issuer.
//!
//! A [`SsoClient`] is created once per deployment with the client id, cookie
//! domain and shared AES key. Each call to [`SsoClient::issue_token`] builds
//! the canonical `Li|...|iL` record from the user's identity claims,
//! deflates it, encrypts it with AES-CBC and returns a URL-safe token of the
//! form `~2<iv>~<ciphertext>`.
//!
//! ```no_run
//! use lithium_sso::{AuthTokenRequest, RequestContext, SsoClient};
//!
//! let client = SsoClient::new(
//!     "example",
//!     ".example.com",
//!     "d41d8cd98f00b204e9800998ecf8427e",
//!     None,
//!     RequestContext::new("Mozilla/5.0", "", "127.0.0.1"),
//! )?;
//!
//! let request = AuthTokenRequest::new("1000", "myscreenname", "myemail@example.com")
//!     .with_setting("roles.grant", "Moderator");
//! let token = client.issue_token(&request)?;
//! # Ok::<(), lithium_sso::Error>(())
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod identity;
pub mod key;
pub mod record;
pub mod utils;

pub use client::{SsoClient, SsoClientBuilder};
pub use codec::TokenCodec;
pub use config::SsoConfig;
pub use error::{ConfigError, Error, Field, Result, ValidationError};
pub use identity::ServerIdentity;
pub use key::SsoKey;
pub use record::{AuthTokenRequest, ProfileSettings, RequestContext, ANONYMOUS_UNIQUE_ID};
pub use utils::CompressionFormat;
