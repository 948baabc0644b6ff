//! HTTP client for the admin console backend.
//!
//! [`AdminClient`] wires a reqwest transport and a cookie-style
//! [`TokenStore`] into an [`ApiContext`], and hands out the auth and resource
//! clients built on it.

pub mod auth;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod resources;
pub mod token_store;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

use std::sync::Arc;

use anyhow::Context as _;
use tracing::debug;

pub use auth::AuthClient;
pub use config::ClientConfig;
pub use context::ApiContext;
pub use envelope::{decode_checked, unwrap_result, ApiResponse, Envelope};
pub use error::{ApiError, AuthError, ConfigError, StoreError, GENERIC_FAILURE};
pub use resources::{ArticlesClient, BoardClient, PublicMembersClient, VideoClient};
pub use token_store::{CookieAttributes, TokenStore};
pub use transport::{ApiRequest, Credential, HttpTransport, Transport};

pub struct AdminClient {
    ctx: ApiContext,
}

impl AdminClient {
    /// Builds the HTTP transport and opens the session jar named by `config`.
    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(config.base_url.clone(), config.timeout)
            .context("building HTTP client")?;
        let attributes = CookieAttributes::for_environment(config.production);
        let tokens = match &config.session_file {
            Some(path) => TokenStore::persistent(path, attributes)
                .with_context(|| format!("opening session file {}", path.display()))?,
            None => TokenStore::in_memory(attributes),
        };
        debug!(base = %config.base_url, production = config.production, "admin client ready");
        Ok(Self::with_context(ApiContext::new(
            Arc::new(transport),
            Arc::new(tokens),
        )))
    }

    pub fn with_context(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ApiContext {
        &self.ctx
    }

    pub fn tokens(&self) -> &TokenStore {
        self.ctx.tokens()
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.ctx.clone())
    }

    pub fn board(&self) -> BoardClient {
        BoardClient::new(self.ctx.clone())
    }

    pub fn members(&self) -> PublicMembersClient {
        PublicMembersClient::new(self.ctx.clone())
    }

    pub fn articles(&self) -> ArticlesClient {
        ArticlesClient::new(self.ctx.clone())
    }

    pub fn videos(&self) -> VideoClient {
        VideoClient::new(self.ctx.clone())
    }
}
