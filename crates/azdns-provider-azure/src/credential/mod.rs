//! Credential providers for the Azure management API
//!
//! [`DefaultAzureCredential`] is the ambient chain: a pre-acquired
//! `AZURE_ACCESS_TOKEN` if present, then a service principal from the
//! environment, then the host's managed identity. Every provider is
//! resolved lazily on each `get_token` call; nothing is cached.

mod client_secret;
mod managed_identity;

pub use client_secret::{ClientSecretCredential, EnvironmentCredential};
pub use managed_identity::{IMDS_CONNECT_TIMEOUT, IMDS_ENDPOINT, ManagedIdentityCredential};

use async_trait::async_trait;
use azdns_core::traits::{AccessToken, CredentialProvider};
use azdns_core::{Error, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::cloud::AzureCloud;

/// Environment variable lookup, injectable for tests
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Timeout for token requests
pub(crate) const TOKEN_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

pub(crate) fn http_client() -> Result<reqwest::Client> {
    build_http_client(reqwest::Client::builder().timeout(TOKEN_HTTP_TIMEOUT))
}

pub(crate) fn build_http_client(builder: reqwest::ClientBuilder) -> Result<reqwest::Client> {
    builder
        .build()
        .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))
}

/// OAuth error body (`error`, `error_description`)
#[derive(Debug, Deserialize)]
struct OAuthError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Turn a failed token response into an authentication error
pub(crate) fn token_error(status: StatusCode, body: &str) -> Error {
    match serde_json::from_str::<OAuthError>(body) {
        Ok(err) => Error::auth(format!(
            "token endpoint returned {}: {}{}",
            status,
            err.error,
            err.error_description
                .map(|d| format!(" ({})", d))
                .unwrap_or_default()
        )),
        Err(_) => Error::auth(format!("token endpoint returned {}: {}", status, body.trim())),
    }
}

/// A token acquired elsewhere
pub struct StaticTokenCredential {
    token: AccessToken,
}

impl StaticTokenCredential {
    pub fn new(token: AccessToken) -> Self {
        Self { token }
    }

    pub fn from_secret(secret: impl Into<String>) -> Self {
        Self::new(AccessToken::new(secret, None))
    }
}

impl std::fmt::Debug for StaticTokenCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenCredential")
            .field("token", &self.token)
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenCredential {
    async fn get_token(&self, _scope: &str) -> Result<AccessToken> {
        if self.token.is_expired() {
            return Err(Error::auth("static access token has expired"));
        }
        Ok(self.token.clone())
    }

    fn credential_name(&self) -> &'static str {
        "static-token"
    }
}

/// Tries providers in order and returns the first token
pub struct ChainedCredential {
    sources: Vec<Arc<dyn CredentialProvider>>,
}

impl ChainedCredential {
    pub fn new(sources: Vec<Arc<dyn CredentialProvider>>) -> Self {
        Self { sources }
    }

    /// Names of the providers, in order
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.credential_name()).collect()
    }
}

#[async_trait]
impl CredentialProvider for ChainedCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        if self.sources.is_empty() {
            return Err(Error::auth("no credential providers configured"));
        }

        let mut failures = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match source.get_token(scope).await {
                Ok(token) => {
                    tracing::debug!("Credential '{}' supplied a token", source.credential_name());
                    return Ok(token);
                }
                Err(e) => {
                    tracing::debug!("Credential '{}' unavailable: {}", source.credential_name(), e);
                    failures.push(format!("{}: {}", source.credential_name(), e));
                }
            }
        }

        Err(Error::auth(format!(
            "no credential in the chain produced a token [{}]",
            failures.join("; ")
        )))
    }

    fn credential_name(&self) -> &'static str {
        "chained"
    }
}

/// The ambient credential chain
pub struct DefaultAzureCredential;

impl DefaultAzureCredential {
    /// Build the chain for `cloud` from the process environment
    pub fn chain(cloud: AzureCloud) -> Result<ChainedCredential> {
        Self::chain_with_lookup(cloud, Arc::new(process_env))
    }

    /// Build the chain reading variables through `lookup`
    ///
    /// `AZURE_ACCESS_TOKEN` is read once here; the service principal
    /// variables are read on every token request.
    pub fn chain_with_lookup(cloud: AzureCloud, lookup: EnvLookup) -> Result<ChainedCredential> {
        let mut sources: Vec<Arc<dyn CredentialProvider>> = Vec::new();

        if let Some(token) = lookup("AZURE_ACCESS_TOKEN").filter(|t| !t.trim().is_empty()) {
            sources.push(Arc::new(StaticTokenCredential::from_secret(token)));
        }

        let managed_identity_client_id = lookup("AZURE_CLIENT_ID").filter(|v| !v.trim().is_empty());
        sources.push(Arc::new(EnvironmentCredential::with_lookup(cloud, lookup)));
        sources.push(Arc::new(ManagedIdentityCredential::new(
            managed_identity_client_id,
        )?));

        Ok(ChainedCredential::new(sources))
    }
}
