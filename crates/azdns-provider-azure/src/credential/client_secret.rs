//! Service principal credentials (client secret flow)

use async_trait::async_trait;
use azdns_core::traits::{AccessToken, CredentialProvider};
use azdns_core::{Error, Result};
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;

use super::{EnvLookup, http_client, process_env, token_error};
use crate::cloud::AzureCloud;

/// Token response from the Entra ID v2.0 endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Client-credentials grant against `{authority}/{tenant}/oauth2/v2.0/token`
pub struct ClientSecretCredential {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    authority_host: String,
    client: reqwest::Client,
}

// Custom Debug implementation that hides the client secret
impl std::fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<REDACTED>")
            .field("authority_host", &self.authority_host)
            .finish()
    }
}

impl ClientSecretCredential {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        authority_host: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authority_host: authority_host.into(),
            client: http_client()?,
        })
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

#[async_trait]
impl CredentialProvider for ClientSecretCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        tracing::debug!(
            "Requesting token for client {} in tenant {}",
            self.client_id,
            self.tenant_id
        );

        let response = self
            .client
            .post(self.token_url())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", scope),
            ])
            .send()
            .await
            .map_err(|e| Error::auth(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(token_error(status, &body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::auth(format!("failed to parse token response: {}", e)))?;

        let expires_on = token.expires_in.map(|secs| Utc::now() + Duration::seconds(secs));
        Ok(AccessToken::new(token.access_token, expires_on))
    }

    fn credential_name(&self) -> &'static str {
        "client-secret"
    }
}

/// Service principal read from the environment at call time
///
/// - `AZURE_TENANT_ID`
/// - `AZURE_CLIENT_ID`
/// - `AZURE_CLIENT_SECRET`
/// - `AZURE_AUTHORITY_HOST` (optional, overrides the cloud's authority)
pub struct EnvironmentCredential {
    cloud: AzureCloud,
    lookup: EnvLookup,
}

impl EnvironmentCredential {
    /// Read from the process environment
    pub fn new(cloud: AzureCloud) -> Self {
        Self::with_lookup(cloud, Arc::new(process_env))
    }

    /// Read variables through `lookup` instead of the process environment
    pub fn with_lookup(cloud: AzureCloud, lookup: EnvLookup) -> Self {
        Self { cloud, lookup }
    }

    fn var(&self, name: &str) -> Result<String> {
        match (self.lookup)(name) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(Error::auth(format!("{} not set", name))),
        }
    }

    fn resolve(&self) -> Result<ClientSecretCredential> {
        let tenant_id = self.var("AZURE_TENANT_ID")?;
        let client_id = self.var("AZURE_CLIENT_ID")?;
        let client_secret = self.var("AZURE_CLIENT_SECRET")?;
        let authority_host = (self.lookup)("AZURE_AUTHORITY_HOST")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.cloud.authority_host().to_string());

        ClientSecretCredential::new(tenant_id, client_id, client_secret, authority_host)
    }
}

impl std::fmt::Debug for EnvironmentCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentCredential")
            .field("cloud", &self.cloud)
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for EnvironmentCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        self.resolve()?.get_token(scope).await
    }

    fn credential_name(&self) -> &'static str {
        "environment"
    }
}
