//! Managed identity credentials via the instance metadata service (IMDS)

use async_trait::async_trait;
use azdns_core::traits::{AccessToken, CredentialProvider};
use azdns_core::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

use super::{TOKEN_HTTP_TIMEOUT, build_http_client, token_error};

/// IMDS token endpoint
pub const IMDS_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

const IMDS_API_VERSION: &str = "2018-02-01";

/// Off Azure nothing answers on the IMDS address; fail fast
pub const IMDS_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// IMDS token response; numeric fields arrive as strings
#[derive(Debug, Deserialize)]
struct ImdsTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_on: Option<String>,
}

/// Token from the managed identity assigned to the host
///
/// `client_id` selects a user-assigned identity; `None` uses the
/// system-assigned one.
#[derive(Debug)]
pub struct ManagedIdentityCredential {
    endpoint: String,
    client_id: Option<String>,
    client: reqwest::Client,
}

impl ManagedIdentityCredential {
    pub fn new(client_id: Option<String>) -> Result<Self> {
        Self::with_endpoint(IMDS_ENDPOINT, client_id)
    }

    /// Use a different token endpoint
    pub fn with_endpoint(endpoint: impl Into<String>, client_id: Option<String>) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            client_id,
            client: build_http_client(
                reqwest::Client::builder()
                    .timeout(TOKEN_HTTP_TIMEOUT)
                    .connect_timeout(IMDS_CONNECT_TIMEOUT),
            )?,
        })
    }
}

/// IMDS takes a resource, not a scope
fn scope_to_resource(scope: &str) -> &str {
    scope.strip_suffix("/.default").unwrap_or(scope)
}

fn parse_expires_on(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
}

#[async_trait]
impl CredentialProvider for ManagedIdentityCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        let resource = scope_to_resource(scope);
        let mut query = vec![("api-version", IMDS_API_VERSION), ("resource", resource)];
        if let Some(client_id) = &self.client_id {
            query.push(("client_id", client_id.as_str()));
        }

        tracing::debug!("Requesting managed identity token for {}", resource);

        let response = self
            .client
            .get(&self.endpoint)
            .header("Metadata", "true")
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::auth(format!("managed identity endpoint unavailable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(token_error(status, &body));
        }

        let token: ImdsTokenResponse = response
            .json()
            .await
            .map_err(|e| Error::auth(format!("failed to parse managed identity token: {}", e)))?;

        Ok(AccessToken::new(
            token.access_token,
            parse_expires_on(token.expires_on.as_deref()),
        ))
    }

    fn credential_name(&self) -> &'static str {
        "managed-identity"
    }
}
