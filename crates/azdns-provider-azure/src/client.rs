//! Azure Resource Manager record-sets client
//!
//! ## API Reference
//!
//! - Record Sets - Create Or Update (api-version 2018-05-01):
//!   PUT `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/dnsZones/{zone}/{type}/{name}`
//!
//! The request carries no `If-Match` / `If-None-Match` header, so it
//! creates the set or overwrites it unconditionally.

use async_trait::async_trait;
use azdns_core::record::{RecordData, RecordSet, RecordSetKey};
use azdns_core::traits::{AccessToken, RecordSetsClient};
use azdns_core::{ApiFailure, Error, Result};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cloud::AzureCloud;

/// DNS management API version
pub const API_VERSION: &str = "2018-05-01";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Record-set body as accepted by the management API
#[derive(Debug, Clone, PartialEq, Serialize)]
struct AzureRecordSet {
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    properties: RecordSetProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct RecordSetProperties {
    #[serde(rename = "TTL")]
    ttl: i64,
    #[serde(rename = "ARecords")]
    #[serde(skip_serializing_if = "Option::is_none")]
    a_records: Option<Vec<ARecord>>,
    #[serde(rename = "AAAARecords")]
    #[serde(skip_serializing_if = "Option::is_none")]
    aaaa_records: Option<Vec<AaaaRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ARecord {
    #[serde(rename = "ipv4Address")]
    ipv4_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct AaaaRecord {
    #[serde(rename = "ipv6Address")]
    ipv6_address: String,
}

impl From<&RecordSet> for AzureRecordSet {
    fn from(record_set: &RecordSet) -> Self {
        // The supplied literal is sent as written, not re-rendered
        let (a_records, aaaa_records) = match &record_set.data {
            RecordData::A { literal, .. } => (
                Some(vec![ARecord {
                    ipv4_address: literal.clone(),
                }]),
                None,
            ),
            RecordData::Aaaa { literal, .. } => (
                None,
                Some(vec![AaaaRecord {
                    ipv6_address: literal.clone(),
                }]),
            ),
        };

        Self {
            name: record_set.name.clone(),
            record_type: record_set.record_type().as_str().to_string(),
            properties: RecordSetProperties {
                ttl: record_set.ttl,
                a_records,
                aaaa_records,
            },
        }
    }
}

/// ARM error envelope
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Record-sets client for the Azure Resource Manager REST API
///
/// # Dry-Run Mode
///
/// When `dry_run` is true the client logs the intended PUT and payload and
/// reports success without sending anything.
#[derive(Debug, Clone)]
pub struct AzureRecordSetsClient {
    client: reqwest::Client,
    management_endpoint: String,
    dry_run: bool,
}

impl AzureRecordSetsClient {
    /// Create a client for `cloud`
    pub fn new(cloud: AzureCloud, dry_run: bool) -> Result<Self> {
        Self::with_endpoint(cloud.management_endpoint(), dry_run)
    }

    /// Create a client against an explicit management endpoint
    pub fn with_endpoint(management_endpoint: impl Into<String>, dry_run: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            management_endpoint: management_endpoint.into(),
            dry_run,
        })
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Full URL of the record set at `key`
    pub fn record_set_url(&self, key: &RecordSetKey) -> std::result::Result<Url, ApiFailure> {
        let mut url = Url::parse(&self.management_endpoint).map_err(|e| {
            ApiFailure::transport(format!(
                "invalid management endpoint '{}': {}",
                self.management_endpoint, e
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ApiFailure::transport(format!(
                    "management endpoint '{}' cannot carry a path",
                    self.management_endpoint
                ))
            })?
            .pop_if_empty()
            .extend([
                "subscriptions",
                key.subscription_id.as_str(),
                "resourceGroups",
                key.resource_group.as_str(),
                "providers",
                "Microsoft.Network",
                "dnsZones",
                key.zone_name.as_str(),
                key.record_type.as_str(),
                key.relative_name.as_str(),
            ]);

        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        Ok(url)
    }
}

/// Turn a non-success response into an [`ApiFailure::Service`]
fn service_failure(status: StatusCode, body: &str) -> ApiFailure {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ApiFailure::service(
            status.as_u16(),
            envelope.error.code,
            envelope.error.message,
        ),
        Err(_) => ApiFailure::service(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            body.trim(),
        ),
    }
}

#[async_trait]
impl RecordSetsClient for AzureRecordSetsClient {
    async fn create_or_update(
        &self,
        token: &AccessToken,
        key: &RecordSetKey,
        record_set: &RecordSet,
    ) -> std::result::Result<(), ApiFailure> {
        let url = self.record_set_url(key)?;
        let payload = AzureRecordSet::from(record_set);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(&payload).unwrap_or_default()
            );
            return Ok(());
        }

        tracing::debug!("Azure DNS API request: PUT {}", url.path());

        let response = self
            .client
            .put(url)
            .bearer_auth(token.secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| ApiFailure::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("Azure DNS API responded {}", status);
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        let failure = service_failure(status, &body);

        match status.as_u16() {
            401 | 403 => tracing::warn!(
                "Azure DNS rejected credentials or role assignment: {}",
                failure
            ),
            404 => tracing::warn!("Zone or resource group not found: {}", failure),
            429 => tracing::warn!("Azure DNS throttled the request: {}", failure),
            500..=599 => tracing::warn!("Azure DNS server error (transient): {}", failure),
            _ => tracing::warn!("Azure DNS update failed: {}", failure),
        }

        Err(failure)
    }

    fn client_name(&self) -> &'static str {
        "azure-arm"
    }
}
