//! DNS update adapter
//!
//! [`DnsUpdater`] turns one `(domain, type, name, value, ttl)` request into
//! one create-or-update call:
//!
//! ```text
//!  update_record(..)
//!        │
//!        ├─ parse type / value ───────── UnsupportedRecordType | InvalidRecordValue
//!        │
//!        ├─ CredentialProvider::get_token ── Authentication
//!        │
//!        └─ RecordSetsClient::create_or_update ── ProviderApi
//! ```
//!
//! Input validation happens before any I/O, so a bad request never reaches
//! the credential provider or the network.

use crate::config::ZoneIdentity;
use crate::error::{Error, Result};
use crate::record::{RecordData, RecordSet, RecordSetKey, RecordType, UpdateRequest};
use crate::traits::{CredentialProvider, MANAGEMENT_SCOPE, RecordSetsClient};
use std::sync::Arc;
use tracing::{debug, info};

/// Handle for updating records in one zone
///
/// Holds immutable data only. Concurrent calls on the same handle are
/// independent of each other.
#[derive(Clone)]
pub struct DnsUpdater {
    identity: ZoneIdentity,
    scope: String,
    credential: Arc<dyn CredentialProvider>,
    client: Arc<dyn RecordSetsClient>,
}

impl std::fmt::Debug for DnsUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsUpdater")
            .field("identity", &self.identity)
            .field("scope", &self.scope)
            .field("credential", &self.credential.credential_name())
            .field("client", &self.client.client_name())
            .finish()
    }
}

impl DnsUpdater {
    /// Create an updater for `identity`
    ///
    /// Performs no I/O. Credentials are resolved on each update.
    pub fn new(
        identity: ZoneIdentity,
        credential: Arc<dyn CredentialProvider>,
        client: Arc<dyn RecordSetsClient>,
    ) -> Self {
        Self {
            identity,
            scope: MANAGEMENT_SCOPE.to_string(),
            credential,
            client,
        }
    }

    /// Request tokens for `scope` instead of the public-cloud management scope
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn identity(&self) -> &ZoneIdentity {
        &self.identity
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Create or replace the record set `domain` with a single record
    ///
    /// # Parameters
    ///
    /// - `domain`: record-set name relative to the zone (addresses the set)
    /// - `record_type`: "A" or "AAAA"
    /// - `record_name`: name carried in the payload
    /// - `record_value`: IPv4 literal for A, IPv6 literal for AAAA
    /// - `ttl`: seconds
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedRecordType`] / [`Error::InvalidRecordValue`]:
    ///   returned before any credential lookup or network call
    /// - [`Error::Authentication`]: no token; the zone is not contacted
    /// - [`Error::ProviderApi`]: the create-or-update call failed (not retried)
    pub async fn update_record(
        &self,
        domain: &str,
        record_type: &str,
        record_name: &str,
        record_value: &str,
        ttl: i64,
    ) -> Result<()> {
        let record_type: RecordType = record_type.parse()?;
        let data = RecordData::parse(record_type, record_value)?;
        let record_set = RecordSet::new(record_name, ttl, data);
        let key = RecordSetKey {
            subscription_id: self.identity.subscription_id.clone(),
            resource_group: self.identity.resource_group.clone(),
            zone_name: self.identity.zone_name.clone(),
            relative_name: domain.to_string(),
            record_type,
        };

        debug!(
            "Resolving credential '{}' for {}",
            self.credential.credential_name(),
            self.scope
        );
        let token = self
            .credential
            .get_token(&self.scope)
            .await
            .map_err(|e| match e {
                Error::Authentication(_) => e,
                other => Error::auth(other.to_string()),
            })?;

        info!(
            "Submitting {} record set {} in zone {} -> {} (ttl {})",
            record_type,
            domain,
            self.identity.zone_name,
            record_set.data.literal(),
            ttl
        );

        self.client
            .create_or_update(&token, &key, &record_set)
            .await?;

        info!("Record set {} ({}) updated", domain, record_type);
        Ok(())
    }

    /// [`update_record`](Self::update_record) taking a bundled request
    pub async fn update(&self, request: &UpdateRequest) -> Result<()> {
        self.update_record(
            &request.domain,
            &request.record_type,
            &request.record_name,
            &request.record_value,
            request.ttl,
        )
        .await
    }
}
