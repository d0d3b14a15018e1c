// # Record Sets Client Trait
//
// Defines the create-or-update call against a DNS zone's record sets.
//
// ## Implementations
//
// - Azure Resource Manager REST API: `azdns-provider-azure` crate
// - Call-counting stubs: `tests/common` in this crate
//
// ## Usage
//
// ```rust,ignore
// use azdns_core::traits::RecordSetsClient;
//
// let client = /* RecordSetsClient implementation */;
// client.create_or_update(&token, &key, &record_set).await?;
// ```

use async_trait::async_trait;

use crate::error::ApiFailure;
use crate::record::{RecordSet, RecordSetKey};
use crate::traits::AccessToken;

/// Client for a zone's record sets
///
/// # Contract
///
/// - Exactly one request per call. No retry, no backoff, no caching.
/// - The stored record set for `key` is fully replaced by `record_set`.
///   Records held before the call are not merged in.
/// - Unconditional: no etag or existence precondition is sent.
/// - Every failure is reported as an [`ApiFailure`]; the updater wraps it
///   into [`Error::ProviderApi`](crate::Error::ProviderApi) without
///   inspecting it.
///
/// # Thread Safety
///
/// Implementations must be usable across async tasks.
#[async_trait]
pub trait RecordSetsClient: Send + Sync {
    /// Create the record set at `key`, or replace it if it exists
    ///
    /// # Parameters
    ///
    /// - `token`: bearer token for the management API
    /// - `key`: subscription, resource group, zone, relative name and type
    /// - `record_set`: the payload; its type always equals `key.record_type`
    async fn create_or_update(
        &self,
        token: &AccessToken,
        key: &RecordSetKey,
        record_set: &RecordSet,
    ) -> Result<(), ApiFailure>;

    /// Client name (for logging)
    fn client_name(&self) -> &'static str;
}
