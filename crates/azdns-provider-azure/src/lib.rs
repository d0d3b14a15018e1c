// # Azure DNS Provider
//
// HTTP implementations of the two seams `azdns-core` injects into
// `DnsUpdater`:
//
// - `AzureRecordSetsClient`: one PUT per update against Azure Resource
//   Manager (api-version 2018-05-01)
// - credential providers: environment service principal, managed identity,
//   static token, and the ordered `DefaultAzureCredential` chain
//
// ## Behavior
//
// - One HTTP request per update (plus token requests). No retry, no
//   backoff, no caching.
// - HTTP timeout configured (30 seconds)
// - Dry-run mode logs the intended PUT instead of sending it
//
// ## Security Requirements
//
// - Tokens and client secrets NEVER appear in logs or Debug output
// - Service principal secrets are read from the environment only
//
// ## API Reference
//
// - Record Sets: https://learn.microsoft.com/rest/api/dns/record-sets/create-or-update
// - Client credentials: https://learn.microsoft.com/entra/identity-platform/v2-oauth2-client-creds-grant-flow

pub mod client;
pub mod cloud;
pub mod credential;

pub use client::{API_VERSION, AzureRecordSetsClient};
pub use cloud::AzureCloud;
pub use credential::{
    ChainedCredential, ClientSecretCredential, DefaultAzureCredential, EnvironmentCredential,
    ManagedIdentityCredential, StaticTokenCredential,
};

use azdns_core::{DnsUpdater, Result, UpdateMode, UpdaterConfig};
use std::sync::Arc;

/// Placeholder bearer used in dry-run mode, where nothing is sent
const DRY_RUN_TOKEN: &str = "dry-run";

/// Build an updater for `config` backed by the ambient credential chain
///
/// Validates the configuration and resolves the cloud name. No network
/// traffic happens until the first update. In dry-run mode no credential is
/// resolved at all, so a dry run works on a host without Azure identity.
pub fn build_updater(config: &UpdaterConfig) -> Result<DnsUpdater> {
    config.validate()?;
    let cloud = AzureCloud::resolve(config.cloud.as_deref())?;
    let credential: Arc<dyn azdns_core::CredentialProvider> = match config.mode {
        UpdateMode::DryRun => Arc::new(StaticTokenCredential::from_secret(DRY_RUN_TOKEN)),
        UpdateMode::Live => Arc::new(DefaultAzureCredential::chain(cloud)?),
    };
    build_updater_with(config, cloud, credential)
}

/// Build an updater for `config` with an explicit credential provider
pub fn build_updater_with(
    config: &UpdaterConfig,
    cloud: AzureCloud,
    credential: Arc<dyn azdns_core::CredentialProvider>,
) -> Result<DnsUpdater> {
    let dry_run = config.mode == UpdateMode::DryRun;
    if dry_run {
        tracing::warn!("Azure DNS client running in DRY-RUN mode - no changes will be made");
    }

    let client = AzureRecordSetsClient::new(cloud, dry_run)?;

    tracing::debug!(
        "Azure DNS updater for zone {} in {} ({})",
        config.zone.zone_name,
        config.zone.resource_group,
        cloud
    );

    Ok(
        DnsUpdater::new(config.zone.clone(), credential, Arc::new(client))
            .with_scope(cloud.management_scope()),
    )
}
