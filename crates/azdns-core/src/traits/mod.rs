//! Injection seams of the updater
//!
//! - [`CredentialProvider`]: resolve a bearer token for the management API
//! - [`RecordSetsClient`]: submit a create-or-update for one record set

pub mod credential;
pub mod record_sets;

pub use credential::{AccessToken, CredentialProvider, MANAGEMENT_SCOPE};
pub use record_sets::RecordSetsClient;
