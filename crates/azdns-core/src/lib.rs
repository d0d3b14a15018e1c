// # azdns-core
//
// Core library for updating A/AAAA records in an Azure DNS zone.
//
// ## Architecture Overview
//
// - **DnsUpdater**: handle over a zone identity; maps one update request onto
//   one create-or-update call
// - **CredentialProvider**: injected source of bearer tokens
// - **RecordSetsClient**: injected client that performs the create-or-update
// - **RecordSet / RecordData**: the payload, tagged by record kind
//
// The HTTP implementations of both seams live in `azdns-provider-azure`.

pub mod config;
pub mod error;
pub mod record;
pub mod traits;
pub mod updater;

// Re-export core types for convenience
pub use config::{RecordConfig, UpdateMode, UpdaterConfig, ZoneIdentity};
pub use error::{ApiFailure, Error, Result};
pub use record::{RecordData, RecordSet, RecordSetKey, RecordType, UpdateRequest};
pub use traits::{AccessToken, CredentialProvider, RecordSetsClient};
pub use updater::DnsUpdater;
