// # Credential Provider Trait
//
// Supplies bearer tokens for the DNS management API.
//
// Credentials are injected into `DnsUpdater` at construction and resolved
// lazily, once per update. Nothing here reads process state on its own; an
// implementation that consults the environment (see `azdns-provider-azure`)
// is just one provider among others.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

/// OAuth scope of the Azure Resource Manager API
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// A bearer token
///
/// The Debug implementation never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
    expires_on: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, expires_on: Option<DateTime<Utc>>) -> Self {
        Self {
            secret: secret.into(),
            expires_on,
        }
    }

    /// The raw bearer value
    ///
    /// ⚠️ NEVER log this value
    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_on(&self) -> Option<DateTime<Utc>> {
        self.expires_on
    }

    /// True once the expiry has passed. Tokens without expiry never expire.
    pub fn is_expired(&self) -> bool {
        self.expires_on.is_some_and(|at| at <= Utc::now())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<REDACTED>")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// Source of bearer tokens
///
/// # Errors
///
/// Implementations report failures as
/// [`Error::Authentication`](crate::Error::Authentication). The updater
/// folds any other variant into `Authentication` as well.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Acquire a token for `scope`
    async fn get_token(&self, scope: &str) -> Result<AccessToken, crate::Error>;

    /// Credential name (for logging and aggregated errors)
    fn credential_name(&self) -> &'static str;
}
