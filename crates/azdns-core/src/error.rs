//! Error types for Azure DNS record updates
//!
//! Every failure of [`DnsUpdater::update_record`](crate::DnsUpdater::update_record)
//! lands in exactly one of three buckets:
//!
//! - input errors ([`Error::UnsupportedRecordType`], [`Error::InvalidRecordValue`]),
//!   detected locally before any I/O
//! - [`Error::Authentication`], raised while resolving a credential
//! - [`Error::ProviderApi`], raised by the create-or-update call itself
//!
//! The remaining variants only come out of configuration loading.

use thiserror::Error;

/// Result type alias for azdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a [`RecordSetsClient`](crate::traits::RecordSetsClient)
///
/// Transient and permanent failures are not told apart. The updater hands
/// this value back to the caller unchanged inside [`Error::ProviderApi`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// The request never produced an HTTP response (connect, TLS, timeout, body read)
    #[error("transport error: {0}")]
    Transport(String),

    /// The management API answered with a non-success status
    #[error("service returned {status} ({code}): {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Service error code, e.g. `AuthorizationFailed`
        code: String,
        /// Human readable message from the service
        message: String,
    },
}

impl ApiFailure {
    /// Create a transport failure
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a service failure
    pub fn service(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Record type outside {A, AAAA}
    #[error("unsupported record type '{0}'")]
    UnsupportedRecordType(String),

    /// Record value is not an address literal of the requested family
    #[error("invalid {record_type} record value '{value}': {reason}")]
    InvalidRecordValue {
        /// Record type the value was parsed for
        record_type: String,
        /// The rejected value
        value: String,
        /// Parser message
        reason: String,
    },

    /// No usable credential could be resolved
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The create-or-update call failed
    #[error("provider API error: {0}")]
    ProviderApi(#[from] ApiFailure),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Config file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an unsupported record type error
    pub fn unsupported_record_type(record_type: impl Into<String>) -> Self {
        Self::UnsupportedRecordType(record_type.into())
    }

    /// Create an invalid record value error
    pub fn invalid_record_value(
        record_type: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRecordValue {
            record_type: record_type.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for failures the caller fixes by changing the request
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedRecordType(_) | Self::InvalidRecordValue { .. }
        )
    }
}
