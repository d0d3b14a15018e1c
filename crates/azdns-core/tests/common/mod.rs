//! Test doubles shared by the contract tests
//!
//! Both doubles count their calls so tests can assert that a path did or did
//! not reach the credential provider or the network.

#![allow(dead_code)]

use azdns_core::error::{ApiFailure, Error, Result};
use azdns_core::record::{RecordSet, RecordSetKey};
use azdns_core::traits::{AccessToken, CredentialProvider, RecordSetsClient};
use azdns_core::{DnsUpdater, ZoneIdentity};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What the credential stub answers
#[derive(Clone)]
pub enum CredentialBehavior {
    Token(String),
    AuthFailure(String),
    /// A non-authentication error, to check the updater folds it
    ConfigFailure(String),
}

/// A credential provider that counts calls
pub struct StubCredential {
    behavior: CredentialBehavior,
    call_count: Arc<AtomicUsize>,
    scopes: Arc<Mutex<Vec<String>>>,
}

impl StubCredential {
    pub fn new(behavior: CredentialBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            scopes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn token(secret: &str) -> Self {
        Self::new(CredentialBehavior::Token(secret.to_string()))
    }

    pub fn failing(msg: &str) -> Self {
        Self::new(CredentialBehavior::AuthFailure(msg.to_string()))
    }

    /// Get the number of times get_token() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Scopes requested so far
    pub fn scopes(&self) -> Vec<String> {
        self.scopes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CredentialProvider for StubCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.scopes.lock().unwrap().push(scope.to_string());

        match &self.behavior {
            CredentialBehavior::Token(secret) => Ok(AccessToken::new(secret.clone(), None)),
            CredentialBehavior::AuthFailure(msg) => Err(Error::auth(msg.clone())),
            CredentialBehavior::ConfigFailure(msg) => Err(Error::config(msg.clone())),
        }
    }

    fn credential_name(&self) -> &'static str {
        "stub"
    }
}

/// One create-or-update call as seen by the stub
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub token: String,
    pub key: RecordSetKey,
    pub record_set: RecordSet,
}

/// A record-sets client that records every call
pub struct RecordingClient {
    failure: Option<ApiFailure>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self {
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A client whose every call fails with `failure`
    pub fn failing(failure: ApiFailure) -> Self {
        Self {
            failure: Some(failure),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of times create_or_update() was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RecordSetsClient for RecordingClient {
    async fn create_or_update(
        &self,
        token: &AccessToken,
        key: &RecordSetKey,
        record_set: &RecordSet,
    ) -> std::result::Result<(), ApiFailure> {
        self.calls.lock().unwrap().push(RecordedCall {
            token: token.secret().to_string(),
            key: key.clone(),
            record_set: record_set.clone(),
        });

        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }

    fn client_name(&self) -> &'static str {
        "recording"
    }
}

/// The zone used throughout the contract tests
pub fn test_zone() -> ZoneIdentity {
    ZoneIdentity::new("sub1", "rg1", "example.com.")
}

/// Build an updater over shared stubs, returning the stubs for inspection
pub fn updater_with(
    credential: StubCredential,
    client: RecordingClient,
) -> (DnsUpdater, Arc<StubCredential>, Arc<RecordingClient>) {
    let credential = Arc::new(credential);
    let client = Arc::new(client);
    let updater = DnsUpdater::new(test_zone(), credential.clone(), client.clone());
    (updater, credential, client)
}
