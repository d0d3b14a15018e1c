//! Configuration types
//!
//! The zone identity is the only state an updater holds. The record section
//! describes the one update a one-shot run performs.

use crate::error::{Error, Result};
use crate::record::UpdateRequest;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identity of the DNS zone an updater writes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneIdentity {
    /// Azure subscription ID
    pub subscription_id: String,
    /// Resource group holding the zone
    pub resource_group: String,
    /// Zone name, e.g. "example.com."
    pub zone_name: String,
}

impl ZoneIdentity {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        zone_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            zone_name: zone_name.into(),
        }
    }

    /// Validate the identity
    pub fn validate(&self) -> Result<()> {
        if self.subscription_id.trim().is_empty() {
            return Err(Error::config("subscription_id cannot be empty"));
        }
        if self.resource_group.trim().is_empty() {
            return Err(Error::config("resource_group cannot be empty"));
        }
        if self.zone_name.trim().is_empty() {
            return Err(Error::config("zone_name cannot be empty"));
        }
        Ok(())
    }
}

/// The record a one-shot run writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Record-set name relative to the zone
    pub domain: String,

    /// "A" or "AAAA"
    #[serde(default = "default_record_type")]
    pub record_type: String,

    /// Name carried in the payload (defaults to `domain`)
    #[serde(default)]
    pub name: Option<String>,

    /// IPv4 or IPv6 literal
    pub value: String,

    /// TTL in seconds
    #[serde(default = "default_ttl")]
    pub ttl: i64,
}

impl RecordConfig {
    pub fn new(domain: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            record_type: default_record_type(),
            name: None,
            value: value.into(),
            ttl: default_ttl(),
        }
    }

    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = record_type.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.ttl = ttl;
        self
    }

    /// Validate presence of the required fields
    ///
    /// Record type and value are checked by the updater itself so that a bad
    /// value surfaces as an input error rather than a configuration error.
    pub fn validate(&self) -> Result<()> {
        if self.domain.trim().is_empty() {
            return Err(Error::config("record domain cannot be empty"));
        }
        if self.value.trim().is_empty() {
            return Err(Error::config("record value cannot be empty"));
        }
        Ok(())
    }

    /// Convert into the update request handed to the updater
    pub fn to_request(&self) -> UpdateRequest {
        UpdateRequest::new(
            self.domain.clone(),
            self.record_type.clone(),
            self.name.clone().unwrap_or_else(|| self.domain.clone()),
            self.value.clone(),
            self.ttl,
        )
    }
}

fn default_record_type() -> String {
    "A".to_string()
}

fn default_ttl() -> i64 {
    300
}

/// Whether updates are submitted or only logged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateMode {
    #[default]
    Live,
    DryRun,
}

impl UpdateMode {
    /// Parse "live" / "dry-run" (case-insensitive)
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "live" => Ok(UpdateMode::Live),
            "dry-run" | "dryrun" => Ok(UpdateMode::DryRun),
            other => Err(Error::config(format!(
                "unknown mode '{}', expected live or dry-run",
                other
            ))),
        }
    }
}

/// Full configuration of a one-shot run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Target zone
    pub zone: ZoneIdentity,

    /// Record to write
    pub record: RecordConfig,

    /// Cloud name, e.g. "AzurePublicCloud" (None = public cloud)
    #[serde(default)]
    pub cloud: Option<String>,

    #[serde(default)]
    pub mode: UpdateMode,
}

impl UpdaterConfig {
    pub fn new(zone: ZoneIdentity, record: RecordConfig) -> Self {
        Self {
            zone,
            record,
            cloud: None,
            mode: UpdateMode::default(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: UpdaterConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.zone.validate()?;
        self.record.validate()?;
        Ok(())
    }
}
