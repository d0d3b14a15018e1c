// # azdnsd - Azure DNS record updater
//
// Thin one-shot integration layer: reads configuration, builds the updater
// with the ambient credential chain, submits one A/AAAA update, and exits.
// All DNS logic lives in azdns-core and azdns-provider-azure.
//
// ## Configuration
//
// ### File
// - `AZDNS_CONFIG`: optional JSON file holding an `UpdaterConfig`; any
//   variable below overrides the matching field
//
// ### Zone
// - `AZDNS_SUBSCRIPTION_ID`: Azure subscription ID
// - `AZDNS_RESOURCE_GROUP`: resource group holding the zone
// - `AZDNS_ZONE_NAME`: DNS zone name
//
// ### Record
// - `AZDNS_DOMAIN`: record-set name relative to the zone
// - `AZDNS_RECORD_TYPE`: A or AAAA (default A)
// - `AZDNS_RECORD_NAME`: name carried in the payload (default AZDNS_DOMAIN)
// - `AZDNS_RECORD_VALUE`: IPv4 or IPv6 address
// - `AZDNS_TTL`: seconds (default 300)
//
// ### Runtime
// - `AZDNS_MODE`: live or dry-run (default live)
// - `AZDNS_LOG_LEVEL`: trace, debug, info, warn, error (default info)
// - `AZURE_ENVIRONMENT`: cloud name (default AzurePublicCloud)
//
// ### Credentials
// - `AZURE_ACCESS_TOKEN`: pre-acquired bearer token
// - `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`: service principal
// - otherwise the host's managed identity (`AZURE_CLIENT_ID` selects a
//   user-assigned one)
//
// ## Example
//
// ```bash
// export AZDNS_SUBSCRIPTION_ID=00000000-0000-0000-0000-000000000000
// export AZDNS_RESOURCE_GROUP=dns-rg
// export AZDNS_ZONE_NAME=example.com
// export AZDNS_DOMAIN=home
// export AZDNS_RECORD_VALUE=203.0.113.5
//
// azdnsd
// ```

use anyhow::{Context, Result};
use azdns_core::{Error, RecordConfig, UpdateMode, UpdaterConfig, ZoneIdentity};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the outcome of a run
///
/// - 0: Record set updated (or logged in dry-run mode)
/// - 1: Configuration or input error
/// - 2: No credential produced a token
/// - 3: The management API rejected or never answered the update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AzdnsExitCode {
    Success = 0,
    ConfigError = 1,
    AuthError = 2,
    ProviderError = 3,
}

impl AzdnsExitCode {
    fn for_error(err: &Error) -> Self {
        match err {
            Error::Authentication(_) => AzdnsExitCode::AuthError,
            Error::ProviderApi(_) => AzdnsExitCode::ProviderError,
            _ => AzdnsExitCode::ConfigError,
        }
    }
}

impl From<AzdnsExitCode> for ExitCode {
    fn from(code: AzdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    updater: UpdaterConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, starting from `AZDNS_CONFIG` if set
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut updater = match var("AZDNS_CONFIG") {
            Some(path) => UpdaterConfig::from_json_file(&path)
                .with_context(|| format!("failed to load AZDNS_CONFIG file {}", path))?,
            None => UpdaterConfig::new(ZoneIdentity::new("", "", ""), RecordConfig::new("", "")),
        };

        if let Some(v) = var("AZDNS_SUBSCRIPTION_ID") {
            updater.zone.subscription_id = v;
        }
        if let Some(v) = var("AZDNS_RESOURCE_GROUP") {
            updater.zone.resource_group = v;
        }
        if let Some(v) = var("AZDNS_ZONE_NAME") {
            updater.zone.zone_name = v;
        }
        if let Some(v) = var("AZDNS_DOMAIN") {
            updater.record.domain = v;
        }
        if let Some(v) = var("AZDNS_RECORD_TYPE") {
            updater.record.record_type = v;
        }
        if let Some(v) = var("AZDNS_RECORD_NAME") {
            updater.record.name = Some(v);
        }
        if let Some(v) = var("AZDNS_RECORD_VALUE") {
            updater.record.value = v;
        }
        if let Some(v) = var("AZDNS_TTL") {
            updater.record.ttl = v.trim().parse().with_context(|| {
                format!("AZDNS_TTL must be an integer number of seconds. Got: {}", v)
            })?;
        }
        if let Some(v) = var("AZDNS_MODE") {
            updater.mode = UpdateMode::parse(&v)?;
        }
        if let Some(v) = var("AZURE_ENVIRONMENT") {
            updater.cloud = Some(v);
        }

        Ok(Self {
            updater,
            log_level: var("AZDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Record type and address are left to the updater, which reports them
    /// as input errors before touching the network.
    fn validate(&self) -> Result<()> {
        let required = [
            ("AZDNS_SUBSCRIPTION_ID", &self.updater.zone.subscription_id),
            ("AZDNS_RESOURCE_GROUP", &self.updater.zone.resource_group),
            ("AZDNS_ZONE_NAME", &self.updater.zone.zone_name),
            ("AZDNS_DOMAIN", &self.updater.record.domain),
            ("AZDNS_RECORD_VALUE", &self.updater.record.value),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("{} is required. Set it via: export {}=...", name, name);
            }
        }

        self.updater.validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "AZDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return AzdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return AzdnsExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return AzdnsExitCode::ConfigError.into();
    }

    info!(
        "Updating {} record {} in zone {}",
        config.updater.record.record_type,
        config.updater.record.domain,
        config.updater.zone.zone_name
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return AzdnsExitCode::ConfigError.into();
        }
    };

    let code = rt.block_on(async {
        match run(&config.updater).await {
            Ok(()) => AzdnsExitCode::Success,
            Err(e) => {
                error!("Update failed: {}", e);
                AzdnsExitCode::for_error(&e)
            }
        }
    });

    code.into()
}

/// Build the updater and submit the configured record
async fn run(config: &UpdaterConfig) -> azdns_core::Result<()> {
    let updater = azdns_provider_azure::build_updater(config)?;
    updater.update(&config.record.to_request()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use azdns_core::ApiFailure;
    use std::collections::HashMap;
    use std::io::Write;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("AZDNS_SUBSCRIPTION_ID", "sub1"),
        ("AZDNS_RESOURCE_GROUP", "rg1"),
        ("AZDNS_ZONE_NAME", "example.com"),
        ("AZDNS_DOMAIN", "home"),
        ("AZDNS_RECORD_VALUE", "203.0.113.5"),
    ];

    #[test]
    fn test_minimal_env_applies_defaults() {
        let config = load(MINIMAL).unwrap();
        config.validate().unwrap();

        let request = config.updater.record.to_request();
        assert_eq!(request.domain, "home");
        assert_eq!(request.record_type, "A");
        assert_eq!(request.record_name, "home");
        assert_eq!(request.ttl, 300);
        assert_eq!(config.updater.mode, UpdateMode::Live);
        assert_eq!(config.updater.cloud, None);
        assert_eq!(config.tracing_level(), Level::INFO);
    }

    #[test]
    fn test_env_overrides_every_field() {
        let mut vars = MINIMAL.to_vec();
        vars.extend([
            ("AZDNS_RECORD_TYPE", "AAAA"),
            ("AZDNS_RECORD_NAME", "home6"),
            ("AZDNS_RECORD_VALUE", "2001:db8::1"),
            ("AZDNS_TTL", "60"),
            ("AZDNS_MODE", "dry-run"),
            ("AZDNS_LOG_LEVEL", "debug"),
            ("AZURE_ENVIRONMENT", "AzureChinaCloud"),
        ]);
        let config = load(&vars).unwrap();

        let request = config.updater.record.to_request();
        assert_eq!(request.record_type, "AAAA");
        assert_eq!(request.record_name, "home6");
        assert_eq!(request.record_value, "2001:db8::1");
        assert_eq!(request.ttl, 60);
        assert_eq!(config.updater.mode, UpdateMode::DryRun);
        assert_eq!(config.updater.cloud.as_deref(), Some("AzureChinaCloud"));
        assert_eq!(config.tracing_level(), Level::DEBUG);
    }

    #[test]
    fn test_missing_required_variable_is_named() {
        let vars: Vec<_> = MINIMAL
            .iter()
            .copied()
            .filter(|(k, _)| *k != "AZDNS_ZONE_NAME")
            .collect();
        let err = load(&vars).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("AZDNS_ZONE_NAME"));
    }

    #[test]
    fn test_bad_ttl_and_mode_rejected() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("AZDNS_TTL", "five minutes"));
        assert!(load(&vars).is_err());

        let mut vars = MINIMAL.to_vec();
        vars.push(("AZDNS_MODE", "maybe"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("AZDNS_LOG_LEVEL", "verbose"));
        assert!(load(&vars).unwrap().validate().is_err());
    }

    #[test]
    fn test_config_file_with_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "zone": {{"subscription_id": "sub-file", "resource_group": "rg-file", "zone_name": "example.org"}},
                "record": {{"domain": "www", "value": "198.51.100.7", "ttl": 120}},
                "mode": "dry-run"
            }}"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let config = load(&[
            ("AZDNS_CONFIG", path.as_str()),
            ("AZDNS_RECORD_VALUE", "198.51.100.8"),
        ])
        .unwrap();
        config.validate().unwrap();

        assert_eq!(config.updater.zone.subscription_id, "sub-file");
        assert_eq!(config.updater.record.value, "198.51.100.8");
        assert_eq!(config.updater.record.ttl, 120);
        assert_eq!(config.updater.mode, UpdateMode::DryRun);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        assert!(load(&[("AZDNS_CONFIG", "/nonexistent/azdns.json")]).is_err());
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(
            AzdnsExitCode::for_error(&Error::unsupported_record_type("MX")),
            AzdnsExitCode::ConfigError
        );
        assert_eq!(
            AzdnsExitCode::for_error(&Error::config("zone name cannot be empty")),
            AzdnsExitCode::ConfigError
        );
        assert_eq!(
            AzdnsExitCode::for_error(&Error::auth("no token")),
            AzdnsExitCode::AuthError
        );
        assert_eq!(
            AzdnsExitCode::for_error(&Error::ProviderApi(ApiFailure::transport("timed out"))),
            AzdnsExitCode::ProviderError
        );
        assert_eq!(AzdnsExitCode::ProviderError as u8, 3);
    }
}
