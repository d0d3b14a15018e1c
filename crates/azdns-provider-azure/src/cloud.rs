//! Azure cloud endpoints
//!
//! Sovereign clouds use their own login authority and management endpoint.
//! Names follow the `AZURE_ENVIRONMENT` values understood by the Azure SDKs.

use azdns_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// An Azure cloud
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AzureCloud {
    #[default]
    Public,
    China,
    UsGovernment,
}

impl AzureCloud {
    /// Entra ID authority host for token requests
    pub fn authority_host(&self) -> &'static str {
        match self {
            AzureCloud::Public => "https://login.microsoftonline.com",
            AzureCloud::China => "https://login.chinacloudapi.cn",
            AzureCloud::UsGovernment => "https://login.microsoftonline.us",
        }
    }

    /// Azure Resource Manager endpoint
    pub fn management_endpoint(&self) -> &'static str {
        match self {
            AzureCloud::Public => "https://management.azure.com",
            AzureCloud::China => "https://management.chinacloudapi.cn",
            AzureCloud::UsGovernment => "https://management.usgovcloudapi.net",
        }
    }

    /// OAuth scope for the management endpoint
    pub fn management_scope(&self) -> String {
        format!("{}/.default", self.management_endpoint())
    }

    pub fn name(&self) -> &'static str {
        match self {
            AzureCloud::Public => "AzurePublicCloud",
            AzureCloud::China => "AzureChinaCloud",
            AzureCloud::UsGovernment => "AzureUSGovernmentCloud",
        }
    }

    /// Resolve an optional cloud name, defaulting to the public cloud
    pub fn resolve(name: Option<&str>) -> Result<Self> {
        match name {
            None => Ok(AzureCloud::Public),
            Some(name) if name.trim().is_empty() => Ok(AzureCloud::Public),
            Some(name) => name.parse(),
        }
    }
}

impl fmt::Display for AzureCloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AzureCloud {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "azurepubliccloud" | "azurecloud" | "public" => Ok(AzureCloud::Public),
            "azurechinacloud" | "china" => Ok(AzureCloud::China),
            "azureusgovernmentcloud" | "azureusgovernment" | "usgovernment" => {
                Ok(AzureCloud::UsGovernment)
            }
            _ => Err(Error::config(format!(
                "unknown Azure cloud '{}'. Supported: AzurePublicCloud, AzureChinaCloud, AzureUSGovernmentCloud",
                s
            ))),
        }
    }
}
