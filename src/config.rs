//! Configuration module
//!
//! Loads structured configuration from TOML files with serde defaults
//! for everything except the deployed contract package id.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ledger node access
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Listing contract coordinates
    pub contract: ContractConfig,

    /// Resolver retry budget
    #[serde(default)]
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Fullnode RPC endpoint
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Address of the published listing package
    pub package_id: String,

    /// Module holding the listing entry point
    #[serde(default = "default_module")]
    pub module: String,

    /// Listing entry function
    #[serde(default = "default_list_function")]
    pub list_function: String,

    /// Type substring identifying the created rental-state object
    #[serde(default = "default_rental_state_type")]
    pub rental_state_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Total resolution attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff after the first failed attempt, in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

fn default_rpc_url() -> String {
    "https://fullnode.devnet.sui.io:443".to_string()
}

fn default_rpc_timeout() -> u64 {
    30
}

fn default_module() -> String {
    "kiosk_rto".to_string()
}

fn default_list_function() -> String {
    "list_nft_for_rent".to_string()
}

fn default_rental_state_type() -> String {
    "RentalStateWithMetadata".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    1000
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            timeout_secs: default_rpc_timeout(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config =
            toml::from_str(&contents).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Check constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.contract.package_id.is_empty() {
            anyhow::bail!("contract.package_id must not be empty");
        }
        if self.contract.rental_state_type.is_empty() {
            anyhow::bail!("contract.rental_state_type must not be empty");
        }
        if self.resolver.max_attempts == 0 {
            anyhow::bail!("resolver.max_attempts must be at least 1");
        }
        if self.ledger.rpc_url.is_empty() {
            anyhow::bail!("ledger.rpc_url must not be empty");
        }
        Ok(())
    }
}

impl ContractConfig {
    /// Fully qualified entry point: `{package}::{module}::{function}`.
    pub fn list_target(&self) -> String {
        format!(
            "{}::{}::{}",
            self.package_id, self.module, self.list_function
        )
    }
}

impl ResolverConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [contract]
            package_id = "0xe8c5"
            "#,
        )
        .unwrap();

        assert_eq!(config.contract.module, "kiosk_rto");
        assert_eq!(config.contract.list_function, "list_nft_for_rent");
        assert_eq!(config.contract.rental_state_type, "RentalStateWithMetadata");
        assert_eq!(config.resolver.max_attempts, 5);
        assert_eq!(config.resolver.initial_delay_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn list_target_formatting() {
        let contract = ContractConfig {
            package_id: "0xe8c5".to_string(),
            module: default_module(),
            list_function: default_list_function(),
            rental_state_type: default_rental_state_type(),
        };
        assert_eq!(contract.list_target(), "0xe8c5::kiosk_rto::list_nft_for_rent");
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config: Config = toml::from_str(
            r#"
            [contract]
            package_id = "0xe8c5"
            "#,
        )
        .unwrap();

        config.resolver.max_attempts = 0;
        assert!(config.validate().is_err());

        config.resolver.max_attempts = 5;
        config.contract.package_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [contract]
            package_id = "0xe8c5"

            [resolver]
            max_attempts = 3
            initial_delay_ms = 250
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.resolver.max_attempts, 3);
        assert_eq!(config.resolver.initial_delay(), Duration::from_millis(250));
    }

    #[test]
    fn missing_file_errors_with_path() {
        let err = Config::from_file("/nonexistent/kiosk.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/kiosk.toml"));
    }
}
