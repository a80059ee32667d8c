//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::enrichment::Pacing;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feeds: FeedConfig,
    pub registries: RegistryConfig,
    pub export: ExportConfig,
    pub alerts: AlertConfig,
    pub logging: LoggingConfig,
}

/// CERT-FR feed endpoints and extraction pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub advisory_url: String,
    pub alert_url: String,
    pub timeout_seconds: u64,
    /// Pause between bulletin-detail fetches (milliseconds)
    pub detail_delay_ms: u64,
    /// Detail-fetch at most this many bulletins per run
    pub max_bulletins: Option<usize>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            advisory_url: "https://www.cert.ssi.gouv.fr/avis/feed/".to_string(),
            alert_url: "https://www.cert.ssi.gouv.fr/alerte/feed/".to_string(),
            timeout_seconds: 10,
            detail_delay_ms: 2000,
            max_bulletins: None,
        }
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }
}

/// Registry endpoints, timeouts and enrichment pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub cve_base_url: String,
    pub epss_base_url: String,
    pub timeout_seconds: u64,
    /// Pause between the CVE record call and the EPSS call (milliseconds)
    pub registry_delay_ms: u64,
    /// Pause between identifiers in a batch (milliseconds)
    pub identifier_delay_ms: u64,
    /// Enrich at most this many identifiers per run
    pub max_cves: Option<usize>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            cve_base_url: "https://cveawg.mitre.org".to_string(),
            epss_base_url: "https://api.first.org".to_string(),
            timeout_seconds: 10,
            registry_delay_ms: 1000,
            identifier_delay_ms: 1000,
            max_cves: None,
        }
    }
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            registry_delay: Duration::from_millis(self.registry_delay_ms),
            identifier_delay: Duration::from_millis(self.identifier_delay_ms),
        }
    }
}

/// Output paths for the CSV artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub enriched_path: PathBuf,
    pub consolidated_path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enriched_path: PathBuf::from("enriched_cves.csv"),
            consolidated_path: PathBuf::from("consolidated_data.csv"),
        }
    }
}

/// Alert evaluation threshold and delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// EPSS probability above which a row counts as critical
    pub epss_threshold: f64,
    /// Deliver the report by email; when false the decision is only logged
    pub send_email: bool,
    pub smtp: SmtpConfig,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            epss_threshold: crate::application::alerts::EPSS_ALERT_THRESHOLD,
            send_email: false,
            smtp: SmtpConfig::default(),
        }
    }
}

/// SMTP session settings; credentials are expected from the environment
/// (`CERTWATCH__ALERTS__SMTP__USERNAME` / `...__PASSWORD`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub to_address: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            to_address: String::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter, overridable with RUST_LOG
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.feeds.validate()?;
        self.registries.validate()?;
        self.export.validate()?;
        self.alerts.validate()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        // Add local config and environment variables last (highest priority)
        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CERTWATCH").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;
        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
