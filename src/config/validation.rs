//! Configuration validation module

use crate::config::{AlertConfig, ExportConfig, FeedConfig, RegistryConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Feed configuration error: {message}")]
    Feeds { message: String },

    #[error("Registry configuration error: {message}")]
    Registries { message: String },

    #[error("Export configuration error: {message}")]
    Export { message: String },

    #[error("Alert configuration error: {message}")]
    Alerts { message: String },
}

impl ValidationError {
    pub fn feeds(message: impl Into<String>) -> Self {
        Self::Feeds {
            message: message.into(),
        }
    }

    pub fn registries(message: impl Into<String>) -> Self {
        Self::Registries {
            message: message.into(),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    pub fn alerts(message: impl Into<String>) -> Self {
        Self::Alerts {
            message: message.into(),
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl Validate for FeedConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.advisory_url) {
            return Err(ValidationError::feeds(format!(
                "advisory_url must start with http:// or https://, got: {}",
                self.advisory_url
            )));
        }
        if !is_http_url(&self.alert_url) {
            return Err(ValidationError::feeds(format!(
                "alert_url must start with http:// or https://, got: {}",
                self.alert_url
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(ValidationError::feeds(
                "Feed timeout must be greater than 0 seconds".to_string(),
            ));
        }
        if let Some(max) = self.max_bulletins {
            if max == 0 {
                return Err(ValidationError::feeds(
                    "max_bulletins must be greater than 0 if specified".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Validate for RegistryConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.cve_base_url) {
            return Err(ValidationError::registries(format!(
                "cve_base_url must start with http:// or https://, got: {}",
                self.cve_base_url
            )));
        }
        if !is_http_url(&self.epss_base_url) {
            return Err(ValidationError::registries(format!(
                "epss_base_url must start with http:// or https://, got: {}",
                self.epss_base_url
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(ValidationError::registries(
                "Registry timeout must be greater than 0 seconds".to_string(),
            ));
        }
        if let Some(max) = self.max_cves {
            if max == 0 {
                return Err(ValidationError::registries(
                    "max_cves must be greater than 0 if specified".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Validate for ExportConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.enriched_path.as_os_str().is_empty() {
            return Err(ValidationError::export(
                "enriched_path cannot be empty".to_string(),
            ));
        }
        if self.consolidated_path.as_os_str().is_empty() {
            return Err(ValidationError::export(
                "consolidated_path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Validate for AlertConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.epss_threshold) {
            return Err(ValidationError::alerts(format!(
                "epss_threshold must be within [0, 1], got {}",
                self.epss_threshold
            )));
        }
        if self.send_email {
            if self.smtp.host.is_empty() {
                return Err(ValidationError::alerts(
                    "SMTP host cannot be empty when email delivery is enabled".to_string(),
                ));
            }
            if self.smtp.port == 0 {
                return Err(ValidationError::alerts(
                    "SMTP port must be in range 1-65535".to_string(),
                ));
            }
            if self.smtp.from_address.is_empty() || self.smtp.to_address.is_empty() {
                return Err(ValidationError::alerts(
                    "SMTP from/to addresses cannot be empty when email delivery is enabled"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_sections_validate() {
        assert!(FeedConfig::default().validate().is_ok());
        assert!(RegistryConfig::default().validate().is_ok());
        assert!(ExportConfig::default().validate().is_ok());
        assert!(AlertConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_urls_are_rejected() {
        let invalid = FeedConfig {
            advisory_url: "ftp://feed".to_string(),
            ..FeedConfig::default()
        };
        assert!(invalid.validate().is_err());

        let invalid = RegistryConfig {
            epss_base_url: "not-a-url".to_string(),
            ..RegistryConfig::default()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn threshold_must_be_a_probability() {
        let invalid = AlertConfig {
            epss_threshold: 1.5,
            ..AlertConfig::default()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn enabled_email_requires_smtp_settings() {
        let invalid = AlertConfig {
            send_email: true,
            ..AlertConfig::default()
        };
        assert!(invalid.validate().is_err());
    }
}
