use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::ConfigError;

/// Application configuration, loaded from a YAML file (`config.yaml` by
/// default).
///
/// Applicant identity and the maps API key are required; mail settings are
/// only needed when `--target-date` notification is in play, so they stay
/// optional and are validated at send time.
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// Driver license number typed into the booking form.
    pub driver_license_number: String,
    /// Date of birth typed into the booking form, in the site's own format.
    pub dob: String,
    /// Origin address for travel-time enrichment.
    pub starting_addr: String,
    /// Google Distance Matrix API key.
    pub maps_api_key: String,
    /// Display name used in the notification email headers.
    #[serde(default)]
    pub email_person_name: Option<String>,
    /// SMTP delivery settings for the notification email.
    #[serde(default)]
    pub mail_options: Option<MailConfig>,
    /// Cap on how many listing pages to crawl; `None` crawls them all.
    #[serde(default)]
    pub max_page_count: Option<usize>,
    /// Browser-session and retry tuning.
    #[serde(default)]
    pub scrape: ScrapeConfig,
}

#[derive(Clone, Deserialize)]
pub struct MailConfig {
    /// SMTP server hostname.
    pub address: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub user_name: String,
    pub password: String,
}

/// Tuning for the browser-driving core.
///
/// The two `*_attempts` ceilings are `None` by default, which means "retry
/// until the site comes back" — the listing-recovery and staleness loops
/// have no natural upper bound, only a liveness risk. Set them when an
/// unattended run must fail instead of hanging.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// WebDriver endpoint (geckodriver).
    pub webdriver_url: String,
    pub headless: bool,
    /// Ceiling for `wait_for`-style element waits.
    pub wait_timeout_secs: u64,
    /// How many times to poll for calendar-day elements before concluding an
    /// office has no visible availability.
    pub date_poll_attempts: u32,
    pub date_poll_interval_ms: u64,
    /// Ceiling on "edit location" recovery cycles; `None` retries forever.
    pub listing_recovery_attempts: Option<u32>,
    /// Ceiling on per-office retries after a stale element; `None` retries
    /// forever.
    pub stale_retry_attempts: Option<u32>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_owned(),
            headless: true,
            wait_timeout_secs: 10,
            date_poll_attempts: 1000,
            date_poll_interval_ms: 100,
            listing_recovery_attempts: None,
            stale_retry_attempts: None,
        }
    }
}

impl ScrapeConfig {
    #[must_use]
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    #[must_use]
    pub fn date_poll_interval(&self) -> Duration {
        Duration::from_millis(self.date_poll_interval_ms)
    }
}

fn default_smtp_port() -> u16 {
    587
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("driver_license_number", &"[redacted]")
            .field("dob", &"[redacted]")
            .field("starting_addr", &self.starting_addr)
            .field("maps_api_key", &"[redacted]")
            .field("email_person_name", &self.email_person_name)
            .field("mail_options", &self.mail_options)
            .field("max_page_count", &self.max_page_count)
            .field("scrape", &self.scrape)
            .finish()
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("user_name", &self.user_name)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Loads and validates configuration from a YAML file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read,
/// [`ConfigError::Parse`] if it is not valid YAML for [`AppConfig`], or
/// [`ConfigError::Invalid`] if a required field is empty.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_config(&content)
}

/// Parses and validates configuration from a YAML string.
///
/// This is the file-free core of [`load_config`], split out so tests do not
/// need to touch the filesystem.
///
/// # Errors
///
/// Same as [`load_config`], minus [`ConfigError::Io`].
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_yaml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let required: [(&'static str, &str); 4] = [
        ("driver_license_number", &config.driver_license_number),
        ("dob", &config.dob),
        ("starting_addr", &config.starting_addr),
        ("maps_api_key", &config.maps_api_key),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field,
                reason: "must not be empty".to_owned(),
            });
        }
    }

    if config.max_page_count == Some(0) {
        return Err(ConfigError::Invalid {
            field: "max_page_count",
            reason: "must be at least 1 when set".to_owned(),
        });
    }

    if config.scrape.date_poll_attempts == 0 {
        return Err(ConfigError::Invalid {
            field: "scrape.date_poll_attempts",
            reason: "must be at least 1".to_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
