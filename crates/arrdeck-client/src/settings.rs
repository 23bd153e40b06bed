//! The settings collaborator: supplies the poll interval.
//!
//! The subsystem owns no settings storage; it reads
//! `GET /settings/general` for `log_refresh_interval_seconds` and falls
//! back to the 30s default when the collaborator is unreachable. The
//! timezone field is informational only; timestamps arrive pre-localized.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// Poll interval used when the settings collaborator has no answer.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Floor for configured intervals; anything lower would hammer the backend.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// GeneralSettings
// ---------------------------------------------------------------------------

/// Wire shape of `GET /settings/general`, reduced to what this subsystem
/// consumes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneralSettings {
    #[serde(default = "default_refresh_seconds")]
    pub log_refresh_interval_seconds: u64,
    /// Already applied server-side to every timestamp this client sees.
    #[serde(default)]
    pub timezone: String,
}

fn default_refresh_seconds() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_refresh_interval_seconds: default_refresh_seconds(),
            timezone: String::new(),
        }
    }
}

impl GeneralSettings {
    /// Configured poll interval, clamped to a sane floor.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.log_refresh_interval_seconds).max(MIN_REFRESH_INTERVAL)
    }
}

// ---------------------------------------------------------------------------
// SettingsProvider
// ---------------------------------------------------------------------------

/// Error from the settings collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("settings endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("settings payload invalid: {0}")]
    Payload(String),
}

/// The settings collaborator interface.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn general(&self) -> Result<GeneralSettings, SettingsError>;
}

/// Fixed settings, for tests and embedders that configure directly.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings(pub GeneralSettings);

#[async_trait]
impl SettingsProvider for StaticSettings {
    async fn general(&self) -> Result<GeneralSettings, SettingsError> {
        Ok(self.0.clone())
    }
}

/// REST implementation against the dashboard backend.
pub struct HttpSettingsProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSettingsProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SettingsError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| SettingsError::Unreachable(err.to_string()))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }
}

#[async_trait]
impl SettingsProvider for HttpSettingsProvider {
    async fn general(&self) -> Result<GeneralSettings, SettingsError> {
        let url = format!("{}/settings/general", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| SettingsError::Unreachable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(SettingsError::Unreachable(format!(
                "status {}",
                response.status().as_u16()
            )));
        }
        response
            .json::<GeneralSettings>()
            .await
            .map_err(|err| SettingsError::Payload(err.to_string()))
    }
}

/// Resolve the poll interval, falling back to the default when the
/// collaborator fails. The failure is logged once at warn level; polling
/// must start either way.
pub async fn refresh_interval_or_default(provider: &dyn SettingsProvider) -> Duration {
    match provider.general().await {
        Ok(settings) => settings.refresh_interval(),
        Err(err) => {
            tracing::warn!(%err, "settings fetch failed; using default poll interval");
            DEFAULT_REFRESH_INTERVAL
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
