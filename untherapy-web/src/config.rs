//! Engine configuration
//!
//! Parsed from a JSON string handed over by JavaScript. Every section has
//! defaults, so `{}` is a valid config.

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::camera::CameraConstraints;
use crate::error::ConfigError;
use crate::session::ReconnectPolicy;

/// Which expression source feeds the user avatar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Time-driven waveforms, no model needed
    #[default]
    Simulated,
    /// Face-mesh landmarks from the JS detector backend
    ModelBacked,
}

/// Which emotion vector is authoritative for the AI avatar and the chart
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmotionSource {
    /// Vectors pushed by the backend over the socket
    #[default]
    Backend,
    /// Vectors synthesized from the local expression estimate
    Local,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub source: SourceKind,
    /// Analyze one frame out of this many
    pub process_every: u32,
    /// Seed for simulated landmark jitter and blink intervals
    pub seed: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Simulated,
            process_every: 3,
            seed: 0x5eed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub server_url: String,
    pub reconnect: ReconnectPolicy,
    /// Max wait for the socket to report connected when a session starts
    pub start_timeout_ms: u32,
    pub poll_interval_ms: u32,
    pub emotion_source: EmotionSource,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:8000/untherapy".to_string(),
            reconnect: ReconnectPolicy::default(),
            start_timeout_ms: 5000,
            poll_interval_ms: 50,
            emotion_source: EmotionSource::Backend,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraConstraints,
    pub tracking: TrackingConfig,
    pub session: SessionConfig,
    /// trace | debug | info | warn | error
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera: CameraConstraints::default(),
            tracking: TrackingConfig::default(),
            session: SessionConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.session.server_url;
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(ConfigError::Invalid(format!(
                "server_url must be a ws:// or wss:// address, got {url}"
            )));
        }
        if self.tracking.process_every == 0 {
            return Err(ConfigError::Invalid(
                "tracking.process_every must be at least 1".into(),
            ));
        }
        if self.session.reconnect.max_attempts > 20 {
            return Err(ConfigError::Invalid(
                "session.reconnect.max_attempts must be 20 or less".into(),
            ));
        }
        if self.session.start_timeout_ms == 0 || self.session.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "session timeouts must be positive".into(),
            ));
        }
        if self.camera.max_frame_rate == 0 || self.camera.ideal_width == 0 {
            return Err(ConfigError::Invalid("camera constraints must be positive".into()));
        }
        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> Result<Level, ConfigError> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level {}", self.log_level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.tracking.process_every, 3);
        assert_eq!(config.session.reconnect.max_attempts, 5);
        assert_eq!(config.session.emotion_source, EmotionSource::Backend);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = AppConfig::from_json(
            r#"{"tracking":{"source":"model_backed"},"session":{"emotion_source":"local"}}"#,
        )
        .unwrap();
        assert_eq!(config.tracking.source, SourceKind::ModelBacked);
        assert_eq!(config.tracking.process_every, 3);
        assert_eq!(config.session.emotion_source, EmotionSource::Local);
        assert_eq!(config.session.server_url, "ws://localhost:8000/untherapy");
    }

    #[test]
    fn rejects_http_url() {
        let err = AppConfig::from_json(r#"{"session":{"server_url":"http://x"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_throttle_and_bad_level() {
        assert!(AppConfig::from_json(r#"{"tracking":{"process_every":0}}"#).is_err());
        assert!(AppConfig::from_json(r#"{"log_level":"loud"}"#).is_err());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            AppConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
