//! Error types for the engine
//!
//! Initialization-class errors (camera, model, renderer, config) become
//! durable user-visible states. Per-frame and network errors are logged
//! and swallowed by their owners.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Camera acquisition failures, with user-facing messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("Camera permission denied. Please allow camera access to use UnTherapy.")]
    PermissionDenied,

    #[error("No camera found. Please connect a camera to use UnTherapy.")]
    NotFound,

    #[error("Failed to access camera: {0}")]
    Unavailable(String),
}

impl CameraError {
    /// Map a browser error (DOMException name + message) onto the taxonomy
    pub fn from_browser(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "SecurityError" | "PermissionDeniedError" => {
                CameraError::PermissionDenied
            }
            "NotFoundError" | "DevicesNotFoundError" | "OverconstrainedError" => {
                CameraError::NotFound
            }
            _ if message.contains("Permission denied") => CameraError::PermissionDenied,
            _ if message.contains("not found") => CameraError::NotFound,
            _ if message.is_empty() => CameraError::Unavailable(name.to_string()),
            _ => CameraError::Unavailable(message.to_string()),
        }
    }
}

/// Landmark model failed to initialize
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelLoadError {
    #[error("Failed to load face detection model: {0}")]
    Backend(String),

    #[error("No face landmark backend was provided")]
    MissingBackend,
}

/// Failure while analyzing a single frame (logged, never escalated)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackingError {
    #[error("Landmark detector failed: {0}")]
    Detector(String),

    #[error("Landmark {index} missing (face has {len} keypoints)")]
    MissingLandmarks { index: usize, len: usize },

    #[error("Invalid landmark buffer length: {0}")]
    InvalidLayout(usize),
}

/// Socket failures (transient, drive reconnect policy)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Failed to open socket: {0}")]
    Open(String),

    #[error("Failed to send frame: {0}")]
    Send(String),

    #[error("Not connected")]
    NotConnected,
}

/// Errors that can occur during GPU initialization
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RendererError {
    #[error("Surface creation failed: {0}")]
    SurfaceCreationFailed(String),

    #[error("Failed to find a suitable GPU adapter")]
    NoAdapter,

    #[error("Device creation failed: {0}")]
    DeviceCreationFailed(String),
}

/// Invalid engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Best-effort text of a rejected promise or thrown JS value
pub(crate) fn js_error_message(value: &JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

macro_rules! impl_into_js {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for JsValue {
                fn from(err: $ty) -> Self {
                    JsValue::from_str(&err.to_string())
                }
            }
        )*
    };
}

impl_into_js!(
    CameraError,
    ModelLoadError,
    TrackingError,
    ConnectionError,
    RendererError,
    ConfigError,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_errors_get_friendly_text() {
        let err = CameraError::from_browser("NotAllowedError", "Permission denied");
        assert_eq!(err, CameraError::PermissionDenied);
        assert!(err.to_string().contains("allow camera access"));
    }

    #[test]
    fn message_patterns_are_matched_when_name_is_generic() {
        assert_eq!(
            CameraError::from_browser("Error", "Requested device not found"),
            CameraError::NotFound
        );
        assert_eq!(
            CameraError::from_browser("Error", "Permission denied by system"),
            CameraError::PermissionDenied
        );
    }

    #[test]
    fn unknown_errors_keep_browser_message() {
        let err = CameraError::from_browser("AbortError", "Starting videoinput failed");
        assert_eq!(
            err.to_string(),
            "Failed to access camera: Starting videoinput failed"
        );
    }

    #[test]
    fn tracking_error_display() {
        let err = TrackingError::MissingLandmarks { index: 454, len: 10 };
        assert!(err.to_string().contains("454"));
    }
}
