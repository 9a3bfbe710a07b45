//! Capture constraints for `getUserMedia`

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Preferred stream shape: 640×480, at most 30 fps, front camera, no audio
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub ideal_frame_rate: u32,
    pub max_frame_rate: u32,
    pub facing_mode: String,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 640,
            ideal_height: 480,
            ideal_frame_rate: 30,
            max_frame_rate: 30,
            facing_mode: "user".to_string(),
        }
    }
}

impl CameraConstraints {
    /// Build the `MediaStreamConstraints` dictionary
    pub fn to_media_constraints(&self) -> Value {
        json!({
            "video": {
                "width": { "ideal": self.ideal_width },
                "height": { "ideal": self.ideal_height },
                "frameRate": {
                    "ideal": self.ideal_frame_rate.min(self.max_frame_rate),
                    "max": self.max_frame_rate,
                },
                "facingMode": self.facing_mode,
            },
            "audio": false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dictionary_matches_browser_shape() {
        let dict = CameraConstraints::default().to_media_constraints();

        assert_eq!(dict["video"]["width"]["ideal"], 640);
        assert_eq!(dict["video"]["height"]["ideal"], 480);
        assert_eq!(dict["video"]["frameRate"]["max"], 30);
        assert_eq!(dict["video"]["facingMode"], "user");
        assert_eq!(dict["audio"], false);
    }

    #[test]
    fn ideal_rate_never_exceeds_max() {
        let constraints = CameraConstraints {
            ideal_frame_rate: 60,
            max_frame_rate: 24,
            ..Default::default()
        };
        let dict = constraints.to_media_constraints();
        assert_eq!(dict["video"]["frameRate"]["ideal"], 24);
    }
}
