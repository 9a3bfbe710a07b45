//! Face landmark storage
//!
//! Receives face-mesh keypoints (flat buffer from JavaScript or the
//! simulated source) and keeps them for expression derivation.

use serde::Serialize;

use crate::error::TrackingError;

/// MediaPipe FaceMesh keypoint count (478 with refined irises)
pub const FACE_MESH_POINTS: usize = 468;

/// Leading floats of the flat layout: x_min, y_min, x_max, y_max
const BOX_FIELDS: usize = 4;

/// A single keypoint in frame pixel coordinates
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub name: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn from_corners(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
            width: x_max - x_min,
            height: y_max - y_min,
        }
    }
}

/// Keypoints and bounding box of one detected face
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FaceLandmarks {
    pub keypoints: Vec<Keypoint>,
    pub bounding_box: BoundingBox,
}

impl FaceLandmarks {
    /// Parse the flat layout `[x_min, y_min, x_max, y_max, x0, y0, z0, ...]`.
    ///
    /// An empty buffer means no face was found.
    pub fn from_flat(data: &[f32]) -> Result<Option<Self>, TrackingError> {
        if data.is_empty() {
            return Ok(None);
        }
        if data.len() < BOX_FIELDS || (data.len() - BOX_FIELDS) % 3 != 0 {
            return Err(TrackingError::InvalidLayout(data.len()));
        }

        let bounding_box = BoundingBox::from_corners(data[0], data[1], data[2], data[3]);
        let keypoints = data[BOX_FIELDS..]
            .chunks_exact(3)
            .map(|xyz| Keypoint {
                x: xyz[0],
                y: xyz[1],
                z: xyz[2],
                name: None,
            })
            .collect();

        Ok(Some(Self {
            keypoints,
            bounding_box,
        }))
    }

    /// Get a keypoint by mesh index
    pub fn point(&self, index: usize) -> Result<&Keypoint, TrackingError> {
        self.keypoints
            .get(index)
            .ok_or(TrackingError::MissingLandmarks {
                index,
                len: self.keypoints.len(),
            })
    }
}
