//! JS face-mesh backend binding
//!
//! The landmark model runs in JavaScript (TensorFlow.js / MediaPipe). The
//! page passes an object with two promise-returning methods:
//!
//! - `load()` resolves once the model is ready
//! - `estimate(imageData)` resolves to a `Float32Array` in the flat layout
//!   `[x_min, y_min, x_max, y_max, x0, y0, z0, ...]`, empty when no face

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::Clamped;
use wasm_bindgen_futures::JsFuture;
use web_sys::ImageData;

use super::model_backed::LandmarkDetector;
use crate::camera::Frame;
use crate::error::{js_error_message, ModelLoadError, TrackingError};
use crate::types::FaceLandmarks;

#[wasm_bindgen]
extern "C" {
    /// Face landmark backend object supplied by the page
    pub type FaceMeshBackend;

    #[wasm_bindgen(method, catch)]
    fn load(this: &FaceMeshBackend) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn estimate(this: &FaceMeshBackend, image: &ImageData) -> Result<js_sys::Promise, JsValue>;
}

pub struct JsFaceMeshDetector {
    backend: FaceMeshBackend,
}

impl JsFaceMeshDetector {
    pub fn new(backend: FaceMeshBackend) -> Self {
        Self { backend }
    }
}

#[async_trait(?Send)]
impl LandmarkDetector for JsFaceMeshDetector {
    async fn load(&self) -> Result<(), ModelLoadError> {
        let promise = self
            .backend
            .load()
            .map_err(|e| ModelLoadError::Backend(js_error_message(&e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| ModelLoadError::Backend(js_error_message(&e)))?;
        Ok(())
    }

    async fn estimate(&self, frame: &Frame) -> Result<Vec<FaceLandmarks>, TrackingError> {
        let image =
            ImageData::new_with_u8_clamped_array_and_sh(Clamped(frame.pixels.as_slice()), frame.width, frame.height)
                .map_err(|e| TrackingError::Detector(js_error_message(&e)))?;
        let promise = self
            .backend
            .estimate(&image)
            .map_err(|e| TrackingError::Detector(js_error_message(&e)))?;
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| TrackingError::Detector(js_error_message(&e)))?;

        let flat = js_sys::Float32Array::new(&value).to_vec();
        Ok(FaceLandmarks::from_flat(&flat)?.into_iter().collect())
    }
}
