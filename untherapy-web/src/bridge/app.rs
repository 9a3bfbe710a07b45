//! UnTherapyApp - the handle JS holds
//!
//! Async operations return promises; everything else is a plain call.
//! Structured reads come back as JSON strings.

use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{Blob, HtmlCanvasElement, HtmlVideoElement};

use crate::app::Engine;
use crate::config::AppConfig;
use crate::error::js_error_message;
use crate::telemetry::init_logging;
use crate::tracking::FaceMeshBackend;

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        warn!("⚠️ Serialization failed: {e}");
        "null".to_string()
    })
}

#[wasm_bindgen]
pub struct UnTherapyApp {
    engine: Rc<Engine>,
}

#[wasm_bindgen]
impl UnTherapyApp {
    /// Build the app. `config_json` may be empty for defaults; pass a
    /// face mesh backend to use model-backed tracking.
    pub async fn create(
        config_json: String,
        video: HtmlVideoElement,
        user_canvas: HtmlCanvasElement,
        ai_canvas: HtmlCanvasElement,
        chart_canvas: HtmlCanvasElement,
        detector: Option<FaceMeshBackend>,
    ) -> Result<UnTherapyApp, JsValue> {
        let config = if config_json.trim().is_empty() {
            AppConfig::default()
        } else {
            AppConfig::from_json(&config_json)?
        };
        if !init_logging(config.level()?) {
            debug!("Logging already initialized");
        }

        let engine = Engine::create(config, video, user_canvas, ai_canvas, chart_canvas, detector)
            .await?;
        Ok(UnTherapyApp { engine })
    }

    /// Start or stop the session. Resolves once the transition finished.
    pub fn toggle_session(&self) -> js_sys::Promise {
        let engine = Rc::clone(&self.engine);
        future_to_promise(async move {
            engine.toggle_session().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn retry_camera(&self) -> js_sys::Promise {
        let engine = Rc::clone(&self.engine);
        future_to_promise(async move {
            engine.retry_camera().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn retry_tracking(&self) -> js_sys::Promise {
        let engine = Rc::clone(&self.engine);
        future_to_promise(async move {
            engine.initialize_tracking().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Returns the new microphone state
    pub fn toggle_mic(&self) -> bool {
        self.engine.toggle_mic()
    }

    /// Playback state of the AI voice
    pub fn set_speaking(&self, speaking: bool) {
        self.engine.set_speaking(speaking);
    }

    pub fn send_message(&self, text: &str) -> bool {
        self.engine.send_message(text)
    }

    /// Send a recorded audio chunk. Resolves to whether it went out.
    pub fn send_audio(&self, blob: Blob) -> js_sys::Promise {
        let engine = Rc::clone(&self.engine);
        future_to_promise(async move {
            let buffer = JsFuture::from(blob.array_buffer()).await.map_err(|e| {
                warn!("⚠️ Could not read audio: {}", js_error_message(&e));
                e
            })?;
            let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
            Ok(JsValue::from_bool(engine.send_audio(&bytes)))
        })
    }

    pub fn chat_json(&self) -> String {
        to_json(&self.engine.chat())
    }

    /// The emotion shown on the AI avatar and chart, or `null`
    pub fn emotion_json(&self) -> String {
        to_json(&self.engine.emotion())
    }

    pub fn dominant_emotion_json(&self) -> String {
        to_json(&self.engine.dominant_emotion())
    }

    /// Placeholder caption for the chart panel, `undefined` once data arrives
    pub fn chart_caption(&self) -> Option<String> {
        self.engine.chart_caption().map(str::to_string)
    }

    /// Current face mesh (keypoints + bounding box), or `null`
    pub fn landmarks_json(&self) -> String {
        to_json(&self.engine.landmarks())
    }

    pub fn flags_json(&self) -> String {
        to_json(&self.engine.flags())
    }

    pub fn status_text(&self) -> String {
        self.engine.status_text()
    }

    pub fn error_text(&self) -> Option<String> {
        self.engine.error_text()
    }
}
