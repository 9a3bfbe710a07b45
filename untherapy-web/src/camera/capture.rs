//! Webcam stream ownership and frame capture
//!
//! The camera owns its `<video>` sink and a private scratch canvas.
//! Both are handed in by the caller; nothing is looked up globally.

use std::cell::{Cell, RefCell};

use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, DomException, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

use super::{CameraConstraints, Frame};
use crate::error::CameraError;

pub struct Camera {
    video: HtmlVideoElement,
    scratch: HtmlCanvasElement,
    constraints: CameraConstraints,
    stream: RefCell<Option<MediaStream>>,
    streaming: Cell<bool>,
}

impl Camera {
    pub fn new(video: HtmlVideoElement, constraints: CameraConstraints) -> Result<Self, CameraError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| CameraError::Unavailable("No document found".into()))?;
        let scratch = document
            .create_element("canvas")
            .map_err(|e| to_camera_error(&e))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| CameraError::Unavailable("Scratch canvas is not a canvas".into()))?;

        Ok(Self {
            video,
            scratch,
            constraints,
            stream: RefCell::new(None),
            streaming: Cell::new(false),
        })
    }

    /// Request the stream, bind it to the video sink and wait until it plays
    pub async fn start(&self) -> Result<(), CameraError> {
        if self.streaming.get() {
            return Ok(());
        }

        let window = web_sys::window()
            .ok_or_else(|| CameraError::Unavailable("No window found".into()))?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|e| to_camera_error(&e))?;

        let dict = js_sys::JSON::parse(&self.constraints.to_media_constraints().to_string())
            .map_err(|e| to_camera_error(&e))?;
        let request = devices
            .get_user_media_with_constraints(dict.unchecked_ref::<MediaStreamConstraints>())
            .map_err(|e| to_camera_error(&e))?;

        let stream = match JsFuture::from(request).await {
            Ok(value) => value
                .dyn_into::<MediaStream>()
                .map_err(|_| CameraError::Unavailable("getUserMedia returned no stream".into()))?,
            Err(e) => {
                let err = to_camera_error(&e);
                warn!("❌ Camera error: {err}");
                return Err(err);
            }
        };

        self.video.set_src_object(Some(&stream));
        *self.stream.borrow_mut() = Some(stream);

        if let Err(err) = self.wait_until_playing().await {
            self.stop();
            warn!("❌ Camera error: {err}");
            return Err(err);
        }

        self.streaming.set(true);
        info!("📹 Camera started successfully");
        Ok(())
    }

    async fn wait_until_playing(&self) -> Result<(), CameraError> {
        let video = self.video.clone();
        let loaded = js_sys::Promise::new(&mut |resolve, _reject| {
            video.set_onloadedmetadata(Some(&resolve));
        });
        JsFuture::from(loaded).await.map_err(|e| to_camera_error(&e))?;
        self.video.set_onloadedmetadata(None);

        let playing = self.video.play().map_err(|e| to_camera_error(&e))?;
        JsFuture::from(playing).await.map_err(|e| to_camera_error(&e))?;
        Ok(())
    }

    /// Release every track and detach the sink. Safe to call repeatedly.
    pub fn stop(&self) {
        if let Some(stream) = self.stream.borrow_mut().take() {
            for track in stream.get_tracks().iter() {
                if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                    track.stop();
                }
            }
            info!("📹 Camera stopped");
        }
        self.video.set_src_object(None);
        self.streaming.set(false);
    }

    /// Snapshot the current video frame.
    ///
    /// Returns `None` while not streaming, before the video knows its size,
    /// or when any canvas call fails.
    pub fn capture_frame(&self) -> Option<Frame> {
        if !self.streaming.get() {
            return None;
        }

        let width = self.video.video_width();
        let height = self.video.video_height();
        if width == 0 || height == 0 {
            return None;
        }

        if self.scratch.width() != width || self.scratch.height() != height {
            self.scratch.set_width(width);
            self.scratch.set_height(height);
        }

        let ctx = self
            .scratch
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        ctx.draw_image_with_html_video_element_and_dw_and_dh(
            &self.video,
            0.0,
            0.0,
            width as f64,
            height as f64,
        )
        .ok()?;
        let image = ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .ok()?;

        Some(Frame::new(width, height, image.data().0))
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Translate a rejected browser promise into the camera error taxonomy
fn to_camera_error(value: &JsValue) -> CameraError {
    if let Some(dom) = value.dyn_ref::<DomException>() {
        return CameraError::from_browser(&dom.name(), &dom.message());
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return CameraError::from_browser(&String::from(err.name()), &String::from(err.message()));
    }
    match value.as_string() {
        Some(message) => CameraError::from_browser("", &message),
        None => CameraError::Unavailable("Failed to access camera".into()),
    }
}
