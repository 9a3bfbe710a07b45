//! Engine - wires camera, tracking, avatars, chart and session together
//!
//! One instance per page. Shared as `Rc<Engine>` between the JS handle, the
//! animation loop (weakly) and in-flight analyses. Every `RefCell` borrow is
//! released before an await.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen::JsValue;
use web_sys::{HtmlCanvasElement, HtmlVideoElement};

use super::controller::{SessionController, SessionFlags, Transition};
use super::overlay::{status_text, FrameMetrics, StatusView};
use super::scheduler::AnimationLoop;
use super::startup::{sleep_ms, wait_until};
use super::synth::synthesize_emotion;
use crate::avatar::{draw_user_avatar, AiAvatar, UserPose, AI_CANVAS_SIZE, USER_CANVAS_SIZE};
use crate::camera::Camera;
use crate::chart::{DominantEmotion, EmotionChart};
use crate::config::{AppConfig, EmotionSource, SourceKind};
use crate::renderer::{CanvasKind, Renderer, Scene};
use crate::session::{self, Session};
use crate::tracking::{
    ExpressionSource, FaceMeshBackend, FaceTracker, JsFaceMeshDetector, ModelBackedSource,
    SimulatedSource,
};
use crate::types::{ChatMessage, EmotionVector, FaceLandmarks};

pub struct Engine {
    config: AppConfig,
    camera: Camera,
    tracker: FaceTracker,
    session: Rc<Session>,
    renderer: Renderer,
    ai_avatar: RefCell<AiAvatar>,
    controller: RefCell<SessionController>,
    animation: AnimationLoop,
    metrics: RefCell<FrameMetrics>,
    speaking: Cell<bool>,
    local_emotion: Cell<Option<EmotionVector>>,
    local_revision: Cell<u64>,
    /// Tracker revision last drawn on the user canvas
    drawn_expressions: Cell<u64>,
    /// (pushed, local) revisions last applied to the AI avatar and chart
    drawn_emotion: Cell<Option<(u64, u64)>>,
    analysis_in_flight: Cell<bool>,
}

impl Engine {
    pub async fn create(
        config: AppConfig,
        video: HtmlVideoElement,
        user_canvas: HtmlCanvasElement,
        ai_canvas: HtmlCanvasElement,
        chart_canvas: HtmlCanvasElement,
        detector: Option<FaceMeshBackend>,
    ) -> Result<Rc<Self>, JsValue> {
        let camera = Camera::new(video, config.camera.clone())?;

        let source: Box<dyn ExpressionSource> = match (config.tracking.source, detector) {
            (SourceKind::Simulated, _) => Box::new(SimulatedSource::new(config.tracking.seed)),
            (SourceKind::ModelBacked, Some(backend)) => Box::new(ModelBackedSource::new(
                Box::new(JsFaceMeshDetector::new(backend)),
            )),
            (SourceKind::ModelBacked, None) => Box::new(ModelBackedSource::unavailable()),
        };
        let tracker = FaceTracker::new(source, config.tracking.process_every);
        let renderer = Renderer::new(user_canvas, ai_canvas, chart_canvas).await?;

        let engine = Rc::new(Self {
            session: Rc::new(Session::new(config.session.reconnect.clone())),
            controller: RefCell::new(SessionController::new(config.session.emotion_source)),
            ai_avatar: RefCell::new(AiAvatar::new(config.tracking.seed ^ 0xb1)),
            config,
            camera,
            tracker,
            renderer,
            animation: AnimationLoop::default(),
            metrics: RefCell::new(FrameMetrics::default()),
            speaking: Cell::new(false),
            local_emotion: Cell::new(None),
            local_revision: Cell::new(0),
            drawn_expressions: Cell::new(0),
            drawn_emotion: Cell::new(None),
            analysis_in_flight: Cell::new(false),
        });

        engine.draw_chart(None);
        engine.initialize_tracking().await;
        info!("✅ UnTherapy engine ready");
        Ok(engine)
    }

    // ========================================================================
    // SESSION LIFECYCLE
    // ========================================================================

    pub async fn toggle_session(self: &Rc<Self>) {
        let transition = self.controller.borrow_mut().begin_toggle();
        match transition {
            Some(Transition::Start) => self.start_session().await,
            Some(Transition::Stop) => self.stop_session(),
            None => debug!("Toggle ignored while loading"),
        }
    }

    async fn start_session(self: &Rc<Self>) {
        let settings = &self.config.session;
        session::connect(&self.session, &settings.server_url);

        let socket = Rc::clone(&self.session);
        let connected = wait_until(
            move || socket.is_connected(),
            settings.start_timeout_ms,
            settings.poll_interval_ms,
            sleep_ms,
        )
        .await;
        if !connected {
            warn!(
                "⚠️ Backend not connected after {}ms, starting in demo mode",
                settings.start_timeout_ms
            );
        }

        self.tracker.reset();
        self.start_camera().await;
        self.controller.borrow_mut().finish_start(connected);
        self.start_loop();
        info!("✅ Session started! Dr. Aria is now listening.");
    }

    fn stop_session(&self) {
        self.controller.borrow_mut().finish_stop();
        self.animation.stop();
        self.metrics.borrow_mut().pause();
        self.camera.stop();
        self.tracker.reset();
        self.session.disconnect();

        self.local_emotion.set(None);
        self.local_revision.set(self.local_revision.get() + 1);
        self.ai_avatar.borrow_mut().reset();
        self.drawn_emotion.set(None);
        self.draw_chart(None);
        self.renderer
            .render(CanvasKind::User, &Scene::new(USER_CANVAS_SIZE, USER_CANVAS_SIZE));
        self.renderer
            .render(CanvasKind::Ai, &Scene::new(AI_CANVAS_SIZE, AI_CANVAS_SIZE));
        info!("👋 Session ended");
    }

    async fn start_camera(&self) {
        let result = self.camera.start().await;
        let error = result.err().map(|e| e.to_string());
        self.controller.borrow_mut().set_camera_error(error);
    }

    /// Retry after a camera error (only meaningful during a session)
    pub async fn retry_camera(&self) {
        let active = self.controller.borrow().flags().active;
        if active {
            self.start_camera().await;
        }
    }

    pub async fn initialize_tracking(&self) {
        let result = self.tracker.initialize().await;
        let error = result.err().map(|e| e.to_string());
        self.controller.borrow_mut().set_tracking_error(error);
    }

    fn start_loop(self: &Rc<Self>) {
        let engine = Rc::downgrade(self);
        self.animation.start(move |timestamp| {
            if let Some(engine) = engine.upgrade() {
                engine.tick(timestamp);
            }
        });
    }

    // ========================================================================
    // PER-FRAME WORK
    // ========================================================================

    fn tick(self: &Rc<Self>, timestamp: f64) {
        self.metrics.borrow_mut().record(timestamp);
        let now = js_sys::Date::now();

        let connected = self.session.is_connected();
        self.controller.borrow_mut().sync_connection(connected);

        self.analyze(now);
        self.update_user_avatar(now);
        self.update_emotion();

        let scene = {
            let mut avatar = self.ai_avatar.borrow_mut();
            avatar.tick(now);
            avatar.draw(now)
        };
        self.renderer.render(CanvasKind::Ai, &scene);
    }

    /// Capture and analyze one frame in the background
    fn analyze(self: &Rc<Self>, now: f64) {
        if self.analysis_in_flight.get() {
            return;
        }
        let Some(frame) = self.camera.capture_frame() else {
            return;
        };

        self.analysis_in_flight.set(true);
        let epoch = self.controller.borrow().epoch();
        let engine = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            engine.tracker.process_frame(&frame, now).await;
            engine.analysis_in_flight.set(false);

            // Finished after the session it belonged to was stopped
            if engine.controller.borrow().epoch() != epoch {
                engine.tracker.reset();
            }
        });
    }

    fn update_user_avatar(&self, now: f64) {
        let revision = self.tracker.revision();
        if revision == self.drawn_expressions.get() {
            return;
        }
        self.drawn_expressions.set(revision);

        let Some(expressions) = self.tracker.expressions() else {
            return;
        };
        let pose = UserPose::from_expressions(&expressions);
        self.renderer.render(CanvasKind::User, &draw_user_avatar(&pose));

        let (synthesize, source) = {
            let controller = self.controller.borrow();
            (controller.should_synthesize(), controller.emotion_source())
        };
        if synthesize {
            let emotion = synthesize_emotion(&expressions, now);
            if source == EmotionSource::Backend {
                debug!("📊 Emotion data: {emotion:?}");
            }
            self.local_emotion.set(Some(emotion));
            self.local_revision.set(self.local_revision.get() + 1);
        }
    }

    fn update_emotion(&self) {
        let key = (self.session.emotion_revision(), self.local_revision.get());
        if self.drawn_emotion.get() == Some(key) {
            return;
        }
        self.drawn_emotion.set(Some(key));

        let selected = self.selected_emotion();
        if let Some(emotion) = &selected {
            self.ai_avatar
                .borrow_mut()
                .react_to(emotion, self.speaking.get());
        }
        self.draw_chart(selected.as_ref());
    }

    fn draw_chart(&self, emotion: Option<&EmotionVector>) {
        let chart = EmotionChart::from_emotion(emotion);
        self.renderer.render(CanvasKind::Chart, &chart.draw());
    }

    fn selected_emotion(&self) -> Option<EmotionVector> {
        self.controller
            .borrow()
            .select_emotion(self.session.emotion(), self.local_emotion.get())
    }

    // ========================================================================
    // USER ACTIONS
    // ========================================================================

    pub fn toggle_mic(&self) -> bool {
        let enabled = self.controller.borrow_mut().toggle_mic();
        info!("🎤 Microphone {}", if enabled { "enabled" } else { "disabled" });
        enabled
    }

    pub fn set_speaking(&self, speaking: bool) {
        if self.speaking.replace(speaking) != speaking {
            // Re-apply the current emotion; the neutral row depends on it
            self.drawn_emotion.set(None);
        }
    }

    pub fn send_message(&self, text: &str) -> bool {
        self.session.send_message(text, js_sys::Date::now())
    }

    pub fn send_audio(&self, audio: &[u8]) -> bool {
        if !self.controller.borrow().flags().mic_enabled {
            debug!("Dropping audio while the microphone is disabled");
            return false;
        }
        self.session.send_audio(audio, js_sys::Date::now())
    }

    // ========================================================================
    // READ-ONLY VIEWS
    // ========================================================================

    pub fn chat(&self) -> Vec<ChatMessage> {
        self.session.chat()
    }

    pub fn emotion(&self) -> Option<EmotionVector> {
        self.selected_emotion()
    }

    pub fn dominant_emotion(&self) -> Option<DominantEmotion> {
        EmotionChart::from_emotion(self.selected_emotion().as_ref()).dominant()
    }

    /// Text shown under the chart while it has no data
    pub fn chart_caption(&self) -> Option<&'static str> {
        EmotionChart::from_emotion(self.selected_emotion().as_ref()).caption()
    }

    pub fn landmarks(&self) -> Option<FaceLandmarks> {
        self.tracker.landmarks()
    }

    pub fn flags(&self) -> SessionFlags {
        self.controller.borrow().flags()
    }

    pub fn status_text(&self) -> String {
        let metrics = self.metrics.borrow();
        status_text(&StatusView {
            metrics: &metrics,
            tracker: self.tracker.status(),
            connected: self.session.is_connected(),
            expressions: self.tracker.expressions(),
            ai_speaking: self.speaking.get(),
        })
    }

    pub fn error_text(&self) -> Option<String> {
        self.controller.borrow().error_text().map(str::to_string)
    }
}
