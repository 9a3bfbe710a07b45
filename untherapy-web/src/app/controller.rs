//! Session controller - flags, durable errors and the emotion selection
//!
//! Pure state. The engine performs the side effects each transition asks
//! for (connect, camera, loop) and reports back.

use serde::Serialize;

use crate::config::EmotionSource;
use crate::types::EmotionVector;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SessionFlags {
    pub active: bool,
    pub connected: bool,
    pub loading: bool,
    pub mic_enabled: bool,
    /// Active without a backend (start wait timed out)
    pub demo_mode: bool,
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self {
            active: false,
            connected: false,
            loading: false,
            mic_enabled: true,
            demo_mode: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Start,
    Stop,
}

#[derive(Clone, Debug, Default)]
pub struct SessionController {
    flags: SessionFlags,
    camera_error: Option<String>,
    tracking_error: Option<String>,
    emotion_source: EmotionSource,
    /// Bumped on every start and stop
    epoch: u64,
}

impl SessionController {
    pub fn new(emotion_source: EmotionSource) -> Self {
        Self {
            emotion_source,
            ..Default::default()
        }
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Claim the toggle. `None` while a previous toggle is still running.
    pub fn begin_toggle(&mut self) -> Option<Transition> {
        if self.flags.loading {
            return None;
        }
        self.flags.loading = true;
        Some(if self.flags.active {
            Transition::Stop
        } else {
            Transition::Start
        })
    }

    pub fn finish_start(&mut self, connected: bool) {
        self.epoch += 1;
        self.flags.active = true;
        self.flags.connected = connected;
        self.flags.demo_mode = !connected;
        self.flags.loading = false;
    }

    pub fn finish_stop(&mut self) {
        self.epoch += 1;
        self.flags.active = false;
        self.flags.connected = false;
        self.flags.demo_mode = false;
        self.flags.loading = false;
    }

    /// Follow the socket after start (drops, reconnects)
    pub fn sync_connection(&mut self, connected: bool) {
        if self.flags.active {
            self.flags.connected = connected;
            if connected {
                self.flags.demo_mode = false;
            }
        }
    }

    pub fn toggle_mic(&mut self) -> bool {
        self.flags.mic_enabled = !self.flags.mic_enabled;
        self.flags.mic_enabled
    }

    /// Local expressions feed the synthesizer only in a live session
    pub fn should_synthesize(&self) -> bool {
        self.flags.active && self.flags.connected
    }

    pub fn emotion_source(&self) -> EmotionSource {
        self.emotion_source
    }

    /// The one emotion vector the AI avatar and chart display
    pub fn select_emotion(
        &self,
        pushed: Option<EmotionVector>,
        synthesized: Option<EmotionVector>,
    ) -> Option<EmotionVector> {
        match self.emotion_source {
            EmotionSource::Backend => pushed,
            EmotionSource::Local => synthesized,
        }
    }

    pub fn set_camera_error(&mut self, error: Option<String>) {
        self.camera_error = error;
    }

    pub fn set_tracking_error(&mut self, error: Option<String>) {
        self.tracking_error = error;
    }

    /// Camera error first, since it blocks tracking anyway
    pub fn error_text(&self) -> Option<&str> {
        self.camera_error
            .as_deref()
            .or(self.tracking_error.as_deref())
    }
}
