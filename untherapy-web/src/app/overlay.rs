//! Status overlay - frame metrics and per-panel status lines for HTML

use crate::tracking::TrackerStatus;
use crate::types::ExpressionVector;

/// Frame timing, smoothed with an exponential moving average
#[derive(Clone, Debug, Default)]
pub struct FrameMetrics {
    fps: f32,
    frame_time_ms: f32,
    last_frame: Option<f64>,
}

impl FrameMetrics {
    /// Record a frame timestamp (ms) from the animation loop
    pub fn record(&mut self, timestamp_ms: f64) {
        let previous = self.last_frame.replace(timestamp_ms);
        let Some(previous) = previous else {
            return;
        };
        let frame_time_ms = (timestamp_ms - previous) as f32;

        // Sanity check: ignore invalid times (tab backgrounded or first frame)
        if !(1.0..=200.0).contains(&frame_time_ms) {
            return;
        }

        let fps = 1000.0 / frame_time_ms;
        self.fps = self.fps * 0.9 + fps * 0.1;
        self.frame_time_ms = self.frame_time_ms * 0.9 + frame_time_ms * 0.1;
    }

    /// Forget the last timestamp so a paused loop does not count as one frame
    pub fn pause(&mut self) {
        self.last_frame = None;
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }
}

/// Everything the status text reports
#[derive(Clone, Debug)]
pub struct StatusView<'a> {
    pub metrics: &'a FrameMetrics,
    pub tracker: TrackerStatus,
    pub connected: bool,
    pub expressions: Option<ExpressionVector>,
    pub ai_speaking: bool,
}

fn percent(value: f32) -> f32 {
    (value * 100.0).round()
}

/// Get formatted overlay text (read by JS to update HTML)
pub fn status_text(view: &StatusView<'_>) -> String {
    let tracker = match &view.tracker {
        TrackerStatus::Ready => "Ready".to_string(),
        TrackerStatus::Loading => "Loading...".to_string(),
        TrackerStatus::Failed(message) => message.clone(),
    };
    let backend = if view.connected {
        "Connected"
    } else {
        "Demo mode"
    };
    let expressions = match view.expressions {
        Some(e) => format!(
            "Smiling: {:.0}% | Eyes: {:.0}%",
            percent(e.smiling),
            percent(e.eyes_open)
        ),
        None => "No face".to_string(),
    };

    format!(
        "FPS: {:.0} | Frame: {:.1}ms\n\
         Tracking: {tracker}\n\
         Backend: {backend}\n\
         {expressions}\n\
         Dr. Aria: {}",
        view.metrics.fps(),
        view.metrics.frame_time_ms(),
        if view.ai_speaking { "Speaking" } else { "Listening" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_converges_towards_frame_rate() {
        let mut m = FrameMetrics::default();
        for i in 0..200 {
            m.record(i as f64 * 16.0);
        }
        assert!((m.frame_time_ms() - 16.0).abs() < 0.1);
        assert!((m.fps() - 62.5).abs() < 0.5);
    }

    #[test]
    fn outlier_frames_are_ignored() {
        let mut m = FrameMetrics::default();
        m.record(0.0);
        m.record(0.5);
        m.record(1000.0);
        assert_eq!(m.frame_time_ms(), 0.0);
    }

    #[test]
    fn pause_skips_the_gap() {
        let mut m = FrameMetrics::default();
        m.record(0.0);
        m.record(16.0);
        let before = m.frame_time_ms();
        m.pause();
        m.record(100.0);
        assert_eq!(m.frame_time_ms(), before);
    }

    #[test]
    fn text_reports_every_panel() {
        let metrics = FrameMetrics::default();
        let text = status_text(&StatusView {
            metrics: &metrics,
            tracker: TrackerStatus::Ready,
            connected: false,
            expressions: Some(ExpressionVector {
                smiling: 0.456,
                eyes_open: 0.8,
                ..Default::default()
            }),
            ai_speaking: true,
        });
        assert!(text.contains("Tracking: Ready"));
        assert!(text.contains("Backend: Demo mode"));
        assert!(text.contains("Smiling: 46% | Eyes: 80%"));
        assert!(text.contains("Dr. Aria: Speaking"));
    }
}
