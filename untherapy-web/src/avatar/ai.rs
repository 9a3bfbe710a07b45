//! AI therapist avatar - emotion-driven expression plus blinking
//!
//! The expression changes only when a new emotion vector arrives; the face
//! is redrawn every animation frame so blinks and tilt stay smooth.

use std::f32::consts::PI;

use super::blink::BlinkSchedule;
use crate::renderer::colors::{self, with_alpha};
use crate::renderer::{Scene, Shape};
use crate::types::{Emotion, EmotionVector};

pub const AI_CANVAS_SIZE: u32 = 350;

/// Eyes are drawn shut at or below this openness
const EYES_CLOSED_AT: f32 = 0.3;

const FACE_RADIUS: f32 = 90.0;
const EYE_X: f32 = 30.0;
const EYE_Y: f32 = -25.0;
const BROW_Y: f32 = -40.0;
const MOUTH_Y: f32 = 35.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouthShape {
    Closed,
    Speaking,
    Smiling,
    Concerned,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AiExpression {
    pub eye_openness: f32,
    pub mouth_shape: MouthShape,
    /// -1 concerned .. 1 surprised
    pub eyebrow_position: f32,
    pub head_tilt: f32,
    pub blink_timer: f64,
}

impl Default for AiExpression {
    fn default() -> Self {
        Self {
            eye_openness: 1.0,
            mouth_shape: MouthShape::Closed,
            eyebrow_position: 0.0,
            head_tilt: 0.0,
            blink_timer: 0.0,
        }
    }
}

impl AiExpression {
    /// Apply the response table for the dominant emotion.
    ///
    /// Eye openness and the blink timer are left untouched.
    pub fn react_to(&mut self, emotion: &EmotionVector, is_speaking: bool) {
        let (dominant, _) = emotion.dominant();
        let (mouth_shape, eyebrow_position, head_tilt) = match dominant {
            Emotion::Happy => (MouthShape::Smiling, 0.3, 0.1),
            Emotion::Sad => (MouthShape::Concerned, -0.5, -0.2),
            Emotion::Angry => (MouthShape::Closed, -0.8, 0.0),
            Emotion::Fearful => (MouthShape::Concerned, 0.6, 0.3),
            Emotion::Surprised => (MouthShape::Speaking, 0.8, 0.0),
            Emotion::Neutral | Emotion::Disgusted => {
                let mouth = if is_speaking {
                    MouthShape::Speaking
                } else {
                    MouthShape::Closed
                };
                (mouth, 0.1, 0.0)
            }
        };

        self.mouth_shape = mouth_shape;
        self.eyebrow_position = eyebrow_position;
        self.head_tilt = head_tilt;
    }
}

/// Expression state plus blink schedule for the AI avatar
#[derive(Clone, Debug)]
pub struct AiAvatar {
    expression: AiExpression,
    blink: BlinkSchedule,
}

impl AiAvatar {
    pub fn new(seed: u64) -> Self {
        Self {
            expression: AiExpression::default(),
            blink: BlinkSchedule::new(seed),
        }
    }

    pub fn react_to(&mut self, emotion: &EmotionVector, is_speaking: bool) {
        self.expression.react_to(emotion, is_speaking);
    }

    /// Back to the resting face (session stopped)
    pub fn reset(&mut self) {
        self.expression = AiExpression {
            blink_timer: self.expression.blink_timer,
            ..AiExpression::default()
        };
    }

    /// Advance the blink schedule to `now_ms`
    pub fn tick(&mut self, now_ms: f64) {
        if self.blink.tick(now_ms) {
            self.expression.blink_timer = self.blink.blink_timer();
        }
    }

    pub fn eyes_closed(&self, now_ms: f64) -> bool {
        self.blink.is_blinking(now_ms) || self.expression.eye_openness <= EYES_CLOSED_AT
    }

    pub fn draw(&self, now_ms: f64) -> Scene {
        let e = &self.expression;
        let mut scene = Scene::new(AI_CANVAS_SIZE, AI_CANVAS_SIZE);

        scene.push(Shape::Circle {
            center: [0.0, 0.0],
            radius: FACE_RADIUS,
            color: colors::AI_SKIN,
        });
        scene.push(Shape::Sector {
            center: [0.0, -30.0],
            radius: 95.0,
            start: PI,
            end: 2.0 * PI,
            color: colors::SADDLE_BROWN,
        });

        let closed = self.eyes_closed(now_ms);
        for side in [-1.0, 1.0] {
            let x = side * EYE_X;
            if closed {
                scene.push(Shape::Line {
                    from: [x - 12.0, EYE_Y],
                    to: [x + 12.0, EYE_Y],
                    width: 2.0,
                    color: colors::AI_PUPIL,
                });
            } else {
                scene.push(Shape::Ellipse {
                    center: [x, EYE_Y],
                    rx: 12.0,
                    ry: 8.0,
                    color: colors::WHITE,
                });
                scene.push(Shape::Circle {
                    center: [x, EYE_Y],
                    radius: 6.0,
                    color: colors::AI_PUPIL,
                });
            }
        }

        // Inner brow ends move by a fraction of the outer shift
        let brow_y = BROW_Y - e.eyebrow_position * 8.0;
        let inner_y = brow_y + e.eyebrow_position * 3.0;
        for side in [-1.0, 1.0] {
            scene.push(Shape::Line {
                from: [side * 42.0, brow_y],
                to: [side * 18.0, inner_y],
                width: 4.0,
                color: colors::AI_BROW,
            });
        }

        scene.push(Shape::Ellipse {
            center: [0.0, 5.0],
            rx: 8.0,
            ry: 10.0,
            color: colors::AI_NOSE,
        });

        scene.push(match e.mouth_shape {
            MouthShape::Smiling => Shape::Arc {
                center: [0.0, MOUTH_Y - 15.0],
                radius: 20.0,
                start: 0.3 * PI,
                end: 0.7 * PI,
                width: 3.0,
                color: colors::SADDLE_BROWN,
            },
            MouthShape::Speaking => Shape::Ellipse {
                center: [0.0, MOUTH_Y],
                rx: 10.0,
                ry: 6.0,
                color: colors::MOUTH_RED,
            },
            MouthShape::Concerned => Shape::Arc {
                center: [0.0, MOUTH_Y + 15.0],
                radius: 20.0,
                start: 1.3 * PI,
                end: 1.7 * PI,
                width: 3.0,
                color: colors::SADDLE_BROWN,
            },
            MouthShape::Closed => Shape::Line {
                from: [-12.0, MOUTH_Y],
                to: [12.0, MOUTH_Y],
                width: 3.0,
                color: colors::SADDLE_BROWN,
            },
        });

        // Glasses
        for side in [-1.0, 1.0] {
            let center = [side * EYE_X, EYE_Y];
            scene.push(Shape::Ellipse {
                center,
                rx: 18.0,
                ry: 14.0,
                color: with_alpha(colors::WHITE, 0.1),
            });
            scene.push(Shape::EllipseOutline {
                center,
                rx: 18.0,
                ry: 14.0,
                width: 3.0,
                color: colors::GLASSES,
            });
        }
        scene.push(Shape::Line {
            from: [-12.0, EYE_Y],
            to: [12.0, EYE_Y],
            width: 3.0,
            color: colors::GLASSES,
        });

        scene.rotated(e.head_tilt * 0.15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn emotion(values: [f32; 7]) -> EmotionVector {
        let [happy, sad, angry, fearful, disgusted, surprised, neutral] = values;
        EmotionVector {
            happy,
            sad,
            angry,
            fearful,
            disgusted,
            surprised,
            neutral,
            timestamp: 1_700_000_000_000.0,
        }
    }

    fn pupils(scene: &Scene) -> usize {
        scene
            .shapes()
            .iter()
            .filter(|s| matches!(s, Shape::Circle { radius, .. } if *radius == 6.0))
            .count()
    }

    #[test]
    fn happy_user_gets_smile() {
        let mut e = AiExpression::default();
        e.react_to(&emotion([0.8, 0.1, 0.05, 0.02, 0.0, 0.02, 0.01]), false);
        assert_eq!(e.mouth_shape, MouthShape::Smiling);
        assert_eq!(e.eyebrow_position, 0.3);
        assert_eq!(e.head_tilt, 0.1);
    }

    #[test]
    fn neutral_depends_on_speaking() {
        let calm = emotion([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.9]);
        let mut e = AiExpression::default();
        e.react_to(&calm, true);
        assert_eq!(e.mouth_shape, MouthShape::Speaking);
        e.react_to(&calm, false);
        assert_eq!(e.mouth_shape, MouthShape::Closed);
        assert_eq!(e.eyebrow_position, 0.1);
    }

    #[test]
    fn disgust_uses_default_row() {
        let mut e = AiExpression::default();
        e.react_to(&emotion([0.1, 0.1, 0.1, 0.1, 0.9, 0.1, 0.1]), false);
        assert_eq!((e.mouth_shape, e.eyebrow_position, e.head_tilt), (MouthShape::Closed, 0.1, 0.0));
    }

    #[test]
    fn ties_go_to_earlier_emotion() {
        let mut e = AiExpression::default();
        e.react_to(&emotion([0.0, 0.5, 0.5, 0.0, 0.0, 0.0, 0.0]), false);
        assert_eq!(e.mouth_shape, MouthShape::Concerned);
        assert_eq!(e.head_tilt, -0.2);
    }

    #[test]
    fn reaction_keeps_blink_state() {
        let mut avatar = AiAvatar::new(3);
        avatar.tick(0.0);
        let due = avatar.blink.next_blink().unwrap();
        avatar.tick(due);
        avatar.react_to(&emotion([0.0, 0.9, 0.0, 0.0, 0.0, 0.0, 0.0]), false);
        assert_eq!(avatar.expression.blink_timer, due);
    }

    #[test]
    fn low_openness_closes_eyes() {
        let mut avatar = AiAvatar::new(3);
        avatar.expression.eye_openness = 0.2;
        assert_eq!(pupils(&avatar.draw(10_000.0)), 0);
    }

    #[test]
    fn head_tilt_rotates_face() {
        let mut avatar = AiAvatar::new(3);
        avatar.react_to(&emotion([0.0, 0.0, 0.0, 0.9, 0.0, 0.0, 0.0]), false);
        let rotation = avatar.draw(0.0).rotation.unwrap();
        assert!((rotation - 0.045).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn blink_window_closes_eyes(offset in 0.0f64..600.0) {
            let mut avatar = AiAvatar::new(11);
            avatar.tick(0.0);
            let t = avatar.blink.next_blink().unwrap();
            avatar.tick(t);

            let scene = avatar.draw(t + offset);
            let expected = if offset < 150.0 { 0 } else { 2 };
            prop_assert_eq!(pupils(&scene), expected);
        }
    }
}
