//! User avatar - a pure function of the latest expression vector
//!
//! Classification (`UserPose`) is kept apart from drawing so the thresholds
//! can be tested without a canvas.

use std::f32::consts::PI;

use crate::renderer::colors;
use crate::renderer::{Scene, Shape};
use crate::types::ExpressionVector;

pub const USER_CANVAS_SIZE: u32 = 300;

/// Above this an eye is drawn open, a mouth open, a smile smiling
const OPEN_THRESHOLD: f32 = 0.3;
/// Rotation below this magnitude is treated as noise
const TILT_DEADBAND: f32 = 0.02;

const FACE_RADIUS: f32 = 80.0;
const EYE_X: f32 = 25.0;
const EYE_Y: f32 = -20.0;
const EYE_RADIUS: f32 = 8.0;
const BROW_Y: f32 = -35.0;
const MOUTH_Y: f32 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EyeState {
    Open,
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UserMouth {
    /// Oval whose half-height grows with `mouth_open`
    Open { height: f32 },
    Smile,
    Neutral,
}

/// Discrete drawing decisions for one expression vector
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UserPose {
    pub eyes: EyeState,
    pub mouth: UserMouth,
    /// Upward eyebrow shift in pixels
    pub brow_offset: f32,
    /// Head rotation in radians, `None` inside the deadband
    pub tilt: Option<f32>,
}

impl UserPose {
    pub fn from_expressions(e: &ExpressionVector) -> Self {
        let eyes = if e.eyes_open > OPEN_THRESHOLD {
            EyeState::Open
        } else {
            EyeState::Closed
        };

        let mouth = if e.mouth_open > OPEN_THRESHOLD {
            UserMouth::Open {
                height: 8.0 + e.mouth_open * 10.0,
            }
        } else if e.smiling > OPEN_THRESHOLD {
            UserMouth::Smile
        } else {
            UserMouth::Neutral
        };

        let tilt = e.head_tilt * 0.1;

        Self {
            eyes,
            mouth,
            brow_offset: e.eyebrows_raised * 10.0,
            tilt: (tilt.abs() > TILT_DEADBAND).then_some(tilt),
        }
    }
}

/// Full redraw of the user avatar
pub fn draw_user_avatar(pose: &UserPose) -> Scene {
    let mut scene = Scene::new(USER_CANVAS_SIZE, USER_CANVAS_SIZE);

    scene.push(Shape::Circle {
        center: [0.0, 0.0],
        radius: FACE_RADIUS,
        color: colors::USER_SKIN,
    });

    for side in [-1.0, 1.0] {
        let x = side * EYE_X;
        match pose.eyes {
            EyeState::Open => scene.push(Shape::Circle {
                center: [x, EYE_Y],
                radius: EYE_RADIUS,
                color: colors::BLACK,
            }),
            EyeState::Closed => scene.push(Shape::Line {
                from: [x - 8.0, EYE_Y],
                to: [x + 8.0, EYE_Y],
                width: 3.0,
                color: colors::BLACK,
            }),
        }
    }

    let brow_y = BROW_Y - pose.brow_offset;
    for side in [-1.0, 1.0] {
        scene.push(Shape::Line {
            from: [side * 35.0, brow_y],
            to: [side * 15.0, brow_y],
            width: 4.0,
            color: colors::SADDLE_BROWN,
        });
    }

    scene.push(Shape::Ellipse {
        center: [0.0, 5.0],
        rx: 6.0,
        ry: 8.0,
        color: colors::USER_NOSE,
    });

    scene.push(match pose.mouth {
        UserMouth::Open { height } => Shape::Ellipse {
            center: [0.0, MOUTH_Y],
            rx: 12.0,
            ry: height,
            color: colors::MOUTH_RED,
        },
        UserMouth::Smile => Shape::Arc {
            center: [0.0, MOUTH_Y - 20.0],
            radius: 25.0,
            start: 0.2 * PI,
            end: 0.8 * PI,
            width: 3.0,
            color: colors::BLACK,
        },
        UserMouth::Neutral => Shape::Line {
            from: [-15.0, MOUTH_Y],
            to: [15.0, MOUTH_Y],
            width: 3.0,
            color: colors::BLACK,
        },
    });

    match pose.tilt {
        Some(tilt) => scene.rotated(tilt),
        None => scene,
    }
}
