//! Palette shared by the avatar and chart scenes (sRGB-encoded 0-1 RGBA)

pub type Rgba = [f32; 4];

/// Same colour with a different alpha
pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], alpha]
}

/// Card background behind every canvas
pub const BACKGROUND: Rgba = [1.0, 1.0, 1.0, 1.0];
pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];

// ============================================================================
// AVATARS
// ============================================================================

/// #FFE0BD
pub const USER_SKIN: Rgba = [1.000, 0.878, 0.741, 1.0];
/// #FFD4A9
pub const USER_NOSE: Rgba = [1.000, 0.831, 0.663, 1.0];
/// #8B4513, user brows and AI hair/mouth
pub const SADDLE_BROWN: Rgba = [0.545, 0.271, 0.075, 1.0];
/// #8B0000, open mouths
pub const MOUTH_RED: Rgba = [0.545, 0.000, 0.000, 1.0];

/// #F5E6D3
pub const AI_SKIN: Rgba = [0.961, 0.902, 0.827, 1.0];
/// #4A5568
pub const AI_PUPIL: Rgba = [0.290, 0.333, 0.408, 1.0];
/// #654321
pub const AI_BROW: Rgba = [0.396, 0.263, 0.129, 1.0];
/// #E8D5C4
pub const AI_NOSE: Rgba = [0.910, 0.835, 0.769, 1.0];
/// #2D3748
pub const GLASSES: Rgba = [0.176, 0.216, 0.282, 1.0];

// ============================================================================
// CHART
// ============================================================================

/// #E2E8F0
pub const SPLIT_LINE: Rgba = [0.886, 0.910, 0.941, 1.0];
/// #CBD5E1
pub const AXIS_LINE: Rgba = [0.796, 0.835, 0.882, 1.0];
/// rgb(180, 53, 45), drawn at 5% / 10% alpha
pub const SPLIT_AREA: Rgba = [0.706, 0.208, 0.176, 1.0];
/// #059669
pub const SERIES: Rgba = [0.020, 0.588, 0.412, 1.0];
/// #F1F5F9, empty bar track and placeholder disc
pub const MUTED: Rgba = [0.945, 0.961, 0.976, 1.0];

pub const HAPPY: Rgba = [0.063, 0.725, 0.506, 1.0];
pub const SAD: Rgba = [0.231, 0.510, 0.965, 1.0];
pub const ANGRY: Rgba = [0.937, 0.267, 0.267, 1.0];
pub const FEARFUL: Rgba = [0.545, 0.361, 0.965, 1.0];
pub const SURPRISED: Rgba = [0.961, 0.620, 0.043, 1.0];
pub const NEUTRAL: Rgba = [0.420, 0.447, 0.502, 1.0];
