use serde::{Deserialize, Serialize};

use crate::constants::{
    DESIGN_GROUND_LINE, FRICTION, GRAVITY, MAX_FRAME_DELTA_MS, WORLD_HEIGHT, WORLD_WIDTH,
};

/// World-level tuning. Everything here can be overridden from a JSON file; missing
/// fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world_width: f32,
    pub world_height: f32,
    /// Y of the implicit floor. Stage layouts are shifted to sit on it.
    pub ground_line: f32,
    pub gravity: f32,
    pub friction: f32,
    pub max_frame_delta_ms: f32,
    /// 1-based.
    pub start_stage: usize,
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            ground_line: DESIGN_GROUND_LINE,
            gravity: GRAVITY,
            friction: FRICTION,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            start_stage: 1,
            seed: 0x5EED_1234,
        }
    }
}

impl GameConfig {
    /// Offset added to every authored y coordinate.
    #[inline]
    pub fn ground_offset(&self) -> f32 {
        self.ground_line - DESIGN_GROUND_LINE
    }

    #[inline]
    pub fn clamp_delta(&self, delta_ms: f32) -> f32 {
        if !delta_ms.is_finite() || delta_ms < 0.0 {
            return 0.0;
        }
        delta_ms.min(self.max_frame_delta_ms)
    }
}
