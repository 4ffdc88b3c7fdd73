//! Follow camera
//!
//! A pure function of player position: exponential smoothing toward an
//! offset behind and above the player. The camera never feeds back into
//! physics.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Target offset from the player (behind on +z, above on +y)
const FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, 2.8, 7.4);
/// Per-frame smoothing factor toward the target
const SMOOTHING: f32 = 0.08;
/// Look-at point is slightly above the capsule center
const LOOK_HEIGHT: f32 = 0.7;

/// Smoothed chase camera state
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraRig {
    pub pos: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            pos: Vec3::new(0.0, 3.2, 8.0),
        }
    }
}

impl CameraRig {
    /// Ease toward the follow offset behind/above the player
    pub fn follow(&mut self, player_pos: Vec3) {
        let target = player_pos + FOLLOW_OFFSET;
        self.pos += (target - self.pos) * SMOOTHING;
    }

    /// Point the camera should look at
    pub fn look_target(&self, player_pos: Vec3) -> Vec3 {
        player_pos + Vec3::new(0.0, LOOK_HEIGHT, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_converges_on_follow_offset() {
        let mut rig = CameraRig::default();
        let player = Vec3::new(10.0, 50.0, -5.0);
        for _ in 0..500 {
            rig.follow(player);
        }
        let target = player + FOLLOW_OFFSET;
        assert!((rig.pos - target).length() < 0.01);
    }

    #[test]
    fn camera_moves_a_fraction_per_frame() {
        let mut rig = CameraRig::default();
        let start = rig.pos;
        let player = Vec3::new(0.0, 100.0, 0.0);
        rig.follow(player);
        let moved = (rig.pos - start).length();
        let full = (player + FOLLOW_OFFSET - start).length();
        assert!((moved / full - SMOOTHING).abs() < 1e-4);
    }
}
