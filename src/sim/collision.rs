//! Collision checks for the arcade physics model
//!
//! Platforms are solid from the top only: a support test checks the player's
//! horizontal position against the platform footprint and a vertical band
//! around the top surface. There is no wall or underside collision - that is
//! the intended feel, not a missing feature.

use glam::Vec3;

use super::state::{GoalPad, Platform};
use crate::consts::*;
use crate::horizontal_distance;

/// Top-surface support test.
///
/// Returns the top-surface height if `pos` is over the platform's (animated)
/// footprint and the capsule's feet (`pos.y - PLAYER_CLEARANCE`) sit within
/// the landing band `[top - 1.5, top + 0.2]`. Measuring at the feet keeps the
/// resting height inside the band, so the grounded flag is stable frame to
/// frame. The caller is responsible for only landing while descending
/// (`vel.y <= 0`).
pub fn platform_support(platform: &Platform, pos: Vec3) -> Option<f32> {
    let center = platform.position();
    let within_x = (pos.x - center.x).abs() < platform.half_x;
    let within_z = (pos.z - center.z).abs() < platform.half_z;
    if !within_x || !within_z {
        return None;
    }

    let top = platform.top();
    let feet = pos.y - PLAYER_CLEARANCE;
    if feet <= top + LAND_BAND_ABOVE && feet >= top - LAND_BAND_BELOW {
        Some(top)
    } else {
        None
    }
}

/// Sphere proximity test (hazards, pickups)
#[inline]
pub fn within_radius(a: Vec3, b: Vec3, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Goal pad test: within horizontal tolerance and level with or above the
/// pad, inside the vertical tolerance band
pub fn reached_goal(goal: &GoalPad, pos: Vec3) -> bool {
    horizontal_distance(pos, goal.pos) < GOAL_TOLERANCE_XZ
        && pos.y >= goal.pos.y
        && pos.y <= goal.pos.y + GOAL_TOLERANCE_Y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::MotionAxis;
    use proptest::prelude::*;

    fn platform_at(y: f32) -> Platform {
        Platform::new(Vec3::new(0.0, y, 0.0), 1.6, 1.6)
    }

    #[test]
    fn support_inside_footprint_and_band() {
        let p = platform_at(3.2); // top at 3.5
        assert_eq!(platform_support(&p, Vec3::new(0.5, 3.6, -0.5)), Some(3.5));
        // Resting height stays supported
        assert_eq!(platform_support(&p, Vec3::new(0.0, 4.35, 0.0)), Some(3.5));
        // Feet above the band
        assert_eq!(platform_support(&p, Vec3::new(0.5, 4.6, -0.5)), None);
        // Deep below the band
        assert_eq!(platform_support(&p, Vec3::new(0.5, 1.5, -0.5)), None);
    }

    #[test]
    fn support_misses_outside_footprint() {
        let p = platform_at(3.2);
        assert_eq!(platform_support(&p, Vec3::new(1.7, 3.5, 0.0)), None);
        assert_eq!(platform_support(&p, Vec3::new(0.0, 3.5, -1.7)), None);
    }

    #[test]
    fn support_uses_animated_position() {
        let mut p = platform_at(3.2).moving(MotionAxis::X, 2.0, 1.0);
        p.animate(std::f32::consts::FRAC_PI_2); // offset = +2
        // Old footprint no longer supports
        assert_eq!(platform_support(&p, Vec3::new(0.0, 3.5, 0.0)), None);
        // New footprint does
        assert_eq!(platform_support(&p, Vec3::new(2.0, 3.5, 0.0)), Some(3.5));
    }

    #[test]
    fn goal_requires_height_and_horizontal_tolerance() {
        let goal = GoalPad {
            pos: Vec3::new(10.0, 20.0, 0.0),
        };
        assert!(reached_goal(&goal, Vec3::new(10.5, 20.4, 0.3)));
        // Below the pad
        assert!(!reached_goal(&goal, Vec3::new(10.0, 19.5, 0.0)));
        // Too far above
        assert!(!reached_goal(&goal, Vec3::new(10.0, 21.5, 0.0)));
        // Too far sideways
        assert!(!reached_goal(&goal, Vec3::new(12.0, 20.4, 0.0)));
    }

    proptest! {
        /// Landing geometry holds for arbitrary platform sizes and positions:
        /// any point over the footprint inside the band is supported at the
        /// platform's top surface.
        #[test]
        fn support_holds_for_all_platform_sizes(
            px in -50.0f32..50.0,
            py in -10.0f32..200.0,
            pz in -50.0f32..50.0,
            half_x in 0.2f32..8.0,
            half_z in 0.2f32..8.0,
            frac_x in -0.99f32..0.99,
            frac_z in -0.99f32..0.99,
            dy in -1.49f32..0.19,
        ) {
            let p = Platform::new(Vec3::new(px, py, pz), half_x, half_z);
            // dy offsets the feet within the band
            let pos = Vec3::new(
                px + frac_x * half_x,
                p.top() + PLAYER_CLEARANCE + dy,
                pz + frac_z * half_z,
            );
            prop_assert_eq!(platform_support(&p, pos), Some(p.top()));
        }

        /// Points clear of the footprint are never supported
        #[test]
        fn no_support_outside_footprint(
            half_x in 0.2f32..8.0,
            half_z in 0.2f32..8.0,
            excess in 0.01f32..10.0,
            y in -2.0f32..2.0,
        ) {
            let p = Platform::new(Vec3::ZERO, half_x, half_z);
            let pos = Vec3::new(half_x + excess, y, 0.0);
            prop_assert_eq!(platform_support(&p, pos), None);
        }
    }
}
