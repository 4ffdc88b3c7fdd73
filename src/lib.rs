//! Tower Rush - a browser 3D tower-climb / race platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state, levels)
//! - `camera`: Follow camera (pure function of player position)
//! - `bestscore`: Best height / best time persistence
//!
//! The simulation is deliberately arcade-style: top-surface-only platform
//! collision, explicit Euler integration, and per-frame multiplicative
//! friction. Rendering is external; the host consumes the state each frame.

pub mod bestscore;
pub mod camera;
pub mod sim;

pub use bestscore::BestScore;
pub use camera::CameraRig;

use glam::Vec3;

/// Game tuning constants
pub mod consts {
    /// Largest step the simulation will integrate (seconds). Frames longer
    /// than this (tab stall, debugger pause) are clamped, not subdivided.
    pub const MAX_DT: f32 = 0.033;

    /// Baseline downward acceleration
    pub const GRAVITY: f32 = 18.0;
    /// Low-gravity event value
    pub const LOW_GRAVITY: f32 = 8.0;
    /// Horizontal acceleration from input
    pub const MOVE_ACCEL: f32 = 18.0;
    /// Per-frame velocity retention while grounded
    pub const GROUND_FRICTION: f32 = 0.84;
    /// Per-frame velocity retention while airborne
    pub const AIR_FRICTION: f32 = 0.9;
    /// Per-frame velocity retention during the ice event (more slide)
    pub const ICE_FRICTION: f32 = 0.98;
    /// Per-frame horizontal boost while sprinting (free-roam)
    pub const SPRINT_FACTOR: f32 = 1.02;
    /// Speed-boost event multiplier on acceleration
    pub const SPEED_BOOST_MULT: f32 = 1.6;

    /// Jump launch velocity, free-roam
    pub const JUMP_SPEED: f32 = 8.6;
    /// Jump launch velocity, race (slightly floatier course)
    pub const RACE_JUMP_SPEED: f32 = 8.8;

    /// Race variant: horizontal speed cap
    pub const RACE_MAX_SPEED: f32 = 9.0;
    /// Race variant: sprint raises the cap by this factor
    pub const RACE_SPRINT_MULT: f32 = 1.35;
    /// Race variant: per-frame drag while grounded
    pub const RACE_GROUND_DRAG: f32 = 0.86;
    /// Race variant: per-frame drag while airborne
    pub const RACE_AIR_DRAG: f32 = 0.95;

    /// Player capsule rests this far above a platform's top surface
    pub const PLAYER_CLEARANCE: f32 = 0.85;
    /// Platform boxes are 0.6 tall; top surface is base.y + this
    pub const PLATFORM_HALF_HEIGHT: f32 = 0.3;
    /// Landing band above the top surface
    pub const LAND_BAND_ABOVE: f32 = 0.2;
    /// Landing band below the top surface (catches fast descents)
    pub const LAND_BAND_BELOW: f32 = 1.5;

    /// Player spawn height
    pub const SPAWN_Y: f32 = 1.2;
    /// Free-roam fall threshold
    pub const FALL_Y: f32 = -8.0;
    /// Race fall threshold (course dips lower than the tower base)
    pub const RACE_FALL_Y: f32 = -14.0;

    /// Modifier event duration (seconds)
    pub const EVENT_DURATION: f32 = 4.5;
    /// Per-frame chance of starting a modifier event when none is active
    pub const EVENT_CHANCE: f64 = 0.005;
    /// Chance a fake platform lets the player fall through on contact
    pub const CRUMBLE_CHANCE: f64 = 0.3;

    /// Hazard knockback trigger radius
    pub const HAZARD_RADIUS: f32 = 1.15;
    /// Hazard horizontal impulse magnitude
    pub const KNOCKBACK_IMPULSE: f32 = 8.0;
    /// Minimum upward velocity after a knockback (pop-up)
    pub const KNOCKBACK_POP: f32 = 5.0;
    /// Aura pickup collection radius
    pub const PICKUP_RADIUS: f32 = 0.9;

    /// Goal pad horizontal tolerance (race)
    pub const GOAL_TOLERANCE_XZ: f32 = 1.8;
    /// Goal pad vertical tolerance above pad height (race)
    pub const GOAL_TOLERANCE_Y: f32 = 1.2;

    /// Free-roam tower size
    pub const FLOOR_COUNT: u32 = 40;
    /// Vertical spacing between tower floors
    pub const FLOOR_SPACING: f32 = 6.0;
}

/// Player spawn position (shared by both modes)
#[inline]
pub fn spawn_point() -> Vec3 {
    Vec3::new(0.0, consts::SPAWN_Y, 0.0)
}

/// Horizontal (xz-plane) distance between two points
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Normalize an (x, z) input pair; vectors inside the unit circle pass through
#[inline]
pub fn normalize_input(x: f32, z: f32) -> (f32, f32) {
    let len = (x * x + z * z).sqrt();
    if len > 1.0 { (x / len, z / len) } else { (x, z) }
}
