//! Game state and core simulation types
//!
//! Everything the per-frame step mutates lives here. The state is
//! single-owner: the host owns one `GameState`, calls `step` on it once per
//! frame, and reads it back for rendering. No globals, no interior mutability.

use glam::Vec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level;
use crate::consts::*;
use crate::spawn_point;

/// Pcg32 stream selector for modifier event rolls
const EVENT_STREAM: u64 = 0xa02b_dbf7_bb3c_59b5;
/// Pcg32 stream selector for fake-platform pass-through rolls
const CRUMBLE_STREAM: u64 = 0x5851_f42d_4c95_7f2d;

/// Which variant of the game is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Climb as high as possible; random modifier events; fall resets to spawn
    FreeRoam,
    /// Timed run to a fixed goal pad; fall restarts the whole run
    Race,
}

/// Axis a moving platform oscillates along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionAxis {
    X,
    Z,
}

/// Oscillation parameters for a moving platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Oscillation {
    pub axis: MotionAxis,
    pub amplitude: f32,
    pub speed: f32,
}

/// A platform the player can land on
///
/// Only the top surface is solid; see `collision`. The base position never
/// changes after level build - moving platforms store their current
/// wall-clock-driven offset separately so there is no per-frame drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub base: Vec3,
    /// Half-extent along x
    pub half_x: f32,
    /// Half-extent along z
    pub half_z: f32,
    pub motion: Option<Oscillation>,
    /// Crumbling platform: may let the player fall through (free-roam)
    pub fake: bool,
    /// Current oscillation offset along `motion.axis`
    #[serde(default)]
    pub offset: f32,
}

impl Platform {
    pub fn new(base: Vec3, half_x: f32, half_z: f32) -> Self {
        Self {
            base,
            half_x,
            half_z,
            motion: None,
            fake: false,
            offset: 0.0,
        }
    }

    pub fn moving(mut self, axis: MotionAxis, amplitude: f32, speed: f32) -> Self {
        self.motion = Some(Oscillation {
            axis,
            amplitude,
            speed,
        });
        self
    }

    pub fn crumbling(mut self) -> Self {
        self.fake = true;
        self
    }

    /// Current position including the oscillation offset
    pub fn position(&self) -> Vec3 {
        match self.motion.map(|m| m.axis) {
            Some(MotionAxis::X) => Vec3::new(self.base.x + self.offset, self.base.y, self.base.z),
            Some(MotionAxis::Z) => Vec3::new(self.base.x, self.base.y, self.base.z + self.offset),
            None => self.base,
        }
    }

    /// Height of the walkable top surface
    #[inline]
    pub fn top(&self) -> f32 {
        self.base.y + PLATFORM_HALF_HEIGHT
    }

    /// Advance the oscillation from wall-clock elapsed time
    pub fn animate(&mut self, elapsed: f32) {
        if let Some(m) = self.motion {
            self.offset = m.amplitude * (elapsed * m.speed).sin();
        }
    }

    /// Render opacity: fake platforms flicker, everything else is solid
    pub fn opacity(&self, elapsed: f32) -> f32 {
        if self.fake {
            0.55 + (elapsed * 4.0 + self.base.y).sin() * 0.25
        } else {
            1.0
        }
    }
}

/// A spinning torus that knocks the player back on proximity (free-roam)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub pos: Vec3,
    pub spin_rate: f32,
    /// Accumulated spin angle (render-only)
    #[serde(default)]
    pub angle: f32,
}

/// Collectible aura orb (free-roam)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub pos: Vec3,
    pub spin_rate: f32,
    /// Accumulated spin angle (render-only)
    #[serde(default)]
    pub angle: f32,
}

/// Target volume ending a race run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalPad {
    pub pos: Vec3,
}

/// Timed global gameplay modifiers (free-roam)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    LowGravity,
    ReversedControls,
    IceFloor,
    SpeedBoost,
}

impl EventKind {
    /// HUD flash text for this event
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::LowGravity => "LOW GRAVITY",
            EventKind::ReversedControls => "REVERSE CONTROLS",
            EventKind::IceFloor => "ICE FLOOR",
            EventKind::SpeedBoost => "ZOOMIES",
        }
    }
}

/// The currently active modifier event and its countdown
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub kind: EventKind,
    pub remaining: f32,
}

/// The player capsule
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    pub vel: Vec3,
    pub grounded: bool,
}

impl Player {
    pub fn at_spawn() -> Self {
        Self {
            pos: spawn_point(),
            vel: Vec3::ZERO,
            grounded: false,
        }
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: GameMode,
    /// Run seed; fully determines the world and both RNG streams
    pub seed: u64,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub hazards: Vec<Hazard>,
    pub pickups: Vec<Pickup>,
    pub goal: Option<GoalPad>,

    /// Wall-clock seconds since session start; drives platform oscillation
    pub elapsed: f32,
    /// Race timer (seconds); stops when `finished`
    pub run_time: f32,
    /// Race: goal reached this run
    pub finished: bool,
    /// Free-roam: collected aura count
    pub aura: u32,
    /// Free-roam: best height this session (may start from persisted value)
    pub best_height: f32,
    /// Race: best finish time this session
    pub best_time: Option<f32>,

    // Modifier fields driven by the active event. Explicit so that a test
    // can observe that starting a new event fully restores defaults first.
    pub gravity: f32,
    pub speed_mult: f32,
    pub reverse: bool,
    pub ice: bool,
    pub event: Option<ActiveEvent>,

    // Separate RNG streams: collision randomness must not perturb event
    // scheduling (and vice versa) under a fixed seed.
    pub(crate) event_rng: Pcg32,
    pub(crate) crumble_rng: Pcg32,
}

impl GameState {
    /// New free-roam session: seeded random tower, hazards, pickups
    pub fn new_free_roam(seed: u64) -> Self {
        let tower = level::build_tower(seed);
        Self {
            mode: GameMode::FreeRoam,
            seed,
            player: Player::at_spawn(),
            platforms: tower.platforms,
            hazards: tower.hazards,
            pickups: tower.pickups,
            goal: None,
            elapsed: 0.0,
            run_time: 0.0,
            finished: false,
            aura: 0,
            best_height: 0.0,
            best_time: None,
            gravity: GRAVITY,
            speed_mult: 1.0,
            reverse: false,
            ice: false,
            event: None,
            event_rng: Pcg32::new(seed, EVENT_STREAM),
            crumble_rng: Pcg32::new(seed, CRUMBLE_STREAM),
        }
    }

    /// New race session: handcrafted course ending at a goal pad
    pub fn new_race(seed: u64) -> Self {
        let course = level::build_race_course();
        Self {
            mode: GameMode::Race,
            seed,
            player: Player::at_spawn(),
            platforms: course.platforms,
            hazards: Vec::new(),
            pickups: Vec::new(),
            goal: Some(course.goal),
            elapsed: 0.0,
            run_time: 0.0,
            finished: false,
            aura: 0,
            best_height: 0.0,
            best_time: None,
            gravity: GRAVITY,
            speed_mult: 1.0,
            reverse: false,
            ice: false,
            event: None,
            event_rng: Pcg32::new(seed, EVENT_STREAM),
            crumble_rng: Pcg32::new(seed, CRUMBLE_STREAM),
        }
    }

    /// Jump launch velocity for the current mode
    #[inline]
    pub fn jump_speed(&self) -> f32 {
        match self.mode {
            GameMode::FreeRoam => JUMP_SPEED,
            GameMode::Race => RACE_JUMP_SPEED,
        }
    }

    /// Fall threshold for the current mode
    #[inline]
    pub fn fall_threshold(&self) -> f32 {
        match self.mode {
            GameMode::FreeRoam => FALL_Y,
            GameMode::Race => RACE_FALL_Y,
        }
    }

    /// Height above spawn, floored at zero
    #[inline]
    pub fn current_height(&self) -> f32 {
        (self.player.pos.y - SPAWN_Y).max(0.0)
    }

    /// Restore all modifier fields to their defaults and clear the event
    pub fn reset_modifiers(&mut self) {
        self.gravity = GRAVITY;
        self.speed_mult = 1.0;
        self.reverse = false;
        self.ice = false;
        self.event = None;
    }

    /// Start a modifier event. Defaults are restored first so events are
    /// mutually exclusive: no field from a prior event survives.
    pub fn start_event(&mut self, kind: EventKind) {
        self.reset_modifiers();
        match kind {
            EventKind::LowGravity => self.gravity = LOW_GRAVITY,
            EventKind::ReversedControls => self.reverse = true,
            EventKind::IceFloor => self.ice = true,
            EventKind::SpeedBoost => self.speed_mult = SPEED_BOOST_MULT,
        }
        self.event = Some(ActiveEvent {
            kind,
            remaining: EVENT_DURATION,
        });
    }

    /// Free-roam fall or manual restart: player back to spawn, counters and
    /// modifiers cleared. The tower itself is untouched; the session continues.
    pub fn soft_reset(&mut self) {
        self.player = Player::at_spawn();
        self.aura = 0;
        self.reset_modifiers();
    }

    /// Race fall or manual restart: full run restart back to the start line
    pub fn restart_run(&mut self) {
        self.player = Player::at_spawn();
        self.run_time = 0.0;
        self.finished = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_position_follows_offset_axis() {
        let mut p =
            Platform::new(Vec3::new(2.0, 5.0, -1.0), 1.6, 1.6).moving(MotionAxis::X, 1.5, 1.0);
        p.animate(std::f32::consts::FRAC_PI_2); // sin == 1
        let pos = p.position();
        assert!((pos.x - 3.5).abs() < 1e-5);
        assert_eq!(pos.z, -1.0);

        let stat = Platform::new(Vec3::new(2.0, 5.0, -1.0), 1.6, 1.6);
        assert_eq!(stat.position(), stat.base);
    }

    #[test]
    fn platform_top_is_above_base() {
        let p = Platform::new(Vec3::new(0.0, 3.2, 0.0), 1.6, 1.6);
        assert!((p.top() - 3.5).abs() < 1e-6);
    }

    #[test]
    fn fake_platform_opacity_flickers_in_range() {
        let p = Platform::new(Vec3::ZERO, 1.6, 1.6).crumbling();
        for i in 0..100 {
            let o = p.opacity(i as f32 * 0.1);
            assert!((0.3..=0.8).contains(&o));
        }
        let solid = Platform::new(Vec3::ZERO, 1.6, 1.6);
        assert_eq!(solid.opacity(1.0), 1.0);
    }

    #[test]
    fn start_event_replaces_prior_event_fields() {
        let mut state = GameState::new_free_roam(7);
        state.start_event(EventKind::LowGravity);
        assert_eq!(state.gravity, LOW_GRAVITY);

        state.start_event(EventKind::ReversedControls);
        // Gravity restored to baseline before the new event applied
        assert_eq!(state.gravity, GRAVITY);
        assert!(state.reverse);
        assert!(!state.ice);
        assert_eq!(state.speed_mult, 1.0);
        assert_eq!(
            state.event.unwrap().kind,
            EventKind::ReversedControls
        );
    }

    #[test]
    fn soft_reset_clears_player_aura_and_modifiers() {
        let mut state = GameState::new_free_roam(7);
        state.player.pos = Vec3::new(3.0, 40.0, -2.0);
        state.player.vel = Vec3::new(1.0, -5.0, 1.0);
        state.aura = 9;
        state.start_event(EventKind::IceFloor);

        state.soft_reset();
        assert_eq!(state.player.pos, crate::spawn_point());
        assert_eq!(state.player.vel, Vec3::ZERO);
        assert_eq!(state.aura, 0);
        assert!(!state.ice);
        assert!(state.event.is_none());
    }

    #[test]
    fn restart_run_resets_timer_and_finish_flag() {
        let mut state = GameState::new_race(7);
        state.run_time = 12.5;
        state.finished = true;
        state.player.pos.y = -20.0;

        state.restart_run();
        assert_eq!(state.run_time, 0.0);
        assert!(!state.finished);
        assert_eq!(state.player.pos, crate::spawn_point());
    }

    #[test]
    fn same_seed_builds_same_tower() {
        let a = GameState::new_free_roam(42);
        let b = GameState::new_free_roam(42);
        assert_eq!(a.platforms.len(), b.platforms.len());
        for (pa, pb) in a.platforms.iter().zip(&b.platforms) {
            assert_eq!(pa.base, pb.base);
            assert_eq!(pa.fake, pb.fake);
        }
        assert_eq!(a.pickups.len(), b.pickups.len());
    }
}
