//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped wall-clock dt, explicit Euler integration
//! - Seeded RNG only (separate streams for events and crumbling platforms)
//! - No rendering or platform dependencies
//!
//! The host calls `step(state, input, dt)` once per frame and renders from
//! the returned state; `StepEvent`s carry the side effects (notifications,
//! best-score persistence) out of the simulation.

pub mod collision;
pub mod level;
pub mod state;
pub mod step;

pub use collision::{platform_support, reached_goal, within_radius};
pub use level::{build_race_course, build_tower};
pub use state::{
    ActiveEvent, EventKind, GameMode, GameState, GoalPad, Hazard, MotionAxis, Oscillation, Pickup,
    Platform, Player,
};
pub use step::{FrameInput, StepEvent, step};
