//! The per-frame simulation step
//!
//! `step` consumes the current input snapshot and a clamped dt, mutates the
//! state in place, and returns the events the host should surface (flash
//! notifications, persistence triggers). Side effects never feed back into
//! the physics.
//!
//! Order per frame: restart, event timers, platform animation, input,
//! jump, gravity, Euler integration, platform landing, hazards, pickups,
//! win/lose checks.

use rand::Rng;

use super::collision::{platform_support, reached_goal, within_radius};
use super::state::{EventKind, GameMode, GameState};
use crate::consts::*;
use crate::normalize_input;

/// Logical input state for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Strafe axis, -1..1 (positive = +x)
    pub move_x: f32,
    /// Forward/back axis, -1..1 (positive = +z, toward the camera)
    pub move_z: f32,
    pub jump: bool,
    pub sprint: bool,
    pub restart: bool,
}

/// Events produced by a step, for the host to display or persist
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepEvent {
    /// A modifier event started (free-roam)
    EventStarted(EventKind),
    /// Hazard knockback applied
    Knockback,
    /// Aura pickup collected; carries the new total
    AuraCollected { total: u32 },
    /// New session best height reached (free-roam); persist it
    NewBestHeight(f32),
    /// Player fell below the world; carries the session best
    /// (height in free-roam, finish time in race)
    Fell { best: f32 },
    /// Race finished; persist the time if `new_best`
    Finished { time: f32, new_best: bool },
    /// Manual or fall-triggered run restart completed
    Restarted,
}

/// Advance the simulation by one frame.
///
/// `dt` is clamped to [`MAX_DT`]; a stalled tab produces one short step, not
/// a catch-up burst.
pub fn step(state: &mut GameState, input: &FrameInput, dt: f32) -> Vec<StepEvent> {
    let dt = dt.clamp(0.0, MAX_DT);
    let mut events = Vec::new();

    // A restart wins over everything else this frame.
    if input.restart {
        match state.mode {
            GameMode::FreeRoam => state.soft_reset(),
            GameMode::Race => state.restart_run(),
        }
        events.push(StepEvent::Restarted);
        return events;
    }

    state.elapsed += dt;
    if state.mode == GameMode::Race && !state.finished {
        state.run_time += dt;
    }

    // Modifier event countdown / trigger roll (free-roam only). A new event
    // never starts on the same frame a prior one expires.
    if state.mode == GameMode::FreeRoam {
        if let Some(ev) = &mut state.event {
            ev.remaining -= dt;
            if ev.remaining <= 0.0 {
                state.reset_modifiers();
            }
        } else if state.event_rng.random::<f64>() < EVENT_CHANCE {
            let kind = match state.event_rng.random_range(0..4u8) {
                0 => EventKind::LowGravity,
                1 => EventKind::ReversedControls,
                2 => EventKind::IceFloor,
                _ => EventKind::SpeedBoost,
            };
            state.start_event(kind);
            events.push(StepEvent::EventStarted(kind));
        }
    }

    // Wall-clock-driven animation: no per-frame accumulation, no drift.
    let elapsed = state.elapsed;
    for platform in &mut state.platforms {
        platform.animate(elapsed);
    }
    for hazard in &mut state.hazards {
        hazard.angle += hazard.spin_rate * dt;
    }
    for pickup in &mut state.pickups {
        pickup.angle += pickup.spin_rate * dt;
    }

    // A finished race keeps the world animating but freezes the player.
    if state.finished {
        return events;
    }

    // Horizontal input. Reversed controls invert the direction sign.
    let (dir_x, dir_z) = normalize_input(input.move_x, input.move_z);
    let rev = if state.reverse { -1.0 } else { 1.0 };
    match state.mode {
        GameMode::FreeRoam => {
            let accel = MOVE_ACCEL * state.speed_mult;
            state.player.vel.x += dir_x * accel * dt * rev;
            state.player.vel.z += dir_z * accel * dt * rev;
            let friction = if state.ice {
                ICE_FRICTION
            } else if state.player.grounded {
                GROUND_FRICTION
            } else {
                AIR_FRICTION
            };
            state.player.vel.x *= friction;
            state.player.vel.z *= friction;
            if input.sprint {
                state.player.vel.x *= SPRINT_FACTOR;
                state.player.vel.z *= SPRINT_FACTOR;
            }
        }
        GameMode::Race => {
            state.player.vel.x += dir_x * MOVE_ACCEL * dt * rev;
            state.player.vel.z += dir_z * MOVE_ACCEL * dt * rev;
            let cap = if input.sprint {
                RACE_MAX_SPEED * RACE_SPRINT_MULT
            } else {
                RACE_MAX_SPEED
            };
            let speed =
                (state.player.vel.x * state.player.vel.x + state.player.vel.z * state.player.vel.z)
                    .sqrt();
            if speed > cap {
                let scale = cap / speed;
                state.player.vel.x *= scale;
                state.player.vel.z *= scale;
            }
            let drag = if state.player.grounded {
                RACE_GROUND_DRAG
            } else {
                RACE_AIR_DRAG
            };
            state.player.vel.x *= drag;
            state.player.vel.z *= drag;
        }
    }

    // Jump: grounded only. Airborne jump input is a no-op.
    if input.jump && state.player.grounded {
        state.player.vel.y = state.jump_speed();
        state.player.grounded = false;
    }

    // Gravity applies every frame regardless of state.
    state.player.vel.y -= state.gravity * dt;

    // Explicit Euler integration.
    state.player.pos += state.player.vel * dt;

    // Landing: only while descending. Fake platforms roll their own RNG
    // stream each contact frame and may give way.
    state.player.grounded = false;
    if state.player.vel.y <= 0.0 {
        for platform in &state.platforms {
            let Some(top) = platform_support(platform, state.player.pos) else {
                continue;
            };
            if platform.fake && state.crumble_rng.random_bool(CRUMBLE_CHANCE) {
                continue;
            }
            state.player.pos.y = top + PLAYER_CLEARANCE;
            state.player.vel.y = 0.0;
            state.player.grounded = true;
        }
    }

    if state.mode == GameMode::FreeRoam {
        // Hazard knockback: horizontal shove away from the hazard center
        // plus a guaranteed pop-up.
        for hazard in &state.hazards {
            if !within_radius(hazard.pos, state.player.pos, HAZARD_RADIUS) {
                continue;
            }
            let mut kx = state.player.pos.x - hazard.pos.x;
            let mut kz = state.player.pos.z - hazard.pos.z;
            if kx == 0.0 && kz == 0.0 {
                // Standing dead center: shove in a random direction
                kx = state.crumble_rng.random::<f32>() - 0.5;
                kz = state.crumble_rng.random::<f32>() - 0.5;
            }
            let mag = (kx * kx + kz * kz).sqrt().max(1e-4);
            state.player.vel.x += kx / mag * KNOCKBACK_IMPULSE;
            state.player.vel.z += kz / mag * KNOCKBACK_IMPULSE;
            state.player.vel.y = state.player.vel.y.max(KNOCKBACK_POP);
            events.push(StepEvent::Knockback);
        }

        // Aura collection
        let player_pos = state.player.pos;
        let before = state.pickups.len();
        state
            .pickups
            .retain(|p| !within_radius(p.pos, player_pos, PICKUP_RADIUS));
        for _ in 0..before - state.pickups.len() {
            state.aura += 1;
            events.push(StepEvent::AuraCollected { total: state.aura });
        }
    }

    // Win/lose checks.
    match state.mode {
        GameMode::FreeRoam => {
            let height = state.current_height();
            if height > state.best_height {
                state.best_height = height;
                events.push(StepEvent::NewBestHeight(height));
            }
            if state.player.pos.y < state.fall_threshold() {
                events.push(StepEvent::Fell {
                    best: state.best_height,
                });
                state.soft_reset();
            }
        }
        GameMode::Race => {
            if state.player.pos.y < state.fall_threshold() {
                events.push(StepEvent::Fell {
                    best: state.best_time.unwrap_or(0.0),
                });
                state.restart_run();
                events.push(StepEvent::Restarted);
            } else if let Some(goal) = &state.goal {
                if reached_goal(goal, state.player.pos) {
                    state.finished = true;
                    let time = state.run_time;
                    let new_best = state.best_time.is_none_or(|best| time < best);
                    if new_best {
                        state.best_time = Some(time);
                    }
                    events.push(StepEvent::Finished { time, new_best });
                }
            }
        }
    }

    events
}
