//! Vertical velocity integration.
//!
//! One function, called once per agent per tick, in a fixed order: ground
//! stick, then jump launch, then the gravity step. The ordering matters: a
//! jump launched this tick does not receive a gravity step until the next
//! tick, and a grounded agent never accumulates fall speed while standing.

use crate::config::AgentConfig;
use crate::state::MotionState;

/// Small downward velocity held while grounded so the displacement call
/// keeps pressing the agent into the floor and the grounded flag stays
/// stable across slight ground unevenness.
pub const GROUND_STICK_VELOCITY: f32 = -2.0;

/// Launch velocity that peaks at `jump_height` under constant `gravity`,
/// from `v = sqrt(2 · g · h)`. Degenerate tuning yields zero rather than NaN.
#[inline]
pub fn jump_velocity(jump_height: f32, gravity: f32) -> f32 {
    (jump_height * -2.0 * gravity).max(0.0).sqrt()
}

/// Advance the vertical velocity by one tick.
///
/// Grounded with downward velocity clamps to [`GROUND_STICK_VELOCITY`]. A
/// jump request only launches while grounded; airborne requests are dropped,
/// not queued. Gravity then integrates unless the agent is grounded and
/// still descending (the stuck-to-floor case).
pub fn integrate(state: &mut MotionState, config: &AgentConfig, jump_requested: bool, dt: f32) {
    if state.grounded && state.vertical < 0.0 {
        state.vertical = GROUND_STICK_VELOCITY;
    }

    if jump_requested && state.grounded {
        state.vertical = jump_velocity(config.jump_height, config.gravity);
    }

    if !state.grounded || state.vertical >= 0.0 {
        state.vertical += config.gravity * dt;
    }
}
