//! Horizontal steering policies.
//!
//! Two policies share one [`MotionState`] shape:
//!
//! - **free-input**: the player-feel policy. Velocity is steered in the
//!   agent's local frame with independent forward/strafe axes, separate
//!   grounded/air acceleration rates, per-axis clamping, optional sprint on
//!   the forward axis only, and a dedicated deceleration ramp when input
//!   drops inside the deadzone.
//! - **pursuit**: the goal-seeking policy. While the target is inside the
//!   detection range and beyond the stopping distance, velocity points at
//!   the target at full speed with no ramp, and the heading slerps toward
//!   the chase direction. Otherwise velocity is zeroed immediately.
//!
//! Everything here is pure math over `&mut MotionState`; the systems in
//! [`crate::executor`] drive these functions once per agent per tick.

use bevy::prelude::*;

use crate::config::AgentConfig;
use crate::intent::MoveIntent;
use crate::state::MotionState;

/// Horizontal velocity expressed in the agent's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalVelocity {
    /// Speed along the heading (+forward, −backward).
    pub forward: f32,
    /// Speed across the heading (+right, −left).
    pub strafe: f32,
}

/// Step `current` toward `target` by at most `max_delta`, landing exactly
/// on the target once the remaining distance fits in one step.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(delta)
    }
}

/// Convert a ground-plane velocity into the agent's local frame by
/// inverse-rotating through the heading. Forward is the heading's `-Z`.
#[inline]
pub fn world_to_local(orientation: Quat, world: Vec2) -> LocalVelocity {
    let v = orientation.inverse() * Vec3::new(world.x, 0.0, world.y);
    LocalVelocity {
        forward: -v.z,
        strafe: v.x,
    }
}

/// Convert a local-frame velocity back into the ground plane.
#[inline]
pub fn local_to_world(orientation: Quat, local: LocalVelocity) -> Vec2 {
    let v = orientation * Vec3::new(local.strafe, 0.0, -local.forward);
    Vec2::new(v.x, v.z)
}

/// Free-input steering: one tick of the player-feel policy.
///
/// Writes the next horizontal velocity into `state`. See the module docs
/// for the shape of the policy; the per-axis independence (acceleration
/// step and clamp both run on forward and strafe separately) is the point,
/// not an implementation detail.
pub fn steer_free(state: &mut MotionState, config: &AgentConfig, intent: &MoveIntent, dt: f32) {
    let mut local = world_to_local(state.orientation, state.horizontal);

    let accel = if state.grounded {
        config.acceleration
    } else {
        config.air_acceleration
    };

    if intent.is_active() {
        let sprinting = config.sprint_enabled
            && intent.sprint
            && state.grounded
            && intent.forward_active();
        let forward_max = if sprinting {
            config.max_forward_speed * config.sprint_multiplier
        } else {
            config.max_forward_speed
        };

        let step = accel * dt;
        local.forward = move_towards(local.forward, intent.axis.y * forward_max, step);
        local.strafe = move_towards(local.strafe, intent.axis.x * config.max_sideways_speed, step);

        // Per-axis bounds; sprint widens only the forward axis.
        local.forward = local.forward.clamp(-forward_max, forward_max);
        local.strafe = local
            .strafe
            .clamp(-config.max_sideways_speed, config.max_sideways_speed);
    } else if config.deceleration_enabled {
        // Airborne agents keep their horizontal velocity: no air friction.
        if state.grounded {
            let step = config.deceleration * dt;
            local.forward = move_towards(local.forward, 0.0, step);
            local.strafe = move_towards(local.strafe, 0.0, step);
        }
    } else {
        // Ramp-free variant: zero input is just another target velocity.
        let step = accel * dt;
        local.forward = move_towards(local.forward, 0.0, step);
        local.strafe = move_towards(local.strafe, 0.0, step);
    }

    state.horizontal = local_to_world(state.orientation, local);
}

/// Pursuit steering: one tick of the goal-seeking policy.
///
/// `self_pos` and `target_pos` are world positions; range checks use the
/// full 3D distance, the chase direction is flattened into the ground
/// plane. Out of range or inside the stopping distance, velocity is zeroed
/// with no ramp and the heading is left alone.
pub fn steer_pursuit(
    state: &mut MotionState,
    config: &AgentConfig,
    self_pos: Vec3,
    target_pos: Vec3,
    dt: f32,
) {
    let delta = target_pos - self_pos;
    let distance = delta.length();

    if distance > config.detection_range || distance <= config.stopping_distance {
        state.horizontal = Vec2::ZERO;
        return;
    }

    let direction = Vec3::new(delta.x, 0.0, delta.z).normalize_or_zero();
    if direction == Vec3::ZERO {
        // Directly above or below the target: nowhere to go horizontally.
        state.horizontal = Vec2::ZERO;
        return;
    }

    state.horizontal = Vec2::new(direction.x, direction.z) * config.max_forward_speed;

    let facing = Quat::from_rotation_arc(Vec3::NEG_Z, direction);
    let t = (config.rotation_speed * dt).clamp(0.0, 1.0);
    state.orientation = state.orientation.slerp(facing, t);
}
