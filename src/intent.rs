//! Movement intent components.
//!
//! Intents carry the desired movement for the next tick. [`MoveIntent`] is
//! the free-input form (planar axis, sprint, jump) fed by whatever input
//! source the host uses; [`PursuitTarget`] is the goal-seeking form that
//! simply names the entity to chase. Input sampling itself is external to
//! this crate: hosts write intents before the fixed tick runs.

use bevy::prelude::*;

/// Input magnitudes below this are treated as "no input" and select the
/// deceleration branch of the free-input policy.
pub const INPUT_DEADZONE: f32 = 0.1;

/// Free-input movement intent, local to the agent's heading.
///
/// `axis.x` is strafe (+right), `axis.y` is forward. The vector is clamped
/// to unit length on write so diagonal input cannot exceed the per-axis
/// speed limits by more than the usual √2 projection.
///
/// Jump is edge-detected: set [`MoveIntent::jump_pressed`] every tick from
/// your input source, and the controller turns the false→true transition
/// into exactly one jump request.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct MoveIntent {
    /// Desired planar direction in the agent's local frame
    /// (x = strafe, y = forward), length ≤ 1.
    pub axis: Vec2,
    /// Whether the sprint modifier is held.
    pub sprint: bool,
    /// Whether the jump action is currently held.
    pub jump_pressed: bool,
    /// Previous tick's `jump_pressed`, for edge detection.
    jump_pressed_prev: bool,
}

impl MoveIntent {
    /// Create an empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the planar input axis. The vector is clamped to length 1.
    pub fn set_axis(&mut self, axis: Vec2) {
        self.axis = axis.clamp_length_max(1.0);
    }

    /// Set the sprint modifier state.
    pub fn set_sprint(&mut self, sprint: bool) {
        self.sprint = sprint;
    }

    /// Set the held state of the jump action. Call every tick; the rising
    /// edge is what triggers a jump.
    pub fn set_jump_pressed(&mut self, pressed: bool) {
        self.jump_pressed = pressed;
    }

    /// Whether the input axis is outside the deadzone.
    pub fn is_active(&self) -> bool {
        self.axis.length_squared() > INPUT_DEADZONE * INPUT_DEADZONE
    }

    /// Whether there is meaningful forward input (for sprint gating).
    pub fn forward_active(&self) -> bool {
        self.axis.y > INPUT_DEADZONE
    }

    /// Consume the jump edge: returns `true` exactly once per false→true
    /// transition of `jump_pressed`. Called once per tick by the gravity
    /// integration system.
    pub fn consume_jump_edge(&mut self) -> bool {
        let edge = self.jump_pressed && !self.jump_pressed_prev;
        self.jump_pressed_prev = self.jump_pressed;
        edge
    }

    /// Clear all input. Counts as a release for jump edge detection.
    pub fn clear(&mut self) {
        self.axis = Vec2::ZERO;
        self.sprint = false;
        self.jump_pressed = false;
        self.jump_pressed_prev = false;
    }
}

/// Goal reference for pursuit agents.
///
/// A missing target is not an error: the agent degrades to idle (zero
/// horizontal velocity, heading untouched) until a target is assigned.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct PursuitTarget {
    /// The entity to chase, if any.
    pub target: Option<Entity>,
}

impl PursuitTarget {
    /// Create a pursuit intent chasing the given entity.
    pub fn new(target: Entity) -> Self {
        Self {
            target: Some(target),
        }
    }

    /// Create an idle pursuit intent with no target.
    pub fn none() -> Self {
        Self::default()
    }

    /// Drop the current target.
    pub fn clear(&mut self) {
        self.target = None;
    }
}
