//! External impulse accumulator.
//!
//! Knockback and pushback forces do not touch an agent's locomotion
//! velocity directly. They accumulate here, contribute to the displacement
//! sum each tick, and decay toward zero over time. Keeping them separate is
//! what lets the locomotion policies clamp their own axes without eating
//! (or amplifying) collision responses.

use bevy::prelude::*;

/// Decaying external velocity contribution, one per agent.
///
/// Forces are scaled by the receiving agent's `pushback_resistance` on the
/// way in, and the whole vector is lerped toward zero once per tick. The
/// decay is a per-tick linear interpolation, not a true continuous
/// exponential; the approximation is intentional and matches the feel the
/// tuning values were authored against. Between consecutive ticks the
/// magnitude never increases unless [`ExternalImpulse::add`] ran.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct ExternalImpulse {
    velocity: Vec3,
}

impl ExternalImpulse {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current impulse velocity contribution.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Accumulate an external force, scaled by this agent's resistance.
    ///
    /// May be called any number of times within a tick, by the agent itself
    /// or by another agent's collision response. Additions take effect on
    /// the next displacement call, never retroactively.
    pub fn add(&mut self, force: Vec3, resistance: f32) {
        self.velocity += force * resistance;
    }

    /// Decay one step toward zero: `lerp(velocity, 0, rate · dt)`.
    ///
    /// Runs exactly once per agent per tick. The interpolation factor is
    /// clamped to 1 so oversized `rate · dt` products stop at zero instead
    /// of overshooting into the opposite direction.
    pub fn decay(&mut self, rate: f32, dt: f32) {
        let t = (rate * dt).clamp(0.0, 1.0);
        self.velocity = self.velocity.lerp(Vec3::ZERO, t);
    }

    /// Whether the accumulated impulse is effectively spent.
    pub fn is_negligible(&self) -> bool {
        self.velocity.length_squared() < 1e-8
    }
}
