//! Agent tuning configuration.
//!
//! This module defines the immutable per-agent tuning data: speed limits,
//! acceleration rates, gravity/jump parameters, and the pushback (external
//! impulse) response parameters. A config is authored externally, validated
//! once at spawn time, and never mutated by the simulation.

use bevy::prelude::*;
use thiserror::Error;

/// Immutable tuning parameters for one agent.
///
/// Every field is read-only for the lifetime of the agent. Speeds and
/// acceleration rates are in world units per second (squared for rates),
/// `gravity` is a negative constant, and the pushback fields shape how the
/// agent reacts to external impulses.
///
/// # Required value ranges
///
/// The simulation does not defend against nonsensical tuning at runtime;
/// call [`AgentConfig::validate`] when the agent is configured:
///
/// - all speeds and acceleration rates ≥ 0
/// - `gravity` < 0
/// - `pushback_decay` > 0
/// - `pushback_resistance` in `[0, 1]`
/// - `sprint_multiplier` ≥ 1
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentConfig {
    // === Horizontal movement ===
    /// Maximum speed along the agent's local forward/back axis.
    /// Pursuit agents also use this as their flat approach speed.
    pub max_forward_speed: f32,
    /// Maximum speed along the agent's local strafe axis.
    pub max_sideways_speed: f32,
    /// Horizontal acceleration rate while grounded.
    pub acceleration: f32,
    /// Horizontal acceleration rate while airborne.
    pub air_acceleration: f32,
    /// Rate at which horizontal velocity decays toward zero when there is
    /// no input and the agent is grounded. Airborne agents keep their
    /// horizontal velocity until the next solid contact.
    pub deceleration: f32,

    // === Vertical movement ===
    /// Downward acceleration. Must be negative.
    pub gravity: f32,
    /// Apex height of a jump from flat ground, in world units.
    pub jump_height: f32,

    // === Pushback / external impulses ===
    /// Fraction of an incoming force that actually lands in this agent's
    /// impulse accumulator. 0 = immovable, 1 = takes the full force.
    pub pushback_resistance: f32,
    /// Per-second decay rate of the impulse accumulator.
    pub pushback_decay: f32,
    /// Base magnitude of the force this agent imparts on contact.
    pub push_force: f32,

    // === Pursuit (goal-seeking agents) ===
    /// Maximum distance at which a pursuit target is noticed.
    pub detection_range: f32,
    /// Minimum distance a pursuit agent keeps from its target before
    /// halting the approach.
    pub stopping_distance: f32,
    /// Turn rate used when slerping the heading toward the target.
    pub rotation_speed: f32,

    // === Free-input extras ===
    /// Forward speed limit multiplier while sprinting.
    pub sprint_multiplier: f32,

    // === Variant toggles ===
    /// Whether the sprint input has any effect.
    pub sprint_enabled: bool,
    /// Whether the impulse accumulator contributes to displacement and can
    /// be written to by collision response.
    pub external_forces_enabled: bool,
    /// Whether zero input selects the dedicated deceleration ramp. When
    /// false, zero input is approached like any other target velocity at
    /// the acceleration rate.
    pub deceleration_enabled: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_forward_speed: 25.0,
            max_sideways_speed: 8.0,
            acceleration: 50.0,
            air_acceleration: 10.0,
            deceleration: 25.0,

            gravity: -30.0,
            jump_height: 2.0,

            pushback_resistance: 0.3,
            pushback_decay: 5.0,
            push_force: 51.0,

            detection_range: 10.0,
            stopping_distance: 2.0,
            rotation_speed: 5.0,

            sprint_multiplier: 1.5,

            sprint_enabled: true,
            external_forces_enabled: true,
            deceleration_enabled: true,
        }
    }
}

impl AgentConfig {
    /// Create a config with the default player tuning.
    pub fn player() -> Self {
        Self::default()
    }

    /// Create a config tuned for a goal-seeking hostile agent.
    ///
    /// Approach speed is flat (no acceleration ramp is used by the pursuit
    /// policy), so only `max_forward_speed` matters horizontally.
    pub fn hostile() -> Self {
        Self {
            max_forward_speed: 5.0,
            sprint_enabled: false,
            ..default()
        }
    }

    /// Create a config for the stripped-down movement variant: no sprint,
    /// no external impulses, and no dedicated deceleration ramp.
    pub fn minimal() -> Self {
        Self {
            sprint_enabled: false,
            external_forces_enabled: false,
            deceleration_enabled: false,
            ..default()
        }
    }

    /// Builder: set forward and sideways speed limits.
    pub fn with_speed_limits(mut self, forward: f32, sideways: f32) -> Self {
        self.max_forward_speed = forward;
        self.max_sideways_speed = sideways;
        self
    }

    /// Builder: set grounded, airborne, and deceleration rates.
    pub fn with_rates(mut self, acceleration: f32, air_acceleration: f32, deceleration: f32) -> Self {
        self.acceleration = acceleration;
        self.air_acceleration = air_acceleration;
        self.deceleration = deceleration;
        self
    }

    /// Builder: set gravity and jump apex height.
    pub fn with_jump(mut self, gravity: f32, jump_height: f32) -> Self {
        self.gravity = gravity;
        self.jump_height = jump_height;
        self
    }

    /// Builder: set the pushback parameters.
    pub fn with_pushback(mut self, force: f32, resistance: f32, decay: f32) -> Self {
        self.push_force = force;
        self.pushback_resistance = resistance;
        self.pushback_decay = decay;
        self
    }

    /// Builder: set the pursuit envelope.
    pub fn with_pursuit(mut self, detection_range: f32, stopping_distance: f32, rotation_speed: f32) -> Self {
        self.detection_range = detection_range;
        self.stopping_distance = stopping_distance;
        self.rotation_speed = rotation_speed;
        self
    }

    /// Builder: set the sprint multiplier.
    pub fn with_sprint_multiplier(mut self, multiplier: f32) -> Self {
        self.sprint_multiplier = multiplier;
        self
    }

    /// Builder: enable or disable sprint.
    pub fn with_sprint_enabled(mut self, enabled: bool) -> Self {
        self.sprint_enabled = enabled;
        self
    }

    /// Builder: enable or disable external impulses.
    pub fn with_external_forces_enabled(mut self, enabled: bool) -> Self {
        self.external_forces_enabled = enabled;
        self
    }

    /// Builder: enable or disable the dedicated deceleration ramp.
    pub fn with_deceleration_enabled(mut self, enabled: bool) -> Self {
        self.deceleration_enabled = enabled;
        self
    }

    /// Check the config against the documented value ranges.
    ///
    /// Returns the first violation found. This is a configuration-time
    /// check; the simulation itself never validates mid-tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = [
            ("max_forward_speed", self.max_forward_speed),
            ("max_sideways_speed", self.max_sideways_speed),
            ("acceleration", self.acceleration),
            ("air_acceleration", self.air_acceleration),
            ("deceleration", self.deceleration),
            ("jump_height", self.jump_height),
            ("push_force", self.push_force),
            ("detection_range", self.detection_range),
            ("stopping_distance", self.stopping_distance),
            ("rotation_speed", self.rotation_speed),
        ];
        for (field, value) in rates {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeRate { field, value });
            }
        }
        if !(self.gravity < 0.0) {
            return Err(ConfigError::NonNegativeGravity(self.gravity));
        }
        if !(self.pushback_decay > 0.0) {
            return Err(ConfigError::NonPositiveDecay(self.pushback_decay));
        }
        if !(0.0..=1.0).contains(&self.pushback_resistance) {
            return Err(ConfigError::ResistanceOutOfRange(self.pushback_resistance));
        }
        if !(self.sprint_multiplier >= 1.0) {
            return Err(ConfigError::SprintMultiplierTooSmall(self.sprint_multiplier));
        }
        Ok(())
    }
}

/// A tuning value outside its documented range.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A speed, rate, or distance field is negative (or NaN).
    #[error("{field} must be non-negative, got {value}")]
    NegativeRate {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// Gravity must pull downward.
    #[error("gravity must be negative, got {0}")]
    NonNegativeGravity(f32),
    /// A decay rate of zero would make impulses permanent.
    #[error("pushback_decay must be positive, got {0}")]
    NonPositiveDecay(f32),
    /// Resistance is a fraction of incoming force.
    #[error("pushback_resistance must be within [0, 1], got {0}")]
    ResistanceOutOfRange(f32),
    /// Sprinting may never lower the speed limit.
    #[error("sprint_multiplier must be at least 1, got {0}")]
    SprintMultiplierTooSmall(f32),
}
