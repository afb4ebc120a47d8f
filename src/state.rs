//! Per-agent motion state and state marker components.
//!
//! [`MotionState`] is the mutable heart of an agent: its horizontal velocity
//! in the ground plane, its vertical velocity, the grounded flag reported by
//! the last displacement call, and its heading. The marker components mirror
//! the grounded flag for convenient query filtering.

use bevy::prelude::*;

/// Mutable motion state, one per agent, owned exclusively by that agent.
///
/// Horizontal velocity lives in the world ground plane: `horizontal.x` is
/// the world X component and `horizontal.y` is the world Z component.
/// Vertical velocity is kept as a separate scalar so gravity integration
/// and the locomotion policies never fight over the same axis.
///
/// `orientation` is the agent's heading and is expected to be a yaw-only
/// rotation about world Y. Free-input locomotion uses it to convert between
/// world space and the agent's forward/strafe frame; the pursuit policy
/// slerps it toward the chase direction.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct MotionState {
    /// Horizontal velocity in the ground plane (x = world X, y = world Z).
    pub horizontal: Vec2,
    /// Vertical velocity (world Y), negative while falling.
    pub vertical: f32,
    /// Whether the last displacement call ended on walkable ground.
    pub grounded: bool,
    /// Heading, yaw-only rotation about world Y.
    pub orientation: Quat,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            horizontal: Vec2::ZERO,
            vertical: 0.0,
            grounded: false,
            orientation: Quat::IDENTITY,
        }
    }
}

impl MotionState {
    /// Create a fresh state at rest, facing the default heading (-Z).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state at rest with the given heading.
    pub fn with_orientation(orientation: Quat) -> Self {
        Self {
            orientation,
            ..default()
        }
    }

    /// Create a state at rest facing yaw radians about world Y.
    pub fn facing(yaw: f32) -> Self {
        Self::with_orientation(Quat::from_rotation_y(yaw))
    }

    /// The horizontal velocity lifted into 3D (y = 0).
    #[inline]
    pub fn horizontal3(&self) -> Vec3 {
        Vec3::new(self.horizontal.x, 0.0, self.horizontal.y)
    }

    /// Full 3D velocity: horizontal plus the vertical component.
    #[inline]
    pub fn velocity3(&self) -> Vec3 {
        Vec3::new(self.horizontal.x, self.vertical, self.horizontal.y)
    }

    /// Current horizontal speed.
    #[inline]
    pub fn horizontal_speed(&self) -> f32 {
        self.horizontal.length()
    }

    /// Whether the agent is moving downward.
    #[inline]
    pub fn is_falling(&self) -> bool {
        !self.grounded && self.vertical < 0.0
    }
}

/// Marker component present while the agent's last displacement ended on
/// walkable ground. Mutually exclusive with [`Airborne`]; both are kept in
/// sync with [`MotionState::grounded`] by the plugin.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component present while the agent has no ground support.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;
