//! Displacement backend seam.
//!
//! The controller never moves transforms or detects overlaps itself. It
//! computes velocities and hands the resulting displacement to a backend,
//! which owns collision resolution and reports back what happened. This is
//! the only place the crate touches spatial queries, so swapping physics
//! engines means implementing one trait.

use bevy::prelude::*;

use crate::contact::ContactEvent;

/// Result of one displacement call.
#[derive(Debug, Default)]
pub struct MoveOutcome {
    /// Whether the agent ended the move on walkable ground.
    pub grounded: bool,
    /// Every entity the agent touched while moving, floor included.
    pub contacts: Vec<ContactEvent>,
}

/// Spatial backend the controller drives.
///
/// Implementations are zero-sized dispatch types; per-world state lives in
/// resources and components their [`DisplacementBackend::plugin`] installs.
pub trait DisplacementBackend: 'static + Send + Sync {
    /// The plugin that sets up whatever the backend needs in the app.
    fn plugin() -> impl Plugin;

    /// Displace `entity` by `translation`, resolving collisions along the
    /// way, and report the outcome.
    fn move_agent(world: &mut World, entity: Entity, translation: Vec3) -> MoveOutcome;

    /// Hand a continuous force to a dynamic body for this tick.
    fn apply_body_force(world: &mut World, entity: Entity, force: Vec3);

    /// The fixed timestep the simulation runs at. Falls back to 60 Hz when
    /// fixed time is unavailable or paused.
    fn fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|time| time.delta_secs())
            .filter(|&dt| dt > 0.0)
            .unwrap_or(1.0 / 60.0)
    }
}

/// Backend plugin that installs nothing. Useful for tests that drive
/// [`DisplacementBackend::move_agent`] by hand.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
