//! Agent locomotion core for grounded and airborne movement.
//!
//! A kinematic character controller for many agents at once: players driven
//! by input intents, hostiles driven by pursuit targets, and the pushable
//! props they knock around. The crate owns velocities, gravity, jumping,
//! knockback impulses, and the collision response table; actual spatial
//! resolution is delegated to a pluggable [`DisplacementBackend`].
//!
//! # Usage
//!
//! Add [`LocomotionPlugin`] parameterized over a backend, then spawn agents
//! from [`AgentBundle`]:
//!
//! ```no_run
//! use bevy::prelude::*;
//! use agent_locomotion::prelude::*;
//! use agent_locomotion::kinematic::KinematicBackend;
//!
//! App::new()
//!     .add_plugins((MinimalPlugins, TransformPlugin))
//!     .add_plugins(LocomotionPlugin::<KinematicBackend>::default())
//!     .run();
//! ```
//!
//! Each fixed tick runs the stages of [`LocomotionSet`] in order: steering,
//! gravity, impulse decay, displacement, collision response, marker sync.
//! Hosts write [`MoveIntent`] / [`PursuitTarget`] before the tick and read
//! [`MotionState`] after it.

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod contact;
pub mod executor;
pub mod gravity;
pub mod impulse;
pub mod intent;
pub mod kinematic;
pub mod locomotion;
pub mod response;
pub mod state;

pub use backend::{DisplacementBackend, MoveOutcome};
pub use config::{AgentConfig, ConfigError};
pub use contact::{ContactEvent, FrameContacts, ParticipantKind};
pub use impulse::ExternalImpulse;
pub use intent::{MoveIntent, PursuitTarget};
pub use state::{Airborne, Grounded, MotionState};

/// Commonly used items, for glob import.
pub mod prelude {
    pub use crate::backend::{DisplacementBackend, MoveOutcome};
    pub use crate::config::AgentConfig;
    pub use crate::contact::{ContactEvent, FrameContacts, ParticipantKind};
    pub use crate::impulse::ExternalImpulse;
    pub use crate::intent::{MoveIntent, PursuitTarget};
    pub use crate::state::{Airborne, Grounded, MotionState};
    pub use crate::{AgentBundle, LocomotionPlugin, LocomotionSet};
}

/// Stages of one fixed tick, chained in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    /// Horizontal steering (free input and pursuit).
    Locomotion,
    /// Gravity integration and jump launches.
    Integrate,
    /// External impulse decay.
    Decay,
    /// Displacement through the backend.
    Execute,
    /// Collision response dispatch.
    Respond,
    /// Grounded/airborne marker sync.
    StateSync,
}

/// The locomotion plugin, generic over the spatial backend.
pub struct LocomotionPlugin<B: DisplacementBackend> {
    _backend: PhantomData<B>,
}

impl<B: DisplacementBackend> Default for LocomotionPlugin<B> {
    fn default() -> Self {
        Self {
            _backend: PhantomData,
        }
    }
}

impl<B: DisplacementBackend> Plugin for LocomotionPlugin<B> {
    fn build(&self, app: &mut App) {
        app.register_type::<AgentConfig>()
            .register_type::<MotionState>()
            .register_type::<MoveIntent>()
            .register_type::<PursuitTarget>()
            .register_type::<ExternalImpulse>()
            .register_type::<ParticipantKind>()
            .register_type::<Grounded>()
            .register_type::<Airborne>();

        app.add_plugins(B::plugin());

        app.configure_sets(
            FixedUpdate,
            (
                LocomotionSet::Locomotion,
                LocomotionSet::Integrate,
                LocomotionSet::Decay,
                LocomotionSet::Execute,
                LocomotionSet::Respond,
                LocomotionSet::StateSync,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                (
                    executor::apply_free_locomotion,
                    executor::apply_pursuit_locomotion,
                )
                    .in_set(LocomotionSet::Locomotion),
                executor::integrate_gravity.in_set(LocomotionSet::Integrate),
                executor::decay_external_impulses.in_set(LocomotionSet::Decay),
                executor::execute_movement::<B>.in_set(LocomotionSet::Execute),
                executor::respond_to_contacts::<B>.in_set(LocomotionSet::Respond),
                executor::sync_state_markers.in_set(LocomotionSet::StateSync),
            ),
        );
    }
}

/// Everything an agent needs to participate in the simulation, minus the
/// transform and whatever collider the backend wants.
#[derive(Bundle, Default)]
pub struct AgentBundle {
    /// Tuning parameters.
    pub config: AgentConfig,
    /// Velocity and heading state.
    pub state: MotionState,
    /// Knockback accumulator.
    pub impulse: ExternalImpulse,
    /// Per-tick contact buffer.
    pub contacts: FrameContacts,
    /// Response dispatch kind.
    pub kind: ParticipantKind,
}

impl AgentBundle {
    /// A free-input player agent with default tuning. Pair with a
    /// [`MoveIntent`] so input reaches it.
    pub fn player() -> Self {
        Self {
            config: AgentConfig::player(),
            kind: ParticipantKind::Player,
            ..default()
        }
    }

    /// A goal-seeking hostile agent. Pair with a [`PursuitTarget`].
    pub fn hostile() -> Self {
        Self {
            config: AgentConfig::hostile(),
            kind: ParticipantKind::HostileNpc,
            ..default()
        }
    }
}
