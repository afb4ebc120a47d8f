//! Fixed-tick systems that drive the simulation.
//!
//! One tick runs, in order: locomotion steering, gravity integration,
//! impulse decay, displacement, collision response, marker sync. The order
//! is wired up in [`crate::LocomotionPlugin`]; every system here assumes it
//! runs exactly once per fixed tick.

use bevy::prelude::*;

use crate::backend::DisplacementBackend;
use crate::config::AgentConfig;
use crate::contact::{FrameContacts, ParticipantKind};
use crate::gravity;
use crate::impulse::ExternalImpulse;
use crate::intent::{MoveIntent, PursuitTarget};
use crate::locomotion;
use crate::response;
use crate::state::{Airborne, Grounded, MotionState};

fn fixed_dt(time: Option<Res<Time<Fixed>>>) -> f32 {
    time.map(|time| time.delta_secs())
        .filter(|&dt| dt > 0.0)
        .unwrap_or(1.0 / 60.0)
}

/// Steer every free-input agent toward its intent.
pub fn apply_free_locomotion(
    time: Option<Res<Time<Fixed>>>,
    mut agents: Query<(&mut MotionState, &AgentConfig, &MoveIntent)>,
) {
    let dt = fixed_dt(time);
    for (mut state, config, intent) in &mut agents {
        locomotion::steer_free(&mut state, config, intent, dt);
    }
}

/// Steer every pursuit agent toward its target.
///
/// A missing or despawned target degrades the agent to idle rather than
/// skipping the tick, so stale velocity never carries over.
pub fn apply_pursuit_locomotion(
    time: Option<Res<Time<Fixed>>>,
    mut agents: Query<(Entity, &mut MotionState, &AgentConfig, &PursuitTarget)>,
    transforms: Query<&Transform>,
) {
    let dt = fixed_dt(time);
    for (entity, mut state, config, pursuit) in &mut agents {
        let positions = pursuit.target.and_then(|target| {
            let self_pos = transforms.get(entity).ok()?.translation;
            let target_pos = transforms.get(target).ok()?.translation;
            Some((self_pos, target_pos))
        });
        match positions {
            Some((self_pos, target_pos)) => {
                locomotion::steer_pursuit(&mut state, config, self_pos, target_pos, dt);
            }
            None => {
                if pursuit.target.is_some() {
                    debug!("pursuit target of {entity} is gone, idling");
                }
                state.horizontal = Vec2::ZERO;
            }
        }
    }
}

/// Integrate vertical velocity and consume pending jump edges.
pub fn integrate_gravity(
    time: Option<Res<Time<Fixed>>>,
    mut agents: Query<(&mut MotionState, &AgentConfig, Option<&mut MoveIntent>)>,
) {
    let dt = fixed_dt(time);
    for (mut state, config, intent) in &mut agents {
        let jump_requested = intent.map(|mut i| i.consume_jump_edge()).unwrap_or(false);
        gravity::integrate(&mut state, config, jump_requested, dt);
    }
}

/// Decay every impulse accumulator one step toward zero.
///
/// Runs before displacement, so an impulse added during last tick's
/// collision response decays once before it ever moves the agent.
pub fn decay_external_impulses(
    time: Option<Res<Time<Fixed>>>,
    mut agents: Query<(&mut ExternalImpulse, &AgentConfig)>,
) {
    let dt = fixed_dt(time);
    for (mut impulse, config) in &mut agents {
        impulse.decay(config.pushback_decay, dt);
    }
}

/// Hand each agent's displacement to the backend and record the outcome.
///
/// Exclusive: the backend needs `&mut World` to resolve collisions against
/// every other collider while moving one agent.
pub fn execute_movement<B: DisplacementBackend>(world: &mut World) {
    let dt = B::fixed_timestep(world);

    let moves: Vec<(Entity, Vec3)> = world
        .query::<(Entity, &MotionState, &AgentConfig, Option<&ExternalImpulse>)>()
        .iter(world)
        .map(|(entity, state, config, impulse)| {
            let mut velocity = state.velocity3();
            if config.external_forces_enabled {
                if let Some(impulse) = impulse {
                    velocity += impulse.velocity();
                }
            }
            (entity, velocity * dt)
        })
        .collect();

    for (entity, translation) in moves {
        let outcome = B::move_agent(world, entity, translation);
        if let Some(mut state) = world.get_mut::<MotionState>(entity) {
            state.grounded = outcome.grounded;
        }
        if let Some(mut contacts) = world.get_mut::<FrameContacts>(entity) {
            contacts.replace(outcome.contacts);
        }
    }
}

/// Dispatch this tick's contacts through the response table.
///
/// Impulses written here land in the accumulators after this tick's decay
/// and displacement already ran, so they first move anyone on the next
/// tick. Floor support contacts are filtered out up front.
pub fn respond_to_contacts<B: DisplacementBackend>(world: &mut World) {
    struct PendingResponse {
        instigator: Entity,
        kind: ParticipantKind,
        position: Vec3,
        push_force: f32,
        contacts: Vec<crate::contact::ContactEvent>,
    }

    let mut pending: Vec<PendingResponse> = world
        .query::<(
            Entity,
            &Transform,
            &AgentConfig,
            &ParticipantKind,
            &mut FrameContacts,
        )>()
        .iter_mut(world)
        .map(
            |(entity, transform, config, kind, mut contacts)| PendingResponse {
                instigator: entity,
                kind: *kind,
                position: transform.translation,
                push_force: config.push_force,
                contacts: contacts.take(),
            },
        )
        .collect();

    for item in pending.drain(..) {
        for contact in item.contacts {
            if response::is_floor_contact(contact.normal) {
                continue;
            }

            let other_kind = world
                .get::<ParticipantKind>(contact.other)
                .copied()
                .unwrap_or_default();
            let other_pos = match world.get::<Transform>(contact.other) {
                Some(transform) => transform.translation,
                None => continue,
            };
            let Some(push) = response::push_direction(item.position, other_pos) else {
                continue;
            };

            let outcome = response::respond(item.kind, other_kind, item.push_force, push);

            if outcome.other_impulse != Vec3::ZERO {
                let resistance = world
                    .get::<AgentConfig>(contact.other)
                    .filter(|config| config.external_forces_enabled)
                    .map(|config| config.pushback_resistance);
                if let (Some(resistance), Some(mut impulse)) =
                    (resistance, world.get_mut::<ExternalImpulse>(contact.other))
                {
                    impulse.add(outcome.other_impulse, resistance);
                }
            }

            if outcome.body_force != Vec3::ZERO {
                B::apply_body_force(world, contact.other, outcome.body_force);
            }

            if outcome.self_impulse != Vec3::ZERO {
                let resistance = world
                    .get::<AgentConfig>(item.instigator)
                    .filter(|config| config.external_forces_enabled)
                    .map(|config| config.pushback_resistance);
                if let (Some(resistance), Some(mut impulse)) =
                    (resistance, world.get_mut::<ExternalImpulse>(item.instigator))
                {
                    impulse.add(outcome.self_impulse, resistance);
                }
            }
        }
    }
}

/// Mirror [`MotionState::grounded`] into the marker components.
pub fn sync_state_markers(
    mut commands: Commands,
    agents: Query<(Entity, &MotionState, Has<Grounded>, Has<Airborne>)>,
) {
    for (entity, state, has_grounded, has_airborne) in &agents {
        if state.grounded {
            if !has_grounded {
                commands.entity(entity).insert(Grounded).remove::<Airborne>();
            }
        } else if !has_airborne {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }
    }
}
