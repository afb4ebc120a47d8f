//! Built-in kinematic displacement backend.
//!
//! A small hand-rolled spatial backend: agents are upright cylinders,
//! scenery is axis-aligned boxes, props are cylinders with a velocity and a
//! mass, and the ground is a flat plane. Overlaps are resolved by direct
//! push-out along the shallowest axis. It is deliberately simple (no
//! broadphase, no slopes, no stacking) but it is complete enough to run the
//! whole controller, response table included, without an external physics
//! engine.

use bevy::prelude::*;

use crate::backend::{DisplacementBackend, MoveOutcome};
use crate::contact::ContactEvent;
use crate::LocomotionSet;

/// Per-second damping applied to prop body velocity.
const PROP_DAMPING: f32 = 2.0;

/// Global parameters of the kinematic world.
#[derive(Resource, Reflect, Debug, Clone, Copy)]
#[reflect(Resource)]
pub struct KinematicWorld {
    /// Height of the flat ground plane.
    pub ground_height: f32,
}

impl Default for KinematicWorld {
    fn default() -> Self {
        Self { ground_height: 0.0 }
    }
}

/// Upright cylinder collider for agents and props. The entity's transform
/// translation is the cylinder center.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct AgentCollider {
    /// Cylinder radius in the ground plane.
    pub radius: f32,
    /// Half the cylinder height.
    pub half_height: f32,
}

impl Default for AgentCollider {
    fn default() -> Self {
        Self {
            radius: 0.5,
            half_height: 1.0,
        }
    }
}

/// Axis-aligned box collider for scenery, centered on the transform.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ObstacleCollider {
    /// Half-extents of the box on each axis.
    pub half_extents: Vec3,
}

/// A pushable prop: integrates its own velocity, takes body forces, and
/// bleeds speed off through damping. Pair with an [`AgentCollider`] so
/// agents can run into it.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct PropBody {
    /// Current velocity.
    pub velocity: Vec3,
    /// Mass used when converting body forces into acceleration.
    pub mass: f32,
}

impl Default for PropBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass: 1.0,
        }
    }
}

/// The built-in backend. Zero-sized; all state lives in the components and
/// resource above.
pub struct KinematicBackend;

pub struct KinematicBackendPlugin;

impl Plugin for KinematicBackendPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KinematicWorld>()
            .register_type::<KinematicWorld>()
            .register_type::<AgentCollider>()
            .register_type::<ObstacleCollider>()
            .register_type::<PropBody>()
            .add_systems(
                FixedUpdate,
                integrate_prop_bodies.in_set(LocomotionSet::Execute),
            );
    }
}

impl DisplacementBackend for KinematicBackend {
    fn plugin() -> impl Plugin {
        KinematicBackendPlugin
    }

    fn move_agent(world: &mut World, entity: Entity, translation: Vec3) -> MoveOutcome {
        let collider = match world.get::<AgentCollider>(entity).copied() {
            Some(collider) => collider,
            None => return MoveOutcome::default(),
        };
        let start = match world.get::<Transform>(entity) {
            Some(transform) => transform.translation,
            None => return MoveOutcome::default(),
        };

        let mut position = start + translation;
        let mut outcome = MoveOutcome::default();

        let others: Vec<(Entity, Vec3, AgentCollider)> = world
            .query::<(Entity, &Transform, &AgentCollider)>()
            .iter(world)
            .filter(|(other, _, _)| *other != entity)
            .map(|(other, transform, collider)| (other, transform.translation, *collider))
            .collect();
        for (other, other_pos, other_col) in others {
            resolve_cylinder(&mut position, collider, other, other_pos, other_col, &mut outcome);
        }

        let obstacles: Vec<(Entity, Vec3, ObstacleCollider)> = world
            .query::<(Entity, &Transform, &ObstacleCollider)>()
            .iter(world)
            .map(|(other, transform, collider)| (other, transform.translation, *collider))
            .collect();
        for (other, center, obstacle) in obstacles {
            resolve_box(&mut position, collider, other, center, obstacle, &mut outcome);
        }

        let ground_height = world
            .get_resource::<KinematicWorld>()
            .map(|kw| kw.ground_height)
            .unwrap_or(0.0);
        if position.y - collider.half_height <= ground_height {
            position.y = ground_height + collider.half_height;
            outcome.grounded = true;
        }

        if let Some(mut transform) = world.get_mut::<Transform>(entity) {
            transform.translation = position;
        }
        outcome
    }

    fn apply_body_force(world: &mut World, entity: Entity, force: Vec3) {
        let dt = Self::fixed_timestep(world);
        if let Some(mut body) = world.get_mut::<PropBody>(entity) {
            let mass = body.mass.max(f32::EPSILON);
            body.velocity += force * dt / mass;
        }
    }
}

/// Push `position` out of another cylinder, preferring a top landing when
/// the vertical penetration is the shallower escape.
fn resolve_cylinder(
    position: &mut Vec3,
    collider: AgentCollider,
    other: Entity,
    other_pos: Vec3,
    other_col: AgentCollider,
    outcome: &mut MoveOutcome,
) {
    let combined_radius = collider.radius + other_col.radius;
    let combined_half = collider.half_height + other_col.half_height;

    let dx = position.x - other_pos.x;
    let dz = position.z - other_pos.z;
    let horizontal = (dx * dx + dz * dz).sqrt();
    let dy = position.y - other_pos.y;

    if horizontal >= combined_radius || dy.abs() >= combined_half {
        return;
    }

    let horizontal_pen = combined_radius - horizontal;
    let vertical_pen = combined_half - dy.abs();

    if dy > 0.0 && vertical_pen < horizontal_pen {
        // Landed on top: escape upward and count it as ground support.
        position.y = other_pos.y + combined_half;
        outcome.grounded = true;
        outcome.contacts.push(ContactEvent {
            other,
            normal: Vec3::Y,
            point: Vec3::new(position.x, other_pos.y + other_col.half_height, position.z),
        });
        return;
    }

    let normal = if horizontal > 1e-6 {
        Vec3::new(dx / horizontal, 0.0, dz / horizontal)
    } else {
        Vec3::X
    };
    position.x = other_pos.x + normal.x * combined_radius;
    position.z = other_pos.z + normal.z * combined_radius;
    outcome.contacts.push(ContactEvent {
        other,
        normal,
        point: other_pos + normal * other_col.radius,
    });
}

/// Push `position` out of an axis-aligned box along the shallowest axis.
fn resolve_box(
    position: &mut Vec3,
    collider: AgentCollider,
    other: Entity,
    center: Vec3,
    obstacle: ObstacleCollider,
    outcome: &mut MoveOutcome,
) {
    let he = obstacle.half_extents;
    let bottom = position.y - collider.half_height;
    let top = position.y + collider.half_height;
    if bottom >= center.y + he.y || top <= center.y - he.y {
        return;
    }

    let closest_x = position.x.clamp(center.x - he.x, center.x + he.x);
    let closest_z = position.z.clamp(center.z - he.z, center.z + he.z);
    let dx = position.x - closest_x;
    let dz = position.z - closest_z;
    let dist_sq = dx * dx + dz * dz;
    if dist_sq >= collider.radius * collider.radius {
        return;
    }

    let vertical_pen = (center.y + he.y) - bottom;
    let inside = dist_sq < 1e-12;

    let (horizontal_pen, normal) = if inside {
        // Center is inside the footprint: escape along the closest face.
        let px = he.x + collider.radius - (position.x - center.x).abs();
        let pz = he.z + collider.radius - (position.z - center.z).abs();
        if px < pz {
            (px, Vec3::X * (position.x - center.x).signum())
        } else {
            (pz, Vec3::Z * (position.z - center.z).signum())
        }
    } else {
        let dist = dist_sq.sqrt();
        (
            collider.radius - dist,
            Vec3::new(dx / dist, 0.0, dz / dist),
        )
    };

    if vertical_pen < horizontal_pen && position.y > center.y {
        position.y = center.y + he.y + collider.half_height;
        outcome.grounded = true;
        outcome.contacts.push(ContactEvent {
            other,
            normal: Vec3::Y,
            point: Vec3::new(position.x, center.y + he.y, position.z),
        });
        return;
    }

    position.x += normal.x * horizontal_pen;
    position.z += normal.z * horizontal_pen;
    outcome.contacts.push(ContactEvent {
        other,
        normal,
        point: Vec3::new(closest_x, position.y, closest_z),
    });
}

/// Integrate prop bodies: advance by velocity, damp, stay above ground.
pub fn integrate_prop_bodies(
    time: Option<Res<Time<Fixed>>>,
    kinematic: Res<KinematicWorld>,
    mut props: Query<(&mut PropBody, &mut Transform, Option<&AgentCollider>)>,
) {
    let dt = time
        .map(|time| time.delta_secs())
        .filter(|&dt| dt > 0.0)
        .unwrap_or(1.0 / 60.0);

    for (mut body, mut transform, collider) in &mut props {
        transform.translation += body.velocity * dt;

        let half_height = collider.map(|c| c.half_height).unwrap_or(0.0);
        let floor = kinematic.ground_height + half_height;
        if transform.translation.y < floor {
            transform.translation.y = floor;
            body.velocity.y = body.velocity.y.max(0.0);
        }

        let damping = (PROP_DAMPING * dt).clamp(0.0, 1.0);
        let velocity = body.velocity;
        body.velocity = velocity.lerp(Vec3::ZERO, damping);
    }
}
