//! Collision response dispatch.
//!
//! Pure decision logic: given the two participants of a contact and the
//! instigator's push force, decide which impulses and body forces result.
//! The actual mutation (writing into impulse accumulators, forwarding body
//! forces to the backend) happens in [`crate::executor`].
//!
//! The coefficient table is asymmetric on purpose. Players shove hard and
//! barely recoil; hostiles bounce off each other gently and off scenery
//! gentler still. The numbers were tuned as a set and are not individually
//! meaningful.

use bevy::prelude::*;

use crate::contact::ParticipantKind;

/// Contacts whose normal points up more than this are floor support, not
/// collisions, and produce no response.
pub const FLOOR_NORMAL_THRESHOLD: f32 = 0.3;

/// Player self-recoil magnitude when shoving another agent or a body.
pub const PLAYER_SELF_RECOIL: f32 = 2.0;

/// Flat force a player imparts on a dynamic body, independent of the
/// player's push force.
pub const PLAYER_BODY_FORCE: f32 = 500.0;

/// Fraction of a hostile's push force it recoils with off a player.
pub const NPC_PLAYER_RECOIL_FACTOR: f32 = 0.25;

/// Symmetric factor for hostile-on-hostile shoves.
pub const NPC_NPC_FACTOR: f32 = 0.5;

/// Multiplier on a hostile's push force when shoving a dynamic body.
pub const NPC_BODY_FORCE_FACTOR: f32 = 10.0;

/// Fraction of a hostile's push force it recoils with off a body.
pub const NPC_BODY_RECOIL_FACTOR: f32 = 0.1;

/// Fraction of a hostile's push force it recoils with off static scenery.
pub const NPC_STATIC_RECOIL_FACTOR: f32 = 0.3;

/// Whether a contact normal represents walkable floor support.
#[inline]
pub fn is_floor_contact(normal: Vec3) -> bool {
    normal.y > FLOOR_NORMAL_THRESHOLD
}

/// Horizontal unit vector pointing from the instigator toward the other
/// participant. `None` when the two positions coincide in the ground plane
/// (stacked entities have no meaningful push direction).
#[inline]
pub fn push_direction(self_pos: Vec3, other_pos: Vec3) -> Option<Vec3> {
    let delta = Vec3::new(other_pos.x - self_pos.x, 0.0, other_pos.z - self_pos.z);
    let direction = delta.normalize_or_zero();
    (direction != Vec3::ZERO).then_some(direction)
}

/// Resolved outcome of one contact, from the instigator's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContactResponse {
    /// Force fed into the instigator's own impulse accumulator.
    pub self_impulse: Vec3,
    /// Force fed into the other agent's impulse accumulator.
    pub other_impulse: Vec3,
    /// Force handed to the displacement backend for a dynamic body.
    pub body_force: Vec3,
}

/// Dispatch one contact through the coefficient table.
///
/// `push` is the horizontal unit vector from the instigator toward the
/// other participant; `push_force` is the instigator's configured base
/// force. Pairings absent from the table (anything instigated by a body or
/// scenery, player against scenery) return an all-zero response.
pub fn respond(
    self_kind: ParticipantKind,
    other_kind: ParticipantKind,
    push_force: f32,
    push: Vec3,
) -> ContactResponse {
    use ParticipantKind::*;

    match (self_kind, other_kind) {
        (Player, HostileNpc) => ContactResponse {
            other_impulse: push * push_force,
            self_impulse: -push * PLAYER_SELF_RECOIL,
            ..default()
        },
        (Player, DynamicBody) => ContactResponse {
            body_force: push * PLAYER_BODY_FORCE,
            self_impulse: -push * PLAYER_SELF_RECOIL,
            ..default()
        },
        (HostileNpc, Player) => ContactResponse {
            other_impulse: push * push_force,
            self_impulse: -push * push_force * NPC_PLAYER_RECOIL_FACTOR,
            ..default()
        },
        (HostileNpc, HostileNpc) => ContactResponse {
            other_impulse: push * push_force * NPC_NPC_FACTOR,
            self_impulse: -push * push_force * NPC_NPC_FACTOR,
            ..default()
        },
        (HostileNpc, DynamicBody) => ContactResponse {
            body_force: push * push_force * NPC_BODY_FORCE_FACTOR,
            self_impulse: -push * push_force * NPC_BODY_RECOIL_FACTOR,
            ..default()
        },
        (HostileNpc, Static) => ContactResponse {
            self_impulse: -push * push_force * NPC_STATIC_RECOIL_FACTOR,
            ..default()
        },
        _ => ContactResponse::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn floor_contacts_are_filtered_by_normal() {
        assert!(is_floor_contact(Vec3::Y));
        assert!(is_floor_contact(Vec3::new(0.5, 0.8, 0.0)));
        // A wall hit and a ceiling hit are both collisions.
        assert!(!is_floor_contact(Vec3::X));
        assert!(!is_floor_contact(Vec3::NEG_Y));
        // Exactly at the threshold still counts as a wall.
        assert!(!is_floor_contact(Vec3::new(0.0, 0.3, 1.0)));
    }

    #[test]
    fn push_direction_is_horizontal_and_unit() {
        let push = push_direction(Vec3::ZERO, Vec3::new(3.0, 5.0, 4.0));
        let push = push.unwrap();
        assert_eq!(push.y, 0.0);
        assert_relative_eq!(push.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(push.x, 0.6, epsilon = 1e-6);
        assert_relative_eq!(push.z, 0.8, epsilon = 1e-6);
    }

    #[test]
    fn stacked_entities_have_no_push_direction() {
        assert_eq!(push_direction(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)), None);
        assert_eq!(push_direction(Vec3::ONE, Vec3::ONE), None);
    }

    #[test]
    fn player_shoves_hostile_hard_and_recoils_lightly() {
        let response = respond(
            ParticipantKind::Player,
            ParticipantKind::HostileNpc,
            51.0,
            Vec3::X,
        );
        assert_eq!(response.other_impulse, Vec3::X * 51.0);
        assert_eq!(response.self_impulse, Vec3::NEG_X * 2.0);
        assert_eq!(response.body_force, Vec3::ZERO);
    }

    #[test]
    fn player_body_force_is_flat() {
        let response = respond(
            ParticipantKind::Player,
            ParticipantKind::DynamicBody,
            51.0,
            Vec3::Z,
        );
        assert_eq!(response.body_force, Vec3::Z * 500.0);
        assert_eq!(response.self_impulse, Vec3::NEG_Z * 2.0);
        assert_eq!(response.other_impulse, Vec3::ZERO);
    }

    #[test]
    fn hostile_hostile_shove_is_symmetric() {
        let response = respond(
            ParticipantKind::HostileNpc,
            ParticipantKind::HostileNpc,
            51.0,
            Vec3::X,
        );
        // Equal magnitude, opposite directions.
        assert_eq!(response.other_impulse, -response.self_impulse);
        assert_eq!(response.other_impulse, Vec3::X * 25.5);
    }

    #[test]
    fn hostile_recoil_scales_with_its_own_push_force() {
        let response = respond(
            ParticipantKind::HostileNpc,
            ParticipantKind::Player,
            40.0,
            Vec3::X,
        );
        assert_eq!(response.other_impulse, Vec3::X * 40.0);
        assert_eq!(response.self_impulse, Vec3::NEG_X * 10.0);

        let response = respond(
            ParticipantKind::HostileNpc,
            ParticipantKind::DynamicBody,
            40.0,
            Vec3::X,
        );
        assert_eq!(response.body_force, Vec3::X * 400.0);
        assert_eq!(response.self_impulse, Vec3::NEG_X * 4.0);

        let response = respond(
            ParticipantKind::HostileNpc,
            ParticipantKind::Static,
            40.0,
            Vec3::X,
        );
        assert_eq!(response.self_impulse, Vec3::NEG_X * 12.0);
        assert_eq!(response.other_impulse, Vec3::ZERO);
    }

    #[test]
    fn untabulated_pairings_are_inert() {
        use ParticipantKind::*;
        for (a, b) in [
            (Player, Player),
            (Player, Static),
            (DynamicBody, Player),
            (Static, HostileNpc),
            (DynamicBody, DynamicBody),
        ] {
            assert_eq!(respond(a, b, 51.0, Vec3::X), ContactResponse::default());
        }
    }
}
