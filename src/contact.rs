//! Contact reporting between displacement and collision response.
//!
//! The displacement backend reports what it hit; the response system reads
//! those reports the same tick and clears them. Contacts live in a per-agent
//! buffer component rather than a shared event queue, so a report can never
//! leak across ticks or between agents.

use bevy::prelude::*;

/// What kind of participant an entity is, for collision response dispatch.
///
/// Every collidable entity carries one of these. Entities without the
/// component are treated as [`ParticipantKind::Static`], which also covers
/// kinematic scenery that moves but does not take impulses.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[reflect(Component)]
pub enum ParticipantKind {
    /// A free-input controlled agent.
    Player,
    /// A goal-seeking agent.
    HostileNpc,
    /// A pushable physics prop that receives body forces.
    DynamicBody,
    /// Immovable (or externally driven) scenery.
    #[default]
    Static,
}

/// A single contact produced by one displacement call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    /// The entity that was hit.
    pub other: Entity,
    /// Contact normal, pointing toward the moving agent.
    pub normal: Vec3,
    /// World-space contact point.
    pub point: Vec3,
}

/// Per-agent contact buffer, refilled by displacement and drained by the
/// collision response system every tick.
#[derive(Component, Debug, Default)]
pub struct FrameContacts {
    contacts: Vec<ContactEvent>,
}

impl FrameContacts {
    /// Append a contact for this tick.
    pub fn push(&mut self, contact: ContactEvent) {
        self.contacts.push(contact);
    }

    /// Replace the buffer with this tick's contacts.
    pub fn replace(&mut self, contacts: Vec<ContactEvent>) {
        self.contacts = contacts;
    }

    /// Drain the buffer, leaving it empty.
    pub fn take(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.contacts)
    }

    /// Whether any contacts were reported this tick.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
