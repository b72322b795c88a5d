use crate::ecs::{Entity, Event};

/// A dropped item lying in the world
///
/// `item_entity` is the item the pickup grants; it may be a copy split off a
/// larger stack the player is still holding.
#[derive(Debug, Clone, PartialEq)]
pub struct PickupComponent {
    pub item_entity: Entity,
}

/// Sent to an item entity after it has been dropped as `pickup`
#[derive(Debug, Clone, Copy)]
pub struct ItemDroppedEvent {
    pub pickup: Entity,
}

impl Event for ItemDroppedEvent {}
