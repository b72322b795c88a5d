//! Local player and character data
//!
//! The network layer owns these components; the client only reads them and
//! reacts to their change notifications.

use crate::ecs::{EcsWorld, Entity};
use crate::error::{EngineError, EngineResult};

/// The character and camera controlled on this client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalPlayer {
    pub character: Entity,
    pub camera: Entity,
}

impl LocalPlayer {
    pub fn new(character: Entity, camera: Entity) -> Self {
        Self { character, camera }
    }
}

impl Default for LocalPlayer {
    fn default() -> Self {
        Self::new(Entity::NULL, Entity::NULL)
    }
}

/// Marks an entity as a playable character
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterComponent {
    pub display_name: String,
}

/// A connected client and the character it controls
#[derive(Debug, Clone, PartialEq)]
pub struct ClientComponent {
    pub character: Entity,
    pub local: bool,
}

/// The item a character has selected and when it last used it
#[derive(Debug, Clone, PartialEq)]
pub struct HeldItemComponent {
    /// `Entity::NULL` when holding nothing
    pub selected_item: Entity,
    /// Game time in milliseconds
    pub last_item_used_time: u64,
}

impl Default for HeldItemComponent {
    fn default() -> Self {
        Self {
            selected_item: Entity::NULL,
            last_item_used_time: 0,
        }
    }
}

/// Change the selected item, firing the held-item change notification
pub fn select_item(world: &mut EcsWorld, character: Entity, item: Entity) -> EngineResult<()> {
    let mut held = held_item(world, character)?;
    held.selected_item = item;
    world.save_component(character, held)
}

/// Record that the held item was used at `now_ms`
pub fn use_held_item(world: &mut EcsWorld, character: Entity, now_ms: u64) -> EngineResult<()> {
    let mut held = held_item(world, character)?;
    held.last_item_used_time = now_ms;
    world.save_component(character, held)
}

fn held_item(world: &EcsWorld, character: Entity) -> EngineResult<HeldItemComponent> {
    world
        .get_component::<HeldItemComponent>(character)
        .cloned()
        .ok_or(EngineError::ComponentMissing {
            entity: character,
            component: "HeldItemComponent",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_use() {
        let mut world = EcsWorld::new();
        let item = world.create_entity();
        let character = world.spawn().with(HeldItemComponent::default()).build();

        select_item(&mut world, character, item).unwrap();
        use_held_item(&mut world, character, 1234).unwrap();

        let held = world.get_component::<HeldItemComponent>(character).unwrap();
        assert_eq!(held.selected_item, item);
        assert_eq!(held.last_item_used_time, 1234);
    }

    #[test]
    fn test_select_without_component_fails() {
        let mut world = EcsWorld::new();
        let character = world.create_entity();
        let result = select_item(&mut world, character, Entity::NULL);
        assert!(matches!(result, Err(EngineError::ComponentMissing { .. })));
    }
}
