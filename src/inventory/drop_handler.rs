use cgmath::Vector3;

use crate::ecs::{EcsWorld, Entity};
use crate::error::{EngineError, EngineResult};
use crate::inventory::{ItemDroppedEvent, PickupComponent};
use crate::scene::TransformComponent;

/// Handles item dropping from inventory
pub struct ItemDropHandler;

impl ItemDropHandler {
    /// Drop `item` into the world at `position`
    ///
    /// Spawns a pickup wrapping the item and notifies the item with an
    /// `ItemDroppedEvent` once the pickup exists.
    pub fn drop_item(
        world: &mut EcsWorld,
        item: Entity,
        position: Vector3<f32>,
    ) -> EngineResult<Entity> {
        if !world.exists(item) {
            return Err(EngineError::EntityNotFound { entity: item });
        }

        let pickup = world
            .spawn()
            .prefab("engine:pickup")
            .with(TransformComponent::new(position))
            .with(PickupComponent { item_entity: item })
            .build();

        log::debug!("[ItemDropHandler] Dropped {:?} as pickup {:?}", item, pickup);
        world.send_event(item, ItemDroppedEvent { pickup });
        Ok(pickup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Delivery, EcsWorld};
    use cgmath::Zero;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_drop_spawns_pickup_and_notifies_item() {
        let mut world = EcsWorld::new();
        let item = world.create_entity();
        let notified = Rc::new(Cell::new(Entity::NULL));
        let sink = notified.clone();
        world.observe::<ItemDroppedEvent, _>(vec![], move |_, _, event| {
            sink.set(event.pickup);
            Delivery::Done
        });

        let position = Vector3::new(1.0, 2.0, 3.0);
        let pickup = ItemDropHandler::drop_item(&mut world, item, position).unwrap();

        assert_eq!(notified.get(), pickup);
        assert_eq!(world.get_component::<PickupComponent>(pickup).unwrap().item_entity, item);
        assert_eq!(world.prefab(pickup), Some("engine:pickup"));
    }

    #[test]
    fn test_drop_missing_item_fails() {
        let mut world = EcsWorld::new();
        let result = ItemDropHandler::drop_item(&mut world, Entity::NULL, Vector3::zero());
        assert!(result.is_err());
        assert_eq!(world.entity_count(), 0);
    }
}
