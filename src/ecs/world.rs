use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::component::short_type_name;
use super::observer::{
    BeforeRemoved, Delivery, ErasedHandler, Event, ObserverId, ObserverRegistry, OnActivated,
    OnChanged, PendingCall,
};
use super::{AnyComponentStorage, Component, ComponentKind, ComponentStorage, Entity, EntityManager};
use crate::error::{EngineError, EngineResult};
use crate::scene::unlink_destroyed;

/// The ECS world that manages entities, components, resources and observers
pub struct EcsWorld {
    entity_manager: EntityManager,
    component_storages: FxHashMap<TypeId, Box<dyn AnyComponentStorage>>,
    resources: FxHashMap<TypeId, Box<dyn Any>>,
    observers: ObserverRegistry,
    pending: VecDeque<PendingCall>,
    dispatch_depth: usize,
}

impl EcsWorld {
    pub fn new() -> Self {
        Self {
            entity_manager: EntityManager::new(),
            component_storages: FxHashMap::default(),
            resources: FxHashMap::default(),
            observers: ObserverRegistry::new(),
            pending: VecDeque::new(),
            dispatch_depth: 0,
        }
    }

    /// Create a new persistent entity
    pub fn create_entity(&mut self) -> Entity {
        self.entity_manager.create(true, None)
    }

    /// Start building an entity with components
    pub fn spawn(&mut self) -> EntityBuilder<'_> {
        EntityBuilder {
            world: self,
            persistent: true,
            prefab: None,
            components: Vec::new(),
        }
    }

    /// Destroy an entity and all its components
    ///
    /// The entity is unlinked from the scene graph first, so no parent keeps
    /// a dead handle among its children.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.exists(entity) {
            return false;
        }
        unlink_destroyed(self, entity);

        // An observer of the unlink may already have destroyed it
        if self.entity_manager.destroy(entity) {
            for storage in self.component_storages.values_mut() {
                storage.clear_entity(entity);
            }
        }
        true
    }

    /// Check if entity exists
    pub fn exists(&self, entity: Entity) -> bool {
        self.entity_manager.exists(entity)
    }

    pub fn is_persistent(&self, entity: Entity) -> bool {
        self.entity_manager.is_persistent(entity)
    }

    pub fn prefab(&self, entity: Entity) -> Option<&str> {
        self.entity_manager.prefab(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entity_manager.count()
    }

    /// All live entities
    pub fn entities(&self) -> Vec<Entity> {
        self.entity_manager.iter().collect()
    }

    /// Add a component, firing `OnActivated<T>` once it is stored
    ///
    /// Replaces an existing component of the same type without a second
    /// activation; use `save_component` for edits.
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> EngineResult<()> {
        if !self.exists(entity) {
            return Err(EngineError::EntityNotFound { entity });
        }
        let previous = self.storage_mut::<T>().insert(entity, component);
        if previous.is_none() {
            self.dispatch(entity, OnActivated::<T>::new());
        }
        Ok(())
    }

    /// Store a component, firing `OnChanged<T>` if it was present and
    /// `OnActivated<T>` otherwise
    pub fn save_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> EngineResult<()> {
        if !self.exists(entity) {
            return Err(EngineError::EntityNotFound { entity });
        }
        let previous = self.storage_mut::<T>().insert(entity, component);
        if previous.is_some() {
            self.dispatch(entity, OnChanged::<T>::new());
        } else {
            self.dispatch(entity, OnActivated::<T>::new());
        }
        Ok(())
    }

    /// Remove a component, firing `BeforeRemoved<T>` while it is still readable
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if !self.has_component::<T>(entity) {
            return None;
        }
        self.dispatch(entity, BeforeRemoved::<T>::new());
        self.storage_mut_if_present::<T>()?.remove(entity)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.exists(entity) {
            return None;
        }
        self.storage::<T>()?.get(entity)
    }

    /// Mutable access that bypasses observers
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.exists(entity) {
            return None;
        }
        self.storage_mut_if_present::<T>()?.get_mut(entity)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.get_component::<T>(entity).is_some()
    }

    /// Check for a component by runtime kind
    pub fn has_kind(&self, entity: Entity, kind: ComponentKind) -> bool {
        self.exists(entity)
            && self
                .component_storages
                .get(&kind.type_id)
                .map_or(false, |storage| storage.contains_entity(entity))
    }

    /// Get all entities that have a specific component
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        match self.storage::<T>() {
            Some(storage) => storage.entities().copied().collect(),
            None => Vec::new(),
        }
    }

    pub fn insert_resource<R: Any>(&mut self, resource: R) {
        self.resources.insert(TypeId::of::<R>(), Box::new(resource));
    }

    pub fn resource<R: Any>(&self) -> Option<&R> {
        self.resources.get(&TypeId::of::<R>())?.downcast_ref::<R>()
    }

    pub fn resource_mut<R: Any>(&mut self) -> Option<&mut R> {
        self.resources.get_mut(&TypeId::of::<R>())?.downcast_mut::<R>()
    }

    /// Register a handler for `E` on entities carrying every `required` kind
    pub fn observe<E, F>(&mut self, required: Vec<ComponentKind>, mut handler: F) -> ObserverId
    where
        E: Event,
        F: FnMut(&mut EcsWorld, Entity, &E) -> Delivery + 'static,
    {
        let erased: ErasedHandler = Rc::new(RefCell::new(
            move |world: &mut EcsWorld, entity: Entity, payload: &dyn Any| {
                match payload.downcast_ref::<E>() {
                    Some(event) => handler(world, entity, event),
                    None => Delivery::Done,
                }
            },
        ));
        let id = self.observers.register::<E>(required, erased);
        log::debug!(
            "[EcsWorld] Registered observer {:?} for {}",
            id,
            short_type_name(std::any::type_name::<E>())
        );
        id
    }

    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    /// Send a custom event to an entity
    pub fn send_event<E: Event>(&mut self, entity: Entity, event: E) {
        if !self.exists(entity) {
            log::trace!(
                "[EcsWorld] Dropping {} for missing entity {:?}",
                short_type_name(std::any::type_name::<E>()),
                entity
            );
            return;
        }
        self.dispatch(entity, event);
    }

    /// Number of handler calls waiting for their owner to be released
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    /// Retry handler calls that found their owner busy
    ///
    /// Calls that are still busy stay queued for the next flush.
    pub fn flush_pending(&mut self) {
        let mut remaining = self.pending.len();
        while remaining > 0 {
            remaining -= 1;
            let Some(call) = self.pending.pop_front() else {
                break;
            };
            self.invoke(call);
        }
    }

    fn dispatch<E: Event>(&mut self, entity: Entity, event: E) {
        let handlers = self.observers.matching(TypeId::of::<E>());
        if handlers.is_empty() {
            return;
        }

        let payload: Rc<dyn Any> = Rc::new(event);
        self.dispatch_depth += 1;
        for (event_name, required, handler) in handlers {
            if !required.iter().all(|&kind| self.has_kind(entity, kind)) {
                continue;
            }
            self.invoke(PendingCall {
                handler,
                entity,
                payload: payload.clone(),
                event_name,
            });
        }
        self.dispatch_depth -= 1;

        if self.dispatch_depth == 0 && !self.pending.is_empty() {
            self.flush_pending();
        }
    }

    fn invoke(&mut self, call: PendingCall) {
        let delivery = match call.handler.try_borrow_mut() {
            Ok(mut handler) => (&mut *handler)(self, call.entity, call.payload.as_ref()),
            Err(_) => Delivery::Busy,
        };
        if delivery == Delivery::Busy {
            log::trace!(
                "[EcsWorld] Deferring {} for {:?}, handler busy",
                short_type_name(call.event_name),
                call.entity
            );
            self.pending.push_back(call);
        }
    }

    fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.component_storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
    }

    fn storage_mut_if_present<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
    }

    /// Get or lazily register the storage for `T`
    fn storage_mut<T: Component>(&mut self) -> &mut ComponentStorage<T> {
        self.component_storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()))
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
            .expect("component storage registered under the wrong TypeId")
    }
}

impl Default for EcsWorld {
    fn default() -> Self {
        Self::new()
    }
}

type ActivateFn = Box<dyn FnOnce(&mut EcsWorld, Entity)>;
type InsertFn = Box<dyn FnOnce(&mut EcsWorld, Entity) -> ActivateFn>;

/// Builder for creating entities with components
///
/// All components are stored before any `OnActivated` notification fires, so
/// handlers see the complete entity. Notifications follow insertion order.
pub struct EntityBuilder<'a> {
    world: &'a mut EcsWorld,
    persistent: bool,
    prefab: Option<String>,
    components: Vec<InsertFn>,
}

impl<'a> EntityBuilder<'a> {
    /// Add a component to the entity being built
    pub fn with<T: Component>(mut self, component: T) -> Self {
        self.components.push(Box::new(move |world: &mut EcsWorld, entity: Entity| {
            world.storage_mut::<T>().insert(entity, component);
            Box::new(|world: &mut EcsWorld, entity: Entity| {
                world.dispatch(entity, OnActivated::<T>::new())
            }) as ActivateFn
        }));
        self
    }

    /// Mark whether the entity should be saved with the world
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    /// Record the prefab the entity was built from
    pub fn prefab(mut self, name: impl Into<String>) -> Self {
        self.prefab = Some(name.into());
        self
    }

    /// Finish building and return the entity
    pub fn build(self) -> Entity {
        let world = self.world;
        let entity = world.entity_manager.create(self.persistent, self.prefab);
        let activations: Vec<ActivateFn> = self
            .components
            .into_iter()
            .map(|insert| insert(world, entity))
            .collect();
        for activate in activations {
            activate(world, entity);
        }
        entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    struct Position(f32);

    #[derive(Debug, Clone, PartialEq)]
    struct Tag;

    struct Ping;
    impl Event for Ping {}

    #[test]
    fn test_component_roundtrip_and_destroy() {
        let mut world = EcsWorld::new();
        let entity = world.spawn().with(Position(1.0)).build();

        assert_eq!(world.get_component::<Position>(entity), Some(&Position(1.0)));
        world.get_component_mut::<Position>(entity).unwrap().0 = 2.0;
        assert_eq!(world.get_component::<Position>(entity), Some(&Position(2.0)));

        assert!(world.destroy_entity(entity));
        assert!(world.get_component::<Position>(entity).is_none());
        assert!(world.entities_with::<Position>().is_empty());
    }

    #[test]
    fn test_add_to_missing_entity_fails() {
        let mut world = EcsWorld::new();
        let result = world.add_component(Entity::NULL, Tag);
        assert!(matches!(result, Err(EngineError::EntityNotFound { .. })));
    }

    #[test]
    fn test_builder_flags() {
        let mut world = EcsWorld::new();
        let entity = world.spawn().persistent(false).prefab("engine:hand").build();
        assert!(!world.is_persistent(entity));
        assert_eq!(world.prefab(entity), Some("engine:hand"));
        let fresh = world.create_entity();
        assert!(world.is_persistent(fresh));
    }

    #[test]
    fn test_save_fires_activated_then_changed() {
        let mut world = EcsWorld::new();
        let activated = Rc::new(Cell::new(0));
        let changed = Rc::new(Cell::new(0));

        let counter = activated.clone();
        world.observe::<OnActivated<Position>, _>(vec![], move |_, _, _| {
            counter.set(counter.get() + 1);
            Delivery::Done
        });
        let counter = changed.clone();
        world.observe::<OnChanged<Position>, _>(vec![], move |_, _, _| {
            counter.set(counter.get() + 1);
            Delivery::Done
        });

        let entity = world.create_entity();
        world.save_component(entity, Position(0.0)).unwrap();
        world.save_component(entity, Position(1.0)).unwrap();
        world.save_component(entity, Position(2.0)).unwrap();

        assert_eq!(activated.get(), 1);
        assert_eq!(changed.get(), 2);
    }

    #[test]
    fn test_handler_observes_committed_value() {
        let mut world = EcsWorld::new();
        let seen = Rc::new(Cell::new(0.0));
        let sink = seen.clone();
        world.observe::<OnChanged<Position>, _>(vec![], move |world, entity, _| {
            sink.set(world.get_component::<Position>(entity).map_or(-1.0, |p| p.0));
            Delivery::Done
        });

        let entity = world.spawn().with(Position(1.0)).build();
        world.save_component(entity, Position(5.0)).unwrap();
        assert_eq!(seen.get(), 5.0);
    }

    #[test]
    fn test_required_components_filter_handlers() {
        let mut world = EcsWorld::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        world.observe::<OnChanged<Position>, _>(vec![ComponentKind::of::<Tag>()], move |_, _, _| {
            counter.set(counter.get() + 1);
            Delivery::Done
        });

        let untagged = world.spawn().with(Position(0.0)).build();
        let tagged = world.spawn().with(Position(0.0)).with(Tag).build();
        world.save_component(untagged, Position(1.0)).unwrap();
        world.save_component(tagged, Position(1.0)).unwrap();

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_builder_activates_after_all_components_stored() {
        let mut world = EcsWorld::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        world.observe::<OnActivated<Position>, _>(vec![ComponentKind::of::<Tag>()], move |_, _, _| {
            counter.set(counter.get() + 1);
            Delivery::Done
        });

        world.spawn().with(Position(0.0)).with(Tag).build();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_before_removed_sees_component() {
        let mut world = EcsWorld::new();
        let seen = Rc::new(Cell::new(false));
        let sink = seen.clone();
        world.observe::<BeforeRemoved<Position>, _>(vec![], move |world, entity, _| {
            sink.set(world.has_component::<Position>(entity));
            Delivery::Done
        });

        let entity = world.spawn().with(Position(3.0)).build();
        assert_eq!(world.remove_component::<Position>(entity), Some(Position(3.0)));
        assert!(seen.get());
        assert_eq!(world.remove_component::<Position>(entity), None);
    }

    #[test]
    fn test_custom_events_and_unobserve() {
        let mut world = EcsWorld::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let id = world.observe::<Ping, _>(vec![], move |_, _, _| {
            counter.set(counter.get() + 1);
            Delivery::Done
        });

        let entity = world.create_entity();
        world.send_event(entity, Ping);
        world.send_event(Entity::NULL, Ping);
        assert_eq!(hits.get(), 1);

        assert!(world.unobserve(id));
        world.send_event(entity, Ping);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_busy_handler_is_deferred_until_flush() {
        let mut world = EcsWorld::new();
        let busy = Rc::new(Cell::new(true));
        let hits = Rc::new(Cell::new(0));

        let (flag, counter) = (busy.clone(), hits.clone());
        world.observe::<Ping, _>(vec![], move |_, _, _| {
            if flag.get() {
                return Delivery::Busy;
            }
            counter.set(counter.get() + 1);
            Delivery::Done
        });

        let entity = world.create_entity();
        world.send_event(entity, Ping);
        assert_eq!(hits.get(), 0);
        assert_eq!(world.pending_events(), 1);

        busy.set(false);
        world.flush_pending();
        assert_eq!(hits.get(), 1);
        assert_eq!(world.pending_events(), 0);
    }

    #[test]
    fn test_resources() {
        let mut world = EcsWorld::new();
        assert!(world.resource::<u64>().is_none());
        world.insert_resource(7u64);
        *world.resource_mut::<u64>().unwrap() += 1;
        assert_eq!(world.resource::<u64>(), Some(&8));
    }
}
