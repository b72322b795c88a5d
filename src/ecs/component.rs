use std::any::{Any, TypeId};
use std::fmt;

use rustc_hash::FxHashMap;

use super::Entity;

/// Marker trait for component types
///
/// Components are cloned out of storage, edited and saved back, so every
/// component must be `Clone`.
pub trait Component: Any + Clone {}

impl<T: Any + Clone> Component for T {}

/// Runtime identity of a component type, used to declare observer requirements
#[derive(Clone, Copy)]
pub struct ComponentKind {
    pub type_id: TypeId,
    pub name: &'static str,
}

impl ComponentKind {
    pub fn of<T: Component>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

impl PartialEq for ComponentKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ComponentKind {}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&short_type_name(self.name))
    }
}

/// Strip module paths from a type name for log output, generics included
pub fn short_type_name(name: &str) -> String {
    let mut short = String::with_capacity(name.len());
    let mut path = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            path.push(c);
            continue;
        }
        short.push_str(path.rsplit("::").next().unwrap_or(&path));
        path.clear();
        short.push(c);
    }
    short.push_str(path.rsplit("::").next().unwrap_or(&path));
    short
}

/// Storage for a specific component type
pub struct ComponentStorage<T: Component> {
    components: FxHashMap<Entity, T>,
}

impl<T: Component> ComponentStorage<T> {
    pub fn new() -> Self {
        Self {
            components: FxHashMap::default(),
        }
    }

    /// Add or replace a component, returning the previous value
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        self.components.insert(entity, component)
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.components.remove(&entity)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.components.get(&entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.get_mut(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.components.contains_key(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.components.iter().map(|(&e, c)| (e, c))
    }

    /// Get all entities that have this component
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.components.keys()
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased component storage
pub trait AnyComponentStorage: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn contains_entity(&self, entity: Entity) -> bool;
    fn clear_entity(&mut self, entity: Entity);
}

impl<T: Component> AnyComponentStorage for ComponentStorage<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn clear_entity(&mut self, entity: Entity) {
        self.components.remove(&entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Health(u32);

    fn entity(index: u32) -> Entity {
        Entity {
            index,
            generation: 1,
        }
    }

    #[test]
    fn test_storage_insert_replace_remove() {
        let mut storage = ComponentStorage::<Health>::new();
        assert_eq!(storage.insert(entity(0), Health(10)), None);
        assert_eq!(storage.insert(entity(0), Health(5)), Some(Health(10)));
        assert_eq!(storage.get(entity(0)), Some(&Health(5)));

        storage.get_mut(entity(0)).unwrap().0 = 7;
        assert_eq!(storage.remove(entity(0)), Some(Health(7)));
        assert!(!storage.contains(entity(0)));
    }

    #[test]
    fn test_type_erased_clear() {
        let mut storage: Box<dyn AnyComponentStorage> = Box::new(ComponentStorage::<Health>::new());
        storage
            .as_any_mut()
            .downcast_mut::<ComponentStorage<Health>>()
            .unwrap()
            .insert(entity(3), Health(1));

        assert!(storage.contains_entity(entity(3)));
        storage.clear_entity(entity(3));
        assert!(!storage.contains_entity(entity(3)));
    }

    #[test]
    fn test_component_kind_identity() {
        assert_eq!(ComponentKind::of::<Health>(), ComponentKind::of::<Health>());
        assert_ne!(ComponentKind::of::<Health>(), ComponentKind::of::<u32>());
        assert_eq!(format!("{:?}", ComponentKind::of::<Health>()), "Health");
    }

    #[test]
    fn test_short_type_name_keeps_generics() {
        assert_eq!(
            short_type_name("a::observer::OnChanged<b::player::HeldItemComponent>"),
            "OnChanged<HeldItemComponent>"
        );
        assert_eq!(short_type_name("u32"), "u32");
    }
}
