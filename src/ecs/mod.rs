// Entity/component store with synchronous observers
pub mod component;
pub mod entity;
pub mod observer;
pub mod system;
pub mod world;

// Re-export main types
pub use component::{AnyComponentStorage, Component, ComponentKind, ComponentStorage};
pub use entity::{Entity, EntityManager};
pub use observer::{
    bind, BeforeRemoved, Delivery, Event, ObserverId, ObserverRegistry, OnActivated, OnChanged,
};
pub use system::{Schedule, SharedSystem, System};
pub use world::{EcsWorld, EntityBuilder};
