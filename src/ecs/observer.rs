//! Synchronous event observers
//!
//! Handlers are registered explicitly against an event type and the set of
//! component kinds the target entity must carry. The world invokes matching
//! handlers after a mutation is committed and before the mutator returns.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use super::{Component, ComponentKind, EcsWorld, Entity};

/// Marker trait for anything that can be sent to an entity
pub trait Event: Any {}

/// Outcome of a single handler invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The handler consumed the event
    Done,
    /// The handler's owner is borrowed further up the stack; retry later
    Busy,
}

/// Fired after a component is added to an entity
pub struct OnActivated<C: Component>(PhantomData<fn() -> C>);

/// Fired after an existing component is saved back
pub struct OnChanged<C: Component>(PhantomData<fn() -> C>);

/// Fired before a component is removed from an entity
pub struct BeforeRemoved<C: Component>(PhantomData<fn() -> C>);

macro_rules! lifecycle_event {
    ($name:ident) => {
        impl<C: Component> $name<C> {
            pub fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<C: Component> Default for $name<C> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<C: Component> Event for $name<C> {}
    };
}

lifecycle_event!(OnActivated);
lifecycle_event!(OnChanged);
lifecycle_event!(BeforeRemoved);

/// Identifier returned by `EcsWorld::observe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

pub(crate) type ErasedHandler =
    Rc<RefCell<dyn FnMut(&mut EcsWorld, Entity, &dyn Any) -> Delivery>>;

/// Event name, required kinds and handler of one matching observer
pub(crate) type MatchedObserver = (&'static str, Vec<ComponentKind>, ErasedHandler);

struct Observer {
    id: ObserverId,
    event: TypeId,
    event_name: &'static str,
    required: Vec<ComponentKind>,
    handler: ErasedHandler,
}

/// A handler invocation waiting for its owner to become available
pub(crate) struct PendingCall {
    pub handler: ErasedHandler,
    pub entity: Entity,
    pub payload: Rc<dyn Any>,
    pub event_name: &'static str,
}

/// All registered observers, keyed by event type
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Observer>,
    next_id: u64,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register<E: Event>(
        &mut self,
        required: Vec<ComponentKind>,
        handler: ErasedHandler,
    ) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push(Observer {
            id,
            event: TypeId::of::<E>(),
            event_name: std::any::type_name::<E>(),
            required,
            handler,
        });
        id
    }

    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|observer| observer.id != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Snapshot the handlers for an event type along with their requirements
    pub(crate) fn matching(&self, event: TypeId) -> Vec<MatchedObserver> {
        self.observers
            .iter()
            .filter(|observer| observer.event == event)
            .map(|observer| {
                (
                    observer.event_name,
                    observer.required.clone(),
                    observer.handler.clone(),
                )
            })
            .collect()
    }
}

/// Route an event to a method on a shared system
///
/// The observer keeps only a weak reference, so dropping the system silently
/// disables the handler. If the system is already borrowed the call is
/// reported as `Busy` and the world delivers it later.
pub fn bind<S, E>(
    target: &Rc<RefCell<S>>,
    method: fn(&mut S, &mut EcsWorld, Entity, &E),
) -> impl FnMut(&mut EcsWorld, Entity, &E) -> Delivery + 'static
where
    S: 'static,
    E: Event,
{
    let weak: Weak<RefCell<S>> = Rc::downgrade(target);
    move |world, entity, event| {
        let Some(target) = weak.upgrade() else {
            return Delivery::Done;
        };
        // Bound to a local so the `RefMut` temporary drops before `target`
        let result = match target.try_borrow_mut() {
            Ok(mut system) => {
                method(&mut system, world, entity, event);
                Delivery::Done
            }
            Err(_) => Delivery::Busy,
        };
        result
    }
}
