use std::cell::RefCell;
use std::rc::Rc;

use super::EcsWorld;

/// Trait for systems that process entities with specific components
pub trait System {
    /// Called once when the system is added to a schedule
    fn init(&mut self, _world: &mut EcsWorld) {}

    /// Called every frame to update the system
    fn update(&mut self, world: &mut EcsWorld, delta_time: f32);

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A system shared between the schedule and the observers it registered
pub type SharedSystem = Rc<RefCell<dyn System>>;

/// Runs systems once per frame in insertion order
#[derive(Default)]
pub struct Schedule {
    systems: Vec<SharedSystem>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, world: &mut EcsWorld, system: SharedSystem) {
        {
            let mut guard = system.borrow_mut();
            log::info!("[Schedule] Adding system {}", guard.name());
            guard.init(world);
        }
        world.flush_pending();
        self.systems.push(system);
    }

    /// Update every system, then deliver any events they deferred
    pub fn run(&mut self, world: &mut EcsWorld, delta_time: f32) {
        for system in &self.systems {
            system.borrow_mut().update(world, delta_time);
            world.flush_pending();
        }
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Event;

    struct Tick;
    impl Event for Tick {}

    #[derive(Default)]
    struct Counter {
        frames: u32,
        ticks: u32,
    }

    impl System for Counter {
        fn update(&mut self, world: &mut EcsWorld, _delta_time: f32) {
            self.frames += 1;
            let entity = world.create_entity();
            // Handled by ourselves, so it has to wait until update returns
            world.send_event(entity, Tick);
        }
    }

    #[test]
    fn test_schedule_runs_and_flushes_deferred_events() {
        let mut world = EcsWorld::new();
        let counter = Rc::new(RefCell::new(Counter::default()));
        let handler =
            crate::ecs::bind::<Counter, Tick>(&counter, |counter, _, _, _| counter.ticks += 1);
        world.observe::<Tick, _>(vec![], handler);

        let mut schedule = Schedule::new();
        schedule.add(&mut world, counter.clone());
        schedule.run(&mut world, 0.016);
        schedule.run(&mut world, 0.016);

        assert_eq!(schedule.len(), 1);
        assert_eq!(counter.borrow().frames, 2);
        assert_eq!(counter.borrow().ticks, 2);
        assert_eq!(world.pending_events(), 0);
    }
}
