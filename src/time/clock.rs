use super::GameTime;
use crate::ecs::{EcsWorld, System};

/// Advances the world's `GameTime` resource each frame
///
/// Add it to the schedule before systems that read the clock.
#[derive(Debug, Default)]
pub struct GameClockSystem;

impl System for GameClockSystem {
    fn init(&mut self, world: &mut EcsWorld) {
        if world.resource::<GameTime>().is_none() {
            world.insert_resource(GameTime::new());
        }
    }

    fn update(&mut self, world: &mut EcsWorld, delta_time: f32) {
        if let Some(time) = world.resource_mut::<GameTime>() {
            time.advance(delta_time);
        }
    }

    fn name(&self) -> &str {
        "GameClockSystem"
    }
}
