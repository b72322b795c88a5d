//! First-person held-item view on a small entity/component world
//!
//! The `ecs` store delivers component lifecycle notifications synchronously
//! to registered observers. `first_person::HeldItemMountController` listens to
//! them to keep the local player's held item attached to a mount point in
//! front of the camera, and swings that mount point after each use.

pub mod config;
pub mod console;
pub mod ecs;
pub mod error;
pub mod first_person;
pub mod inventory;
pub mod player;
pub mod scene;
pub mod time;
pub mod ui;

pub use config::FirstPersonConfig;
pub use console::CommandRegistry;
pub use ecs::{EcsWorld, Entity, Schedule, System};
pub use error::{EngineError, EngineResult};
pub use first_person::{HeldItemMountController, HeldItemTransformComponent, MountPointComponent};
pub use player::{CharacterComponent, ClientComponent, HeldItemComponent, LocalPlayer};
pub use scene::TransformComponent;
pub use time::{GameClockSystem, GameTime};
