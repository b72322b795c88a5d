//! First-person held item
//!
//! Attaches whatever the local character holds to a mount point hanging off
//! the camera, falls back to an empty hand, and plays a short swing whenever
//! the item is used.

pub mod animation;
pub mod commands;
pub mod components;
pub mod controller;

pub use animation::{animated_mount_pose, use_animation_weight};
pub use commands::register_commands;
pub use components::{HeldItemTransformComponent, MountPointComponent};
pub use controller::{HeldItemMountController, HAND_PREFAB, MOUNT_POINT_PREFAB};
