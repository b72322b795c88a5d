//! Scene graph
//!
//! Local transforms with parent/child links, used to mount entities relative
//! to each other (camera -> mount point -> held item).

pub mod hierarchy;
pub mod transform;

pub use hierarchy::{
    attach_child, identity_offset, remove_child, unlink_destroyed, world_position, world_rotation,
    world_scale,
};
pub use transform::{rotation_from_degrees, TransformComponent};
