use cgmath::{Quaternion, Vector3, Zero};

use crate::config::MountPointConfig;
use crate::ecs::Entity;
use crate::scene::rotation_from_degrees;

/// Lives on the camera; places the held-item mount point relative to it
#[derive(Debug, Clone, PartialEq)]
pub struct MountPointComponent {
    /// Non-persistent, created the first time the camera activates
    pub mount_point_entity: Entity,
    pub translate: Vector3<f32>,
    pub rotate_degrees: Vector3<f32>,
    pub scale: f32,
}

impl MountPointComponent {
    pub fn from_config(config: &MountPointConfig) -> Self {
        Self {
            mount_point_entity: Entity::NULL,
            translate: Vector3::from(config.translate),
            rotate_degrees: Vector3::from(config.rotate_degrees),
            scale: config.scale,
        }
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        rotation_from_degrees(self.rotate_degrees)
    }
}

impl Default for MountPointComponent {
    fn default() -> Self {
        Self::from_config(&MountPointConfig::default())
    }
}

/// Preferred placement of a specific item while it is held
#[derive(Debug, Clone, PartialEq)]
pub struct HeldItemTransformComponent {
    pub translate: Vector3<f32>,
    pub rotate_degrees: Vector3<f32>,
    pub scale: f32,
}

impl HeldItemTransformComponent {
    pub fn rotation(&self) -> Quaternion<f32> {
        rotation_from_degrees(self.rotate_degrees)
    }
}

impl Default for HeldItemTransformComponent {
    fn default() -> Self {
        Self {
            translate: Vector3::zero(),
            rotate_degrees: Vector3::zero(),
            scale: 1.0,
        }
    }
}
