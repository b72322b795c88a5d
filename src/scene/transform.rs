use cgmath::{Deg, One, Quaternion, Rotation3, Vector3, Zero};

use crate::ecs::Entity;

/// Local transform relative to a parent in the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    pub local_position: Vector3<f32>,
    pub local_rotation: Quaternion<f32>,
    pub local_scale: f32,
    /// `Entity::NULL` for roots
    pub parent: Entity,
    pub children: Vec<Entity>,
}

impl TransformComponent {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            local_position: position,
            ..Self::default()
        }
    }

    pub fn has_parent(&self) -> bool {
        !self.parent.is_null()
    }
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            local_position: Vector3::zero(),
            local_rotation: Quaternion::one(),
            local_scale: 1.0,
            parent: Entity::NULL,
            children: Vec::new(),
        }
    }
}

/// Build a rotation from Euler angles in degrees
///
/// `x` is pitch, `y` is yaw and `z` is roll, composed as `yaw * pitch * roll`.
pub fn rotation_from_degrees(degrees: Vector3<f32>) -> Quaternion<f32> {
    Quaternion::from_angle_y(Deg(degrees.y))
        * Quaternion::from_angle_x(Deg(degrees.x))
        * Quaternion::from_angle_z(Deg(degrees.z))
}
