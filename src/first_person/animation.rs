//! The "use" swing of the held item
//!
//! A triangular envelope over `length_ms`: the weight climbs from 0 to 1 over
//! the first half and falls back to 0 over the second. Outside the window the
//! mount point sits at its static placement.

use cgmath::{Quaternion, Vector3};

use super::MountPointComponent;
use crate::config::UseAnimationConfig;
use crate::scene::rotation_from_degrees;

/// Swing weight in `[0, 1]` for the time since the item was last used
pub fn use_animation_weight(elapsed_ms: i64, length_ms: u64) -> f32 {
    if length_ms == 0 || elapsed_ms < 0 || elapsed_ms as u64 >= length_ms {
        return 0.0;
    }
    let half = length_ms as f32 / 2.0;
    (1.0 - (elapsed_ms as f32 / half - 1.0).abs()).max(0.0)
}

/// Mount-point local rotation and position for a given weight
pub fn animated_mount_pose(
    mount: &MountPointComponent,
    config: &UseAnimationConfig,
    weight: f32,
) -> (Quaternion<f32>, Vector3<f32>) {
    let degrees = mount.rotate_degrees
        + Vector3::new(config.peak_pitch_degrees * weight, config.peak_yaw_degrees * weight, 0.0);
    let position = mount.translate + config.peak_offset() * weight;
    (rotation_from_degrees(degrees), position)
}
