//! Parent/child links between transforms
//!
//! Both ends of a link must carry a `TransformComponent`. Every edit is saved
//! through the world so `OnChanged<TransformComponent>` observers see it.

use cgmath::{One, Quaternion, Rotation, Vector3, Zero};

use super::TransformComponent;
use crate::ecs::{EcsWorld, Entity};

/// Deepest parent chain followed when resolving world-space values
const MAX_DEPTH: usize = 64;

/// Attach `child` under `parent` with the given local offset
///
/// Returns false without touching anything if either side lacks a transform
/// or `child` is already parented to `parent`.
pub fn attach_child(
    world: &mut EcsWorld,
    parent: Entity,
    child: Entity,
    offset: Vector3<f32>,
    rotation: Quaternion<f32>,
    scale: f32,
) -> bool {
    if parent == child {
        return false;
    }
    let mut child_transform = match world.get_component::<TransformComponent>(child) {
        Some(transform) if world.has_component::<TransformComponent>(parent) => transform.clone(),
        _ => {
            log::trace!("[scene] attach {:?} -> {:?} skipped, missing transform", child, parent);
            return false;
        }
    };
    if child_transform.parent == parent {
        return false;
    }

    let old_parent = child_transform.parent;
    if let Some(mut old) = world.get_component::<TransformComponent>(old_parent).cloned() {
        old.children.retain(|&c| c != child);
        save(world, old_parent, old);
    }

    child_transform.parent = parent;
    child_transform.local_position = offset;
    child_transform.local_rotation = rotation;
    child_transform.local_scale = scale;
    save(world, child, child_transform);

    // Re-read: saving the child may have run observers that touched the parent
    if let Some(mut parent_transform) = world.get_component::<TransformComponent>(parent).cloned() {
        parent_transform
            .children
            .retain(|&c| c != child && links_back(world, c, parent));
        parent_transform.children.push(child);
        save(world, parent, parent_transform);
    }
    true
}

/// Detach `child` from `parent`
///
/// A child that already lost its transform is only pruned from the parent's
/// child list. Returns false if there was no link to break.
pub fn remove_child(world: &mut EcsWorld, parent: Entity, child: Entity) -> bool {
    if !world.has_component::<TransformComponent>(parent) {
        return false;
    }
    match world.get_component::<TransformComponent>(child).cloned() {
        Some(mut child_transform) => {
            if child_transform.parent != parent {
                return false;
            }
            child_transform.parent = Entity::NULL;
            save(world, child, child_transform);
        }
        None => {
            let listed = world
                .get_component::<TransformComponent>(parent)
                .map_or(false, |t| t.children.contains(&child));
            if !listed {
                return false;
            }
        }
    }

    if let Some(mut parent_transform) = world.get_component::<TransformComponent>(parent).cloned() {
        parent_transform.children.retain(|&c| c != child);
        save(world, parent, parent_transform);
    }
    true
}

/// Unlink an entity that is about to be destroyed
///
/// Removes it from its parent's children and orphans its own children.
pub fn unlink_destroyed(world: &mut EcsWorld, entity: Entity) {
    let Some(transform) = world.get_component::<TransformComponent>(entity).cloned() else {
        return;
    };
    remove_child(world, transform.parent, entity);
    for child in transform.children {
        let Some(mut child_transform) = world.get_component::<TransformComponent>(child).cloned()
        else {
            continue;
        };
        if child_transform.parent == entity {
            child_transform.parent = Entity::NULL;
            save(world, child, child_transform);
        }
    }
}

/// Position in world space, composing every ancestor's transform
pub fn world_position(world: &EcsWorld, entity: Entity) -> Option<Vector3<f32>> {
    let mut current = world.get_component::<TransformComponent>(entity)?;
    let mut position = current.local_position;
    for _ in 0..MAX_DEPTH {
        let Some(parent) = world.get_component::<TransformComponent>(current.parent) else {
            return Some(position);
        };
        position = parent.local_position
            + parent
                .local_rotation
                .rotate_vector(position * parent.local_scale);
        current = parent;
    }
    log::warn!("[scene] Parent chain of {:?} exceeds {} levels", entity, MAX_DEPTH);
    Some(position)
}

/// Rotation in world space
pub fn world_rotation(world: &EcsWorld, entity: Entity) -> Option<Quaternion<f32>> {
    let mut current = world.get_component::<TransformComponent>(entity)?;
    let mut rotation = current.local_rotation;
    for _ in 0..MAX_DEPTH {
        let Some(parent) = world.get_component::<TransformComponent>(current.parent) else {
            break;
        };
        rotation = parent.local_rotation * rotation;
        current = parent;
    }
    Some(rotation)
}

/// Uniform scale in world space
pub fn world_scale(world: &EcsWorld, entity: Entity) -> Option<f32> {
    let mut current = world.get_component::<TransformComponent>(entity)?;
    let mut scale = current.local_scale;
    for _ in 0..MAX_DEPTH {
        let Some(parent) = world.get_component::<TransformComponent>(current.parent) else {
            break;
        };
        scale *= parent.local_scale;
        current = parent;
    }
    Some(scale)
}

/// Zero offset, identity rotation, unit scale
pub fn identity_offset() -> (Vector3<f32>, Quaternion<f32>, f32) {
    (Vector3::zero(), Quaternion::one(), 1.0)
}

/// Whether `child` is alive and still names `parent` as its parent
fn links_back(world: &EcsWorld, child: Entity, parent: Entity) -> bool {
    world
        .get_component::<TransformComponent>(child)
        .map_or(false, |transform| transform.parent == parent)
}

fn save(world: &mut EcsWorld, entity: Entity, transform: TransformComponent) {
    if let Err(e) = world.save_component(entity, transform) {
        log::debug!("[scene] Could not save transform on {:?}: {}", entity, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::rotation_from_degrees;
    use cgmath::InnerSpace;

    fn spawn_at(world: &mut EcsWorld, x: f32, y: f32, z: f32) -> Entity {
        world.spawn().with(TransformComponent::new(Vector3::new(x, y, z))).build()
    }

    fn children(world: &EcsWorld, entity: Entity) -> Vec<Entity> {
        world.get_component::<TransformComponent>(entity).unwrap().children.clone()
    }

    #[test]
    fn test_attach_sets_both_sides() {
        let mut world = EcsWorld::new();
        let parent = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let child = spawn_at(&mut world, 9.0, 9.0, 9.0);

        let offset = Vector3::new(1.0, 2.0, 3.0);
        assert!(attach_child(&mut world, parent, child, offset, Quaternion::one(), 0.5));

        let transform = world.get_component::<TransformComponent>(child).unwrap();
        assert_eq!(transform.parent, parent);
        assert_eq!(transform.local_position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.local_scale, 0.5);
        assert_eq!(children(&world, parent), vec![child]);
    }

    #[test]
    fn test_attach_to_same_parent_is_noop() {
        let mut world = EcsWorld::new();
        let parent = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let child = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let (offset, rotation, scale) = identity_offset();

        assert!(attach_child(&mut world, parent, child, offset, rotation, scale));
        assert!(!attach_child(&mut world, parent, child, Vector3::unit_x(), rotation, scale));
        let transform = world.get_component::<TransformComponent>(child).unwrap();
        assert_eq!(transform.local_position, offset);
        assert_eq!(children(&world, parent).len(), 1);
    }

    #[test]
    fn test_reparent_moves_child() {
        let mut world = EcsWorld::new();
        let a = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let b = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let child = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let (offset, rotation, scale) = identity_offset();

        attach_child(&mut world, a, child, offset, rotation, scale);
        attach_child(&mut world, b, child, offset, rotation, scale);

        assert!(children(&world, a).is_empty());
        assert_eq!(children(&world, b), vec![child]);
    }

    #[test]
    fn test_attach_requires_transforms() {
        let mut world = EcsWorld::new();
        let parent = world.create_entity();
        let child = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let (offset, rotation, scale) = identity_offset();

        assert!(!attach_child(&mut world, parent, child, offset, rotation, scale));
        assert!(!attach_child(&mut world, Entity::NULL, child, offset, rotation, scale));
        assert!(!world.get_component::<TransformComponent>(child).unwrap().has_parent());
    }

    #[test]
    fn test_remove_child() {
        let mut world = EcsWorld::new();
        let parent = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let other = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let child = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let (offset, rotation, scale) = identity_offset();
        attach_child(&mut world, parent, child, offset, rotation, scale);

        assert!(!remove_child(&mut world, other, child));
        assert!(remove_child(&mut world, parent, child));
        assert!(!remove_child(&mut world, parent, child));
        assert!(children(&world, parent).is_empty());
        assert!(!world.get_component::<TransformComponent>(child).unwrap().has_parent());
    }

    #[test]
    fn test_remove_child_prunes_child_without_transform() {
        let mut world = EcsWorld::new();
        let parent = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let child = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let (offset, rotation, scale) = identity_offset();
        attach_child(&mut world, parent, child, offset, rotation, scale);

        world.remove_component::<TransformComponent>(child);
        assert_eq!(children(&world, parent), vec![child]);
        assert!(remove_child(&mut world, parent, child));
        assert!(children(&world, parent).is_empty());
    }

    #[test]
    fn test_destroy_unlinks_from_parent_and_orphans_children() {
        let mut world = EcsWorld::new();
        let root = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let middle = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let leaf = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let (offset, rotation, scale) = identity_offset();
        attach_child(&mut world, root, middle, offset, rotation, scale);
        attach_child(&mut world, middle, leaf, offset, rotation, scale);

        assert!(world.destroy_entity(middle));

        assert!(children(&world, root).is_empty());
        assert!(!world.get_component::<TransformComponent>(leaf).unwrap().has_parent());
        assert!(!world.destroy_entity(middle));
    }

    #[test]
    fn test_attach_prunes_stale_children() {
        let mut world = EcsWorld::new();
        let parent = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let dropped = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let next = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let (offset, rotation, scale) = identity_offset();
        attach_child(&mut world, parent, dropped, offset, rotation, scale);

        // Losing the transform leaves the entry behind until the next attach
        world.remove_component::<TransformComponent>(dropped);
        assert!(attach_child(&mut world, parent, next, offset, rotation, scale));
        assert_eq!(children(&world, parent), vec![next]);
    }

    #[test]
    fn test_world_space_composition() {
        let mut world = EcsWorld::new();
        let root = spawn_at(&mut world, 10.0, 0.0, 0.0);
        let child = spawn_at(&mut world, 0.0, 0.0, 0.0);
        let grandchild = spawn_at(&mut world, 0.0, 0.0, 0.0);

        let yaw = rotation_from_degrees(Vector3::new(0.0, 90.0, 0.0));
        let mut root_transform = world.get_component::<TransformComponent>(root).unwrap().clone();
        root_transform.local_rotation = yaw;
        root_transform.local_scale = 2.0;
        world.save_component(root, root_transform).unwrap();

        let identity = Quaternion::one();
        attach_child(&mut world, root, child, Vector3::unit_x(), identity, 1.0);
        attach_child(&mut world, child, grandchild, Vector3::unit_y(), identity, 1.0);

        // (1, 1, 0) scaled by 2 and yawed 90 degrees lands on (0, 2, -2), offset by the root
        let position = world_position(&world, grandchild).unwrap();
        assert!((position - Vector3::new(10.0, 2.0, -2.0)).magnitude() < 1e-4);
        assert_eq!(world_scale(&world, grandchild), Some(2.0));
        let rotation = world_rotation(&world, grandchild).unwrap();
        assert!((rotation.v - yaw.v).magnitude() < 1e-6);
        let bare = world.create_entity();
        assert!(world_position(&world, bare).is_none());
    }
}
