use std::cell::RefCell;
use std::rc::Rc;

use cgmath::Vector3;

use super::animation::{animated_mount_pose, use_animation_weight};
use super::{HeldItemTransformComponent, MountPointComponent};
use crate::config::FirstPersonConfig;
use crate::ecs::{bind, ComponentKind, EcsWorld, Entity, ObserverId, OnActivated, OnChanged, System};
use crate::inventory::{ItemDroppedEvent, PickupComponent};
use crate::player::{CharacterComponent, ClientComponent, HeldItemComponent, LocalPlayer};
use crate::scene::{attach_child, remove_child, TransformComponent};
use crate::time::GameTime;

pub const HAND_PREFAB: &str = "engine:hand";
pub const MOUNT_POINT_PREFAB: &str = "engine:held_item_mount_point";

/// Keeps the local player's held item mounted in front of the camera
///
/// Everything here is cosmetic: missing components and stale handles make an
/// operation return early instead of failing.
pub struct HeldItemMountController {
    config: FirstPersonConfig,
    /// Placeholder shown when nothing is held, created on first use
    hand_entity: Option<Entity>,
    /// Last item linked for the local character; `None` before the first link
    current_held_item: Option<Entity>,
    observers: Vec<ObserverId>,
}

impl HeldItemMountController {
    pub fn new(config: FirstPersonConfig) -> Self {
        Self {
            config,
            hand_entity: None,
            current_held_item: None,
            observers: Vec::new(),
        }
    }

    /// Create the controller and wire its handlers into `world`
    pub fn install(world: &mut EcsWorld, config: FirstPersonConfig) -> Rc<RefCell<Self>> {
        let controller = Rc::new(RefCell::new(Self::new(config)));

        let ids = vec![
            world.observe::<OnActivated<MountPointComponent>, _>(
                vec![],
                bind(&controller, Self::on_mount_point_activated),
            ),
            world.observe::<OnActivated<HeldItemComponent>, _>(
                vec![ComponentKind::of::<CharacterComponent>()],
                bind(&controller, Self::on_held_item_activated),
            ),
            world.observe::<OnChanged<HeldItemComponent>, _>(
                vec![ComponentKind::of::<CharacterComponent>()],
                bind(&controller, Self::on_held_item_saved),
            ),
            world.observe::<OnChanged<ClientComponent>, _>(
                vec![],
                bind(&controller, Self::on_client_changed),
            ),
            world.observe::<ItemDroppedEvent, _>(
                vec![ComponentKind::of::<TransformComponent>()],
                bind(&controller, Self::on_item_dropped),
            ),
        ];
        controller.borrow_mut().observers = ids;
        controller
    }

    /// Remove every handler registered by `install`
    pub fn uninstall(&mut self, world: &mut EcsWorld) {
        for id in self.observers.drain(..) {
            world.unobserve(id);
        }
    }

    pub fn config(&self) -> &FirstPersonConfig {
        &self.config
    }

    pub fn current_held_item(&self) -> Option<Entity> {
        self.current_held_item
    }

    /// The hand placeholder, if it has been needed yet
    pub fn existing_hand_entity(&self) -> Option<Entity> {
        self.hand_entity
    }

    /// The hand placeholder, created on first access
    pub fn hand_entity(&mut self, world: &mut EcsWorld) -> Entity {
        *self.hand_entity.get_or_insert_with(|| {
            let hand = world.spawn().persistent(false).prefab(HAND_PREFAB).build();
            log::info!("[HeldItemMount] Created hand entity {:?}", hand);
            hand
        })
    }

    /// Make sure the camera's mount point exists and hangs off the camera
    ///
    /// Safe to call repeatedly; the mount point is always unlinked before it
    /// is re-attached with the component's current static placement.
    pub fn ensure_mount_point(&mut self, world: &mut EcsWorld, camera: Entity) {
        let Some(mut mount) = world.get_component::<MountPointComponent>(camera).cloned() else {
            log::debug!("[HeldItemMount] {:?} has no mount point component", camera);
            return;
        };

        if !world.exists(mount.mount_point_entity) {
            mount.mount_point_entity = world
                .spawn()
                .persistent(false)
                .prefab(MOUNT_POINT_PREFAB)
                .with(TransformComponent::default())
                .build();
            log::info!(
                "[HeldItemMount] Created mount point {:?} for camera {:?}",
                mount.mount_point_entity,
                camera
            );
            if let Err(e) = world.save_component(camera, mount.clone()) {
                log::debug!("[HeldItemMount] Could not store mount point on {:?}: {}", camera, e);
                return;
            }
        }

        remove_child(world, camera, mount.mount_point_entity);
        attach_child(
            world,
            camera,
            mount.mount_point_entity,
            mount.translate,
            mount.rotation(),
            mount.scale,
        );
    }

    /// React to the local character selecting a different item
    ///
    /// `old_item` is `None` when nothing has been linked yet (initial load).
    pub fn on_held_item_changed(
        &mut self,
        world: &mut EcsWorld,
        character: Entity,
        new_item: Entity,
        old_item: Option<Entity>,
    ) {
        if self.link_held_item(world, character, new_item, old_item) {
            self.current_held_item = Some(new_item);
        }
    }

    /// Swap what is attached to the mount point; returns false if nothing was done
    fn link_held_item(
        &mut self,
        world: &mut EcsWorld,
        character: Entity,
        new_item: Entity,
        old_item: Option<Entity>,
    ) -> bool {
        let Some(local) = world.resource::<LocalPlayer>().copied() else {
            return false;
        };
        if character != local.character || old_item == Some(new_item) {
            return false;
        }

        let Some(mut mount_point) = self.mount_point_entity(world, local.camera) else {
            log::debug!(
                "[HeldItemMount] Camera {:?} has no mount point, not linking",
                local.camera
            );
            return false;
        };
        if !world.exists(mount_point) {
            self.ensure_mount_point(world, local.camera);
            match self.mount_point_entity(world, local.camera) {
                Some(entity) if world.exists(entity) => mount_point = entity,
                _ => return false,
            }
        }

        let previous = match old_item {
            Some(old) if world.exists(old) => old,
            _ => self.hand_entity(world),
        };
        remove_child(world, mount_point, previous);
        world.remove_component::<TransformComponent>(previous);

        let held = if world.exists(new_item) {
            new_item
        } else {
            self.hand_entity(world)
        };

        // Start from a clean transform, unhooked from wherever it hung before
        if let Some(parent) = world.get_component::<TransformComponent>(held).map(|t| t.parent) {
            remove_child(world, parent, held);
        }
        if let Err(e) = world.save_component(held, TransformComponent::default()) {
            log::debug!("[HeldItemMount] Could not give {:?} a transform: {}", held, e);
            return false;
        }

        let offset = world
            .get_component::<HeldItemTransformComponent>(held)
            .cloned()
            .unwrap_or_default();
        attach_child(world, mount_point, held, offset.translate, offset.rotation(), offset.scale);
        log::debug!("[HeldItemMount] Mounted {:?} (was {:?})", held, previous);
        true
    }

    /// Replace the mount point's static translation and re-attach it
    pub fn set_mount_point_translation(
        &mut self,
        world: &mut EcsWorld,
        translate: Vector3<f32>,
    ) -> bool {
        self.edit_mount_point(world, |mount| mount.translate = translate)
    }

    /// Replace the mount point's static rotation (degrees) and re-attach it
    pub fn set_mount_point_rotation(
        &mut self,
        world: &mut EcsWorld,
        rotate_degrees: Vector3<f32>,
    ) -> bool {
        self.edit_mount_point(world, |mount| mount.rotate_degrees = rotate_degrees)
    }

    fn edit_mount_point(
        &mut self,
        world: &mut EcsWorld,
        edit: impl FnOnce(&mut MountPointComponent),
    ) -> bool {
        let Some(camera) = world.resource::<LocalPlayer>().map(|local| local.camera) else {
            return false;
        };
        let Some(mut mount) = world.get_component::<MountPointComponent>(camera).cloned() else {
            return false;
        };
        edit(&mut mount);
        if world.save_component(camera, mount).is_err() {
            return false;
        }
        self.ensure_mount_point(world, camera);
        true
    }

    fn mount_point_entity(&self, world: &EcsWorld, camera: Entity) -> Option<Entity> {
        world
            .get_component::<MountPointComponent>(camera)
            .map(|mount| mount.mount_point_entity)
    }

    fn on_mount_point_activated(
        &mut self,
        world: &mut EcsWorld,
        camera: Entity,
        _: &OnActivated<MountPointComponent>,
    ) {
        self.ensure_mount_point(world, camera);
    }

    fn on_held_item_activated(
        &mut self,
        world: &mut EcsWorld,
        character: Entity,
        _: &OnActivated<HeldItemComponent>,
    ) {
        self.relink_selected(world, character);
    }

    fn on_held_item_saved(
        &mut self,
        world: &mut EcsWorld,
        character: Entity,
        _: &OnChanged<HeldItemComponent>,
    ) {
        self.relink_selected(world, character);
    }

    fn relink_selected(&mut self, world: &mut EcsWorld, character: Entity) {
        let selected = world
            .get_component::<HeldItemComponent>(character)
            .map(|held| held.selected_item);
        if let Some(selected) = selected {
            let current = self.current_held_item;
            self.on_held_item_changed(world, character, selected, current);
        }
    }

    /// The client finished loading; mount whatever the character already holds
    fn on_client_changed(
        &mut self,
        world: &mut EcsWorld,
        _client: Entity,
        _: &OnChanged<ClientComponent>,
    ) {
        let Some(local) = world.resource::<LocalPlayer>().copied() else {
            return;
        };
        if !world.exists(local.character) || !world.exists(local.camera) {
            return;
        }
        let selected = world
            .get_component::<HeldItemComponent>(local.character)
            .map(|held| held.selected_item);
        if let Some(selected) = selected {
            self.on_held_item_changed(world, local.character, selected, None);
        }
    }

    /// A pickup split off the held stack must not keep rendering in front of the camera
    fn on_item_dropped(&mut self, world: &mut EcsWorld, item: Entity, event: &ItemDroppedEvent) {
        let nested = world
            .get_component::<PickupComponent>(event.pickup)
            .map(|pickup| pickup.item_entity);
        let Some(nested) = nested else {
            return;
        };
        log::debug!("[HeldItemMount] {:?} dropped, clearing transform of {:?}", item, nested);
        world.remove_component::<TransformComponent>(nested);
    }
}

impl System for HeldItemMountController {
    /// Swing the mount point after the held item is used
    fn update(&mut self, world: &mut EcsWorld, _delta_time: f32) {
        let Some(local) = world.resource::<LocalPlayer>().copied() else {
            return;
        };
        let Some(now) = world.resource::<GameTime>().map(GameTime::game_time_ms) else {
            return;
        };
        let Some(last_used) = world
            .get_component::<HeldItemComponent>(local.character)
            .map(|held| held.last_item_used_time)
        else {
            return;
        };
        let Some(mount) = world.get_component::<MountPointComponent>(local.camera).cloned() else {
            return;
        };
        let transform = world
            .get_component::<TransformComponent>(mount.mount_point_entity)
            .cloned();
        let Some(mut transform) = transform else {
            return;
        };

        let elapsed = now as i64 - last_used as i64;
        let weight = use_animation_weight(elapsed, self.config.use_animation.length_ms);
        let (rotation, position) = animated_mount_pose(&mount, &self.config.use_animation, weight);
        if transform.local_rotation == rotation && transform.local_position == position {
            return;
        }

        log::trace!("[HeldItemMount] Use swing weight {:.3} at {} ms", weight, elapsed);
        transform.local_rotation = rotation;
        transform.local_position = position;
        if let Err(e) = world.save_component(mount.mount_point_entity, transform) {
            log::debug!("[HeldItemMount] Could not update mount point: {}", e);
        }
    }

    fn name(&self) -> &str {
        "HeldItemMountController"
    }
}
