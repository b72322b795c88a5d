use std::cell::RefCell;
use std::rc::{Rc, Weak};

use cgmath::Vector3;

use super::HeldItemMountController;
use crate::console::CommandRegistry;
use crate::ecs::EcsWorld;
use crate::error::{EngineError, EngineResult};

const CONTROLLER: &str = "HeldItemMountController";

/// Register the mount point tuning commands
///
/// The commands hold a weak handle; once the controller is dropped they
/// report it instead of keeping it alive.
pub fn register_commands(
    registry: &mut CommandRegistry,
    controller: &Rc<RefCell<HeldItemMountController>>,
) {
    let weak = Rc::downgrade(controller);
    registry.register(
        "mount_point_translation",
        "Sets the held item mount point translation relative to the camera",
        vec!["x", "y", "z"],
        Box::new(move |world, args| {
            let translate = Vector3::new(args[0], args[1], args[2]);
            with_controller(&weak, world, |controller, world| {
                controller.set_mount_point_translation(world, translate)
            })?;
            Ok(format!("Set mount point translation to {:?}", translate))
        }),
    );

    let weak = Rc::downgrade(controller);
    registry.register(
        "mount_point_rotation",
        "Sets the held item mount point rotation relative to the camera, in degrees",
        vec!["x", "y", "z"],
        Box::new(move |world, args| {
            let rotate = Vector3::new(args[0], args[1], args[2]);
            with_controller(&weak, world, |controller, world| {
                controller.set_mount_point_rotation(world, rotate)
            })?;
            Ok(format!("Set mount point rotation to {:?}", rotate))
        }),
    );
}

fn with_controller(
    weak: &Weak<RefCell<HeldItemMountController>>,
    world: &mut EcsWorld,
    edit: impl FnOnce(&mut HeldItemMountController, &mut EcsWorld) -> bool,
) -> EngineResult<()> {
    let controller = weak
        .upgrade()
        .ok_or(EngineError::SystemUnavailable { name: CONTROLLER })?;
    let mut controller = controller
        .try_borrow_mut()
        .map_err(|_| EngineError::SystemUnavailable { name: CONTROLLER })?;
    if !edit(&mut controller, world) {
        log::debug!("[HeldItemMount] No local camera mount point to edit");
    }
    Ok(())
}
