//! Headless walkthrough of the first-person held item
//!
//! Usage: held_item_demo [config.toml|config.json]

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use cgmath::Vector3;
use earth_held_item::ecs::SharedSystem;
use earth_held_item::first_person::register_commands;
use earth_held_item::inventory::ItemDropHandler;
use earth_held_item::player::{select_item, use_held_item};
use earth_held_item::scene::world_position;
use earth_held_item::{
    CharacterComponent, ClientComponent, CommandRegistry, EcsWorld, Entity, FirstPersonConfig,
    GameClockSystem, GameTime, HeldItemComponent, HeldItemMountController,
    HeldItemTransformComponent, LocalPlayer, MountPointComponent, Schedule, TransformComponent,
};

const FRAME: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => FirstPersonConfig::load_or_default(path),
        None => FirstPersonConfig::default(),
    };

    let mut world = EcsWorld::new();
    world.insert_resource(GameTime::new());

    let mut schedule = Schedule::new();
    schedule.add(&mut world, Rc::new(RefCell::new(GameClockSystem)));
    let controller = HeldItemMountController::install(&mut world, config.clone());
    schedule.add(&mut world, controller.clone() as SharedSystem);

    let mut commands = CommandRegistry::new();
    register_commands(&mut commands, &controller);

    let camera = world
        .spawn()
        .with(TransformComponent::new(Vector3::new(0.0, 1.6, 0.0)))
        .with(MountPointComponent::from_config(&config.mount_point))
        .build();
    let pickaxe = world
        .spawn()
        .with(HeldItemTransformComponent {
            translate: Vector3::new(0.1, -0.1, -0.3),
            rotate_degrees: Vector3::new(0.0, 45.0, 0.0),
            scale: 0.5,
        })
        .build();
    let torch = world.create_entity();

    let character = world
        .spawn()
        .with(CharacterComponent {
            display_name: "player".to_string(),
        })
        .with(HeldItemComponent::default())
        .build();
    world.insert_resource(LocalPlayer::new(character, camera));

    // Client finished loading: mount whatever is currently held
    let client = world
        .spawn()
        .with(ClientComponent { character, local: false })
        .build();
    world.save_component(client, ClientComponent { character, local: true })?;

    select_item(&mut world, character, pickaxe)?;
    log::info!("Holding {:?} at {:?}", pickaxe, world_position(&world, pickaxe));

    let now = world.resource::<GameTime>().map(GameTime::game_time_ms).unwrap_or_default();
    use_held_item(&mut world, character, now)?;
    for _ in 0..15 {
        schedule.run(&mut world, FRAME);
    }
    log::info!("Mid-swing, pickaxe at {:?}", world_position(&world, pickaxe));

    for line in ["mount_point_translation 0.3 -0.2 -0.5", "mount_point_rotation 0 10 0"] {
        match commands.execute(&mut world, line) {
            Ok(message) => log::info!("{}", message),
            Err(e) => log::warn!("{}", e),
        }
    }

    select_item(&mut world, character, torch)?;
    ItemDropHandler::drop_item(&mut world, torch, Vector3::new(2.0, 0.0, 2.0))?;
    select_item(&mut world, character, Entity::NULL)?;

    for _ in 0..30 {
        schedule.run(&mut world, FRAME);
    }

    let controller = controller.borrow();
    log::info!(
        "Done: holding {:?}, hand {:?}, {} entities",
        controller.current_held_item(),
        controller.existing_hand_entity(),
        world.entity_count()
    );
    Ok(())
}
