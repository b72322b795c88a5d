pub mod drop_handler;
pub mod pickup;

pub use drop_handler::ItemDropHandler;
pub use pickup::{ItemDroppedEvent, PickupComponent};
