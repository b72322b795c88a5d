pub mod clock;
pub mod game_time;

pub use clock::GameClockSystem;
pub use game_time::GameTime;
