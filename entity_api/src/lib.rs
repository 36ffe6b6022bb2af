pub use entity::{scoreboards, users, Id};

pub mod error;
pub mod scoreboard;
pub mod user;
