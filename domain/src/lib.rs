//! Login and scoreboard logic, independent of HTTP.
//!
//! Entity types are re-exported from `entity_api` so that consumers of `domain` do not need
//! to depend on the entity crates directly.
pub use entity_api::{scoreboards, users, Id};

pub mod error;
pub mod gateway;
pub mod login_state;
pub mod oauth_login;
pub mod scoreboard;
pub mod user;
