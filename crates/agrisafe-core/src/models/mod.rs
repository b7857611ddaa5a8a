//! Domain models for the AgriSafe system.

mod doctor;
mod farmer;
mod item;
mod recommendation;
mod shop;

pub use doctor::*;
pub use farmer::*;
pub use item::*;
pub use recommendation::*;
pub use shop::*;
