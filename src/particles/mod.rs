//! Fireworks entities: rockets, their burst sparks, and colors
//!
//! Entities only know how to move themselves one tick. Spawning, removal,
//! and drawing live in the engine.

pub mod color;
pub mod fragment;
pub mod projectile;

pub use color::{Rgb, Rgba};
pub use fragment::{burst, burst_count, Fragment};
pub use projectile::{Flight, Projectile};
