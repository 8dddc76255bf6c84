//! Atelier Core - Foundational types for the Atelier decorative engine
//!
//! This crate provides the types every other Atelier crate depends on:
//! - `Vec3`, `Vec2`, `Rect`, `Ray`, `Color` - spatial and color types
//! - `Camera` - perspective projection and picking rays
//! - `SlotId` - generational arena handles
//! - `SeededRng` - injectable deterministic randomness
//! - Noise fields and easing curves
//! - Error types and Result alias

mod camera;
pub mod easing;
mod error;
mod id;
pub mod noise;
mod rand;
mod types;

pub use camera::{Camera, Projected};
pub use error::{AtelierError, Result};
pub use id::SlotId;
pub use rand::SeededRng;
pub use types::{Color, Ray, Rect, Vec2, Vec3};
