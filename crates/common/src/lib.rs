//! Shared types: spatial transforms, colours and the single-threaded shared handle.

pub mod color;
pub mod types;

pub use color::{Color, ColorError};
pub use types::{Shared, Transform, shared};
