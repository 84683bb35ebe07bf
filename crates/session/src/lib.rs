//! Session: the explicit context that owns the scene, the debug settings
//! object and the panel bindings between them.
//!
//! # Invariants
//! - All shared state lives in a [`Session`]; nothing is module-global.
//! - Directly bound numeric and boolean fields are the scene's own storage.
//! - Colour and subdivision edits reach the scene only through listeners.

pub mod config;
pub mod debug;
pub mod error;
pub mod session;

pub use config::{ConfigError, CubeConfig, SessionConfig, WindowConfig};
pub use debug::DebugSettings;
pub use error::SessionError;
pub use session::{Effect, Session, ShutdownReport};
