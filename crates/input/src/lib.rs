//! Input mapping: raw window input turned into viewer actions.
//!
//! # Invariants
//! - The session consumes [`Action`]s, never raw window events.
//! - A double-click is two left presses within [`DOUBLE_CLICK_WINDOW`] and
//!   [`DOUBLE_CLICK_SLOP`] pixels; a third press starts a new pair.

pub mod action;
pub mod bindings;
pub mod pointer;

pub use action::Action;
pub use bindings::{BindingError, KeyBindings};
pub use pointer::{DOUBLE_CLICK_SLOP, DOUBLE_CLICK_WINDOW, DoubleClickDetector, PointerState};
