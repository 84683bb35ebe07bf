//! Debug Panel: declarative parameter binding between live objects and a control panel.
//!
//! A [`Panel`] holds a tree of [`Folder`]s, each holding [`Controller`]s. A controller
//! mirrors one field of a [`Tweakable`] target and writes edits straight back into it,
//! then notifies its change / finish-change listeners.
//!
//! # Invariants
//! - Binding a field the target does not expose fails at bind time.
//! - Panel-driven numeric edits are snapped to the step grid and clamped to the range.
//! - Finish-change fires once per interactive edit, never per intermediate value.
//! - No target borrow is held while listeners run.

pub mod controller;
pub mod error;
pub mod events;
pub mod folder;
pub mod value;
pub mod view;

pub use controller::{BindOptions, ControlKind, Controller, NumberRange};
pub use error::PanelError;
pub use events::{EventChannel, Subscription};
pub use folder::{Folder, Panel, PanelConfig};
pub use value::{FieldKind, FieldValue, Procedure, Target, Tweakable};
