use crate::config::ConfigError;
use cubelab_common::ColorError;
use cubelab_input::BindingError;
use cubelab_panel::PanelError;

/// Errors from building a [`Session`](crate::Session).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("panel binding: {0}")]
    Panel(#[from] PanelError),
    #[error("key binding: {0}")]
    Keys(#[from] BindingError),
    #[error("cube colour: {0}")]
    Color(#[from] ColorError),
}
