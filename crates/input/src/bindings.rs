use crate::action::Action;
use winit::keyboard::KeyCode;

/// Errors from building key bindings out of configuration text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("unsupported key {0:?}, expected a single letter a-z")]
    UnsupportedKey(String),
}

/// Keyboard shortcuts for viewer actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub toggle_panel: KeyCode,
    pub exit_fullscreen: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            toggle_panel: KeyCode::KeyH,
            exit_fullscreen: KeyCode::Escape,
        }
    }
}

impl KeyBindings {
    /// Default bindings with the panel toggle moved to `letter`.
    pub fn with_panel_key(letter: &str) -> Result<Self, BindingError> {
        Ok(Self {
            toggle_panel: letter_key(letter)?,
            ..Self::default()
        })
    }

    /// Map a key press. Releases and auto-repeats produce [`Action::Noop`].
    pub fn map(&self, key: KeyCode, pressed: bool, repeat: bool) -> Action {
        if !pressed || repeat {
            return Action::Noop;
        }
        if key == self.toggle_panel {
            Action::TogglePanel
        } else if key == self.exit_fullscreen {
            Action::ExitFullscreen
        } else {
            Action::Noop
        }
    }
}

/// Parse a single ASCII letter, either case, into its key code.
pub fn letter_key(letter: &str) -> Result<KeyCode, BindingError> {
    let unsupported = || BindingError::UnsupportedKey(letter.to_string());
    let mut chars = letter.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(unsupported());
    };
    let code = match c.to_ascii_lowercase() {
        'a' => KeyCode::KeyA,
        'b' => KeyCode::KeyB,
        'c' => KeyCode::KeyC,
        'd' => KeyCode::KeyD,
        'e' => KeyCode::KeyE,
        'f' => KeyCode::KeyF,
        'g' => KeyCode::KeyG,
        'h' => KeyCode::KeyH,
        'i' => KeyCode::KeyI,
        'j' => KeyCode::KeyJ,
        'k' => KeyCode::KeyK,
        'l' => KeyCode::KeyL,
        'm' => KeyCode::KeyM,
        'n' => KeyCode::KeyN,
        'o' => KeyCode::KeyO,
        'p' => KeyCode::KeyP,
        'q' => KeyCode::KeyQ,
        'r' => KeyCode::KeyR,
        's' => KeyCode::KeyS,
        't' => KeyCode::KeyT,
        'u' => KeyCode::KeyU,
        'v' => KeyCode::KeyV,
        'w' => KeyCode::KeyW,
        'x' => KeyCode::KeyX,
        'y' => KeyCode::KeyY,
        'z' => KeyCode::KeyZ,
        _ => return Err(unsupported()),
    };
    Ok(code)
}
