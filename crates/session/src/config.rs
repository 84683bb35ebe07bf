//! Startup configuration, loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file (or no file) yields the stock
//! scene: a blue wireframe cube split into 2 segments per axis.

use cubelab_common::Color;
use cubelab_input::bindings::letter_key;
use cubelab_panel::PanelConfig;
use cubelab_scene::{OrbitControls, PerspectiveCamera};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating a [`SessionConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Initial window size in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "cubelab".into(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// The cube and the ranges of its panel controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    pub size: f32,
    pub segments: u32,
    /// Upper bound of the subdivision slider.
    pub max_segments: u32,
    /// Serialized `#rrggbb` colour.
    pub color: String,
    pub wireframe: bool,
    pub elevation_min: f64,
    pub elevation_max: f64,
    pub elevation_step: f64,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            size: 1.0,
            segments: 2,
            max_segments: 10,
            color: "#0000ff".into(),
            wireframe: true,
            elevation_min: -3.0,
            elevation_max: 3.0,
            elevation_step: 0.01,
        }
    }
}

/// Keyboard shortcuts as written in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Single letter that shows or hides the panel.
    pub toggle_panel: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            toggle_panel: "h".into(),
        }
    }
}

/// Everything a session needs at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub window: WindowConfig,
    pub cube: CubeConfig,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub panel: PanelConfig,
    pub keys: KeyConfig,
    /// Spin the cube about Y at a constant rate.
    pub auto_rotate: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            cube: CubeConfig::default(),
            camera: PerspectiveCamera::default(),
            controls: OrbitControls::default(),
            panel: PanelConfig::default(),
            keys: KeyConfig::default(),
            auto_rotate: true,
        }
    }
}

impl SessionConfig {
    /// Read, parse and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parse and validate YAML text. Empty text yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        let cube = &self.cube;
        if !(cube.size > 0.0) {
            return invalid(format!("cube.size must be positive, got {}", cube.size));
        }
        if cube.max_segments == 0 {
            return invalid("cube.max_segments must be at least 1".into());
        }
        if !(1..=cube.max_segments).contains(&cube.segments) {
            return invalid(format!(
                "cube.segments {} outside 1..={}",
                cube.segments, cube.max_segments
            ));
        }
        if Color::from_hex(&cube.color).is_err() {
            return invalid(format!("cube.color {:?} is not #rrggbb", cube.color));
        }
        if !(cube.elevation_min < cube.elevation_max) {
            return invalid("cube.elevation_min must be below cube.elevation_max".into());
        }
        if !(cube.elevation_step > 0.0) {
            return invalid("cube.elevation_step must be positive".into());
        }
        let cam = &self.camera;
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return invalid(format!("camera.fov {} outside (0, 180)", cam.fov));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return invalid("camera needs 0 < near < far".into());
        }
        let ctl = &self.controls;
        if !(ctl.damping_factor > 0.0 && ctl.damping_factor <= 1.0) {
            return invalid("controls.damping_factor must be in (0, 1]".into());
        }
        if !(ctl.min_distance > 0.0 && ctl.max_distance >= ctl.min_distance) {
            return invalid("controls needs 0 < min_distance <= max_distance".into());
        }
        if !(self.window.width > 0.0 && self.window.height > 0.0) {
            return invalid("window size must be positive".into());
        }
        if let Err(e) = letter_key(&self.keys.toggle_panel) {
            return invalid(format!("keys.toggle_panel: {e}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_stock_scene() {
        let c = SessionConfig::default();
        assert_eq!(c.cube.segments, 2);
        assert_eq!(c.cube.color, "#0000ff");
        assert!(c.cube.wireframe);
        assert_eq!(c.camera.fov, 75.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_text_is_default() {
        assert_eq!(SessionConfig::from_yaml("").unwrap(), SessionConfig::default());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "cube:\n  segments: 4\n  color: '#3a6ea6'\nauto_rotate: false\n";
        let c = SessionConfig::from_yaml(yaml).unwrap();
        assert_eq!(c.cube.segments, 4);
        assert_eq!(c.cube.color, "#3a6ea6");
        assert_eq!(c.cube.max_segments, 10);
        assert!(!c.auto_rotate);
        assert_eq!(c.panel.title, "Debug");
    }

    #[test]
    fn yaml_round_trip() {
        let mut c = SessionConfig::default();
        c.cube.segments = 3;
        c.panel.close_folders = true;
        c.controls.damping_factor = 0.1;
        let back = SessionConfig::from_yaml(&c.to_yaml().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn rejects_bad_values() {
        for yaml in [
            "cube:\n  segments: 0\n",
            "cube:\n  segments: 11\n",
            "cube:\n  color: blue\n",
            "cube:\n  elevation_min: 3\n  elevation_max: -3\n",
            "camera:\n  near: 0\n",
            "controls:\n  damping_factor: 0\n",
            "keys:\n  toggle_panel: F1\n",
        ] {
            assert!(
                matches!(SessionConfig::from_yaml(yaml), Err(ConfigError::Invalid(_))),
                "{yaml}"
            );
        }
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        assert!(matches!(
            SessionConfig::from_yaml("cube: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "window:\n  width: 640\n  height: 480").unwrap();
        let c = SessionConfig::load(tmp.path()).unwrap();
        assert_eq!(c.window.width, 640.0);
        assert_eq!(c.window.height, 480.0);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        let err = SessionConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("nope.yaml"));
    }
}
