use crate::config::{CubeConfig, SessionConfig};
use crate::debug::DebugSettings;
use crate::error::SessionError;
use cubelab_common::{Color, Shared, shared};
use cubelab_input::{Action, KeyBindings};
use cubelab_panel::{BindOptions, Panel, PanelError, Procedure};
use cubelab_scene::{BasicMaterial, BoxGeometry, Scene, SceneParams, spin};
use std::rc::Rc;

/// Window-level change the host must apply after [`Session::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Enter (`true`) or leave (`false`) fullscreen.
    Fullscreen(bool),
    /// The panel was shown (`true`) or hidden (`false`).
    PanelVisible(bool),
}

/// Summary returned by [`Session::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShutdownReport {
    pub frames: u64,
    pub elapsed: f64,
    pub geometries_released: u64,
    /// Geometries still live after teardown. Zero unless something leaked.
    pub geometries_live: usize,
}

/// The running viewer: scene, debug settings, panel and key bindings.
pub struct Session {
    scene: Scene,
    debug: Shared<DebugSettings>,
    panel: Panel,
    keys: KeyBindings,
}

impl Session {
    /// Build the scene and bind the panel. Any binding failure aborts startup.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let cube = &config.cube;
        let color = Color::from_hex(&cube.color)?;
        let geometry = BoxGeometry::cube(cube.size, cube.segments);
        let scene = Scene::build(SceneParams {
            geometry,
            material: BasicMaterial {
                color,
                wireframe: cube.wireframe,
            },
            camera: config.camera,
            controls: config.controls,
            width: config.window.width,
            height: config.window.height,
            device_pixel_ratio: 1.0,
        });

        let tweens = Rc::clone(&scene.tweens);
        let debug = shared(DebugSettings {
            color: color.to_hex(),
            subdivision: cube.segments,
            auto_rotate: config.auto_rotate,
            spin: Procedure::new(move || spin(&tweens)),
        });

        let keys = KeyBindings::with_panel_key(&config.keys.toggle_panel)?;
        let mut panel = Panel::new(config.panel.clone());
        bind_controls(&mut panel, &scene, &debug, cube, geometry)?;
        tracing::info!(
            controls = panel.root().controller_count(),
            hidden = panel.is_hidden(),
            "session started"
        );

        Ok(Self {
            scene,
            debug,
            panel,
            keys,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn debug(&self) -> &Shared<DebugSettings> {
        &self.debug
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    pub fn keys(&self) -> &KeyBindings {
        &self.keys
    }

    /// Apply a new logical window size and device pixel ratio.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.scene.resize(width, height, device_pixel_ratio);
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.scene.toggle_fullscreen()
    }

    /// Show or hide the panel; returns true if it is now visible.
    pub fn toggle_panel(&mut self) -> bool {
        self.panel.toggle_visibility()
    }

    /// Apply an input action.
    pub fn handle(&mut self, action: Action) -> Effect {
        match action {
            Action::TogglePanel => Effect::PanelVisible(self.toggle_panel()),
            Action::ToggleFullscreen => Effect::Fullscreen(self.toggle_fullscreen()),
            Action::ExitFullscreen => {
                if self.scene.viewport.is_fullscreen() {
                    self.scene.viewport.set_fullscreen(false);
                    tracing::info!("fullscreen left");
                    Effect::Fullscreen(false)
                } else {
                    Effect::None
                }
            }
            Action::Orbit(delta) => {
                let (_, height) = self.scene.viewport.drawing_buffer_size();
                self.scene.controls.rotate(delta.x, delta.y, height as f32);
                Effect::None
            }
            Action::Zoom(steps) => {
                self.scene.controls.zoom(steps);
                Effect::None
            }
            Action::Noop => Effect::None,
        }
    }

    /// Advance one frame.
    pub fn tick(&mut self, dt: f32) {
        let auto_rotate = self.debug.borrow().auto_rotate;
        self.scene.tick(dt, auto_rotate);
    }

    /// Tear down: release every geometry and report what happened.
    pub fn shutdown(mut self) -> ShutdownReport {
        self.scene.dispose();
        let store = self.scene.geometries.borrow();
        let report = ShutdownReport {
            frames: self.scene.frame(),
            elapsed: self.scene.clock.elapsed(),
            geometries_released: store.released_total(),
            geometries_live: store.live_count(),
        };
        if report.geometries_live > 0 {
            tracing::warn!(live = report.geometries_live, "geometries leaked at shutdown");
        }
        tracing::info!(frames = report.frames, "session shut down");
        report
    }
}

/// Declare the panel: an auto-rotate toggle at the root and the cube folder.
fn bind_controls(
    panel: &mut Panel,
    scene: &Scene,
    debug: &Shared<DebugSettings>,
    cube: &CubeConfig,
    geometry: BoxGeometry,
) -> Result<(), PanelError> {
    panel.bind(debug, "auto_rotate", BindOptions::new().name("auto rotate"))?;

    let folder = panel.group("Awesome cube");
    folder.bind(
        &scene.mesh,
        "position.y",
        BindOptions::new()
            .min(cube.elevation_min)
            .max(cube.elevation_max)
            .step(cube.elevation_step)
            .name("elevation"),
    )?;
    folder.bind(&scene.mesh, "visible", BindOptions::new())?;
    folder.bind(
        &scene.mesh,
        "material.wireframe",
        BindOptions::new().name("wireframe"),
    )?;

    let mesh = Rc::clone(&scene.mesh);
    folder
        .bind_color(debug, "color", BindOptions::new())?
        .on_change(move |value| {
            let Some(hex) = value.as_color() else { return };
            match Color::from_hex(hex) {
                Ok(color) => mesh.borrow_mut().material.color = color,
                Err(e) => tracing::warn!("colour not applied: {e}"),
            }
        });

    folder.bind_action(debug, "spin", BindOptions::new())?;

    let mesh = Rc::clone(&scene.mesh);
    let store = Rc::clone(&scene.geometries);
    folder
        .bind(
            debug,
            "subdivision",
            BindOptions::new()
                .min(1.0)
                .max(cube.max_segments as f64)
                .step(1.0),
        )?
        .on_finish_change(move |value| {
            let Some(n) = value.as_number() else { return };
            let segments = n.round().max(1.0) as u32;
            mesh.borrow_mut()
                .replace_geometry(&mut store.borrow_mut(), geometry.with_segments(segments));
        });
    Ok(())
}
