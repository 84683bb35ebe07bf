use crate::controller::{BindOptions, Controller};
use crate::error::PanelError;
use crate::value::{FieldKind, Target, Tweakable};
use cubelab_common::Shared;
use serde::{Deserialize, Serialize};

/// A named group of controllers and nested folders.
///
/// Folders only organize the display; they have no effect on data flow.
#[derive(Debug)]
pub struct Folder {
    label: String,
    closed: bool,
    close_children: bool,
    controllers: Vec<Controller>,
    folders: Vec<Folder>,
}

impl Folder {
    fn new(label: impl Into<String>, closed: bool) -> Self {
        Self {
            label: label.into(),
            closed,
            close_children: closed,
            controllers: Vec::new(),
            folders: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bind a numeric, boolean or action field.
    pub fn bind<T: Tweakable + 'static>(
        &mut self,
        target: &Shared<T>,
        field: &str,
        options: BindOptions,
    ) -> Result<&mut Controller, PanelError> {
        self.push(target, field, None, options)
    }

    /// Bind a colour field holding a `#rrggbb` string.
    pub fn bind_color<T: Tweakable + 'static>(
        &mut self,
        target: &Shared<T>,
        field: &str,
        options: BindOptions,
    ) -> Result<&mut Controller, PanelError> {
        self.push(target, field, Some(FieldKind::Color), options)
    }

    /// Bind a field holding a [`Procedure`](crate::Procedure) as a button.
    pub fn bind_action<T: Tweakable + 'static>(
        &mut self,
        target: &Shared<T>,
        field: &str,
        options: BindOptions,
    ) -> Result<&mut Controller, PanelError> {
        self.push(target, field, Some(FieldKind::Action), options)
    }

    /// Add a nested folder.
    pub fn group(&mut self, label: impl Into<String>) -> &mut Folder {
        let folder = Folder::new(label, self.close_children);
        self.folders.push(folder);
        let last = self.folders.len() - 1;
        &mut self.folders[last]
    }

    pub fn close(&mut self) -> &mut Self {
        self.closed = true;
        self
    }

    pub fn open(&mut self) -> &mut Self {
        self.closed = false;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut [Controller] {
        &mut self.controllers
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folders_mut(&mut self) -> &mut [Folder] {
        &mut self.folders
    }

    /// Depth-first search for a controller by display label.
    pub fn find(&mut self, label: &str) -> Option<&mut Controller> {
        if let Some(idx) = self.controllers.iter().position(|c| c.label() == label) {
            return Some(&mut self.controllers[idx]);
        }
        self.folders.iter_mut().find_map(|f| f.find(label))
    }

    /// Total controllers in this folder and below.
    pub fn controller_count(&self) -> usize {
        self.controllers.len()
            + self
                .folders
                .iter()
                .map(Folder::controller_count)
                .sum::<usize>()
    }

    fn push<T: Tweakable + 'static>(
        &mut self,
        target: &Shared<T>,
        field: &str,
        requested: Option<FieldKind>,
        options: BindOptions,
    ) -> Result<&mut Controller, PanelError> {
        let target: Target = target.clone();
        let controller = Controller::bind(target, field, requested, options)?;
        self.controllers.push(controller);
        let last = self.controllers.len() - 1;
        Ok(&mut self.controllers[last])
    }
}

/// Panel appearance and startup state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub title: String,
    pub width: f32,
    /// New folders start closed.
    pub close_folders: bool,
    pub hidden: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            title: "Debug".into(),
            width: 300.0,
            close_folders: false,
            hidden: false,
        }
    }
}

/// The debug panel: a root folder plus window chrome.
#[derive(Debug)]
pub struct Panel {
    title: String,
    width: f32,
    hidden: bool,
    root: Folder,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new(PanelConfig::default())
    }
}

impl Panel {
    pub fn new(config: PanelConfig) -> Self {
        let mut root = Folder::new(config.title.clone(), false);
        root.close_children = config.close_folders;
        Self {
            title: config.title,
            width: config.width,
            hidden: config.hidden,
            root,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    /// Flip visibility; returns true if the panel is now visible.
    pub fn toggle_visibility(&mut self) -> bool {
        self.hidden = !self.hidden;
        tracing::info!(visible = !self.hidden, "debug panel toggled");
        !self.hidden
    }

    pub fn root(&self) -> &Folder {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Folder {
        &mut self.root
    }

    pub fn bind<T: Tweakable + 'static>(
        &mut self,
        target: &Shared<T>,
        field: &str,
        options: BindOptions,
    ) -> Result<&mut Controller, PanelError> {
        self.root.bind(target, field, options)
    }

    pub fn bind_color<T: Tweakable + 'static>(
        &mut self,
        target: &Shared<T>,
        field: &str,
        options: BindOptions,
    ) -> Result<&mut Controller, PanelError> {
        self.root.bind_color(target, field, options)
    }

    pub fn bind_action<T: Tweakable + 'static>(
        &mut self,
        target: &Shared<T>,
        field: &str,
        options: BindOptions,
    ) -> Result<&mut Controller, PanelError> {
        self.root.bind_action(target, field, options)
    }

    pub fn group(&mut self, label: impl Into<String>) -> &mut Folder {
        self.root.group(label)
    }

    pub fn find(&mut self, label: &str) -> Option<&mut Controller> {
        self.root.find(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::knobs;
    use crate::value::FieldValue;

    #[test]
    fn folders_nest_and_share_targets() {
        let k = knobs();
        let mut panel = Panel::default();
        panel
            .bind(&k, "elevation", BindOptions::new().min(-3.0).max(3.0).step(0.01))
            .unwrap();
        let cube = panel.group("Awesome cube");
        cube.bind(&k, "visible", BindOptions::new()).unwrap();
        cube.bind_color(&k, "color", BindOptions::new()).unwrap();
        cube.bind_action(&k, "press", BindOptions::new().name("spin"))
            .unwrap();

        assert_eq!(panel.root().controller_count(), 4);
        assert_eq!(panel.root().folders()[0].label(), "Awesome cube");

        // Both the root control and a foldered control reach the same object.
        panel.find("elevation").unwrap().drag(1.0).unwrap();
        panel.find("spin").unwrap().press().unwrap();
        assert!((k.borrow().elevation - 1.0).abs() < 1e-9);
        assert_eq!(k.borrow().presses.get(), 1);
    }

    #[test]
    fn bind_color_on_number_is_rejected() {
        let k = knobs();
        let mut panel = Panel::default();
        let err = panel
            .bind_color(&k, "elevation", BindOptions::new())
            .unwrap_err();
        assert!(matches!(err, PanelError::WrongKind { .. }));
        assert_eq!(panel.root().controller_count(), 0);
    }

    #[test]
    fn bind_action_on_bool_is_rejected() {
        let k = knobs();
        let mut panel = Panel::default();
        assert!(panel.bind_action(&k, "visible", BindOptions::new()).is_err());
    }

    #[test]
    fn close_folders_applies_to_new_groups() {
        let mut panel = Panel::new(PanelConfig {
            close_folders: true,
            ..PanelConfig::default()
        });
        assert!(panel.group("a").is_closed());
        let b = panel.group("b");
        b.open();
        assert!(!b.is_closed());
        assert!(b.group("nested").is_closed());
    }

    #[test]
    fn toggle_visibility_flips() {
        let mut panel = Panel::default();
        assert!(!panel.is_hidden());
        assert!(!panel.toggle_visibility());
        assert!(panel.is_hidden());
        assert!(panel.toggle_visibility());
    }

    #[test]
    fn programmatic_set_through_panel() {
        let k = knobs();
        let mut panel = Panel::default();
        panel
            .bind(&k, "visible", BindOptions::new().name("Visible"))
            .unwrap();
        panel
            .find("Visible")
            .unwrap()
            .set_value(FieldValue::Bool(false))
            .unwrap();
        assert!(!k.borrow().visible);
    }
}
