//! egui rendering of a [`Panel`].
//!
//! Widgets read the live value from the target every frame and feed user
//! interaction back through the controller's edit methods, so listeners fire
//! exactly as they would for any other caller.

use crate::controller::{ControlKind, Controller};
use crate::folder::{Folder, Panel};
use crate::value::FieldValue;
use cubelab_common::Color;

/// Draw the panel as a window anchored to the top-right corner.
pub fn show(ctx: &egui::Context, panel: &mut Panel) {
    if panel.is_hidden() {
        return;
    }
    let title = panel.title().to_string();
    let width = panel.width();
    egui::Window::new(title)
        .default_width(width)
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| folder_ui(ui, panel.root_mut()));
}

fn folder_ui(ui: &mut egui::Ui, folder: &mut Folder) {
    for controller in folder.controllers_mut() {
        controller_ui(ui, controller);
    }
    for child in folder.folders_mut() {
        let open = !child.is_closed();
        let label = child.label().to_string();
        let response = egui::CollapsingHeader::new(label)
            .default_open(open)
            .show(ui, |ui| folder_ui(ui, child));
        if response.header_response.clicked() {
            if child.is_closed() {
                child.open();
            } else {
                child.close();
            }
        }
    }
}

fn controller_ui(ui: &mut egui::Ui, controller: &mut Controller) {
    let value = match controller.value() {
        Ok(v) => v,
        Err(e) => {
            ui.colored_label(egui::Color32::RED, e.to_string());
            return;
        }
    };
    let result = match (controller.kind(), value) {
        (ControlKind::Number(range), FieldValue::Number(mut v)) => {
            let label = controller.label().to_string();
            let response = match (range.min, range.max) {
                (Some(min), Some(max)) => {
                    let mut slider = egui::Slider::new(&mut v, min..=max).text(label);
                    if let Some(step) = range.step {
                        slider = slider.step_by(step);
                    }
                    ui.add(slider)
                }
                _ => {
                    ui.horizontal(|ui| {
                        let speed = range.step.unwrap_or(0.1);
                        let r = ui.add(egui::DragValue::new(&mut v).speed(speed));
                        ui.label(label);
                        r
                    })
                    .inner
                }
            };
            let pointer_down = ui.input(|i| i.pointer.any_down());
            number_interaction(controller, &response, v, pointer_down)
        }
        (ControlKind::Toggle, FieldValue::Bool(mut b)) => {
            let label = controller.label().to_string();
            if ui.checkbox(&mut b, label).changed() {
                controller.toggle().map(|_| ())
            } else {
                Ok(())
            }
        }
        (ControlKind::Color, FieldValue::Color(hex)) => {
            let mut rgb = Color::from_hex(&hex)
                .map(Color::to_srgb8)
                .unwrap_or([255, 255, 255]);
            let label = controller.label().to_string();
            let response = ui
                .horizontal(|ui| {
                    let r = ui.color_edit_button_srgb(&mut rgb);
                    ui.label(label);
                    r
                })
                .inner;
            let mut result = Ok(());
            if response.changed() {
                let picked = format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]);
                result = controller.pick_color(&picked);
            }
            // The picker popup stays open while the user drags inside it.
            if result.is_ok() && controller.is_editing() && !ui.memory(|m| m.any_popup_open()) {
                result = controller.release().map(|_| ());
            }
            result
        }
        (ControlKind::Action, FieldValue::Action(_)) => {
            if ui.button(controller.label()).clicked() {
                controller.press()
            } else {
                Ok(())
            }
        }
        (kind, value) => {
            tracing::warn!(
                ?kind,
                actual = %value.kind(),
                field = controller.field(),
                "control/value mismatch"
            );
            Ok(())
        }
    };
    if let Err(e) = result {
        tracing::warn!(field = controller.field(), "panel edit rejected: {e}");
    }
}

fn number_interaction(
    controller: &mut Controller,
    response: &egui::Response,
    value: f64,
    pointer_down: bool,
) -> Result<(), crate::PanelError> {
    if response.changed() {
        controller.drag(value)?;
    }
    // A held button keeps the edit open even while the pointer is still.
    let ended = response.drag_stopped()
        || response.clicked()
        || response.lost_focus()
        || !response.has_focus();
    if controller.is_editing() && !pointer_down && ended {
        controller.release()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::BindOptions;
    use crate::controller::tests::knobs;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn renders_every_control_kind_headless() {
        let k = knobs();
        let mut panel = Panel::default();
        panel
            .bind(&k, "elevation", BindOptions::new().min(-3.0).max(3.0).step(0.01))
            .unwrap();
        let folder = panel.group("Awesome cube");
        folder.bind(&k, "visible", BindOptions::new()).unwrap();
        folder.bind_color(&k, "color", BindOptions::new()).unwrap();
        folder.bind_action(&k, "press", BindOptions::new()).unwrap();

        let ctx = egui::Context::default();
        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| show(ctx, &mut panel));
        }

        // Passive rendering never writes to the target.
        assert_eq!(k.borrow().elevation, 0.0);
        assert_eq!(k.borrow().presses.get(), 0);
    }

    fn frame(
        ctx: &egui::Context,
        controller: &mut Controller,
        events: Vec<egui::Event>,
    ) -> egui::Rect {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(400.0, 200.0),
            )),
            events,
            ..Default::default()
        };
        let mut rect = egui::Rect::NOTHING;
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                controller_ui(ui, controller);
                rect = ui.min_rect();
            });
        });
        rect
    }

    fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn slider_drag_commits_once_on_release() {
        let k = knobs();
        let target: crate::Target = k.clone();
        let mut controller = Controller::bind(
            target,
            "elevation",
            None,
            BindOptions::new().min(-3.0).max(3.0).step(0.01),
        )
        .unwrap();
        let changes = Rc::new(Cell::new(0));
        let finishes = Rc::new(Cell::new(0));
        let _change = controller.on_change({
            let changes = Rc::clone(&changes);
            move |_| changes.set(changes.get() + 1)
        });
        let _finish = controller.on_finish_change({
            let finishes = Rc::clone(&finishes);
            move |_| finishes.set(finishes.get() + 1)
        });

        let ctx = egui::Context::default();
        let rect = frame(&ctx, &mut controller, Vec::new());
        let y = rect.center().y;
        let start = egui::pos2(rect.left() + 15.0, y);
        let mid = egui::pos2(rect.left() + 45.0, y);
        let end = egui::pos2(rect.left() + 75.0, y);

        frame(&ctx, &mut controller, vec![egui::Event::PointerMoved(start)]);
        frame(&ctx, &mut controller, vec![button(start, true)]);
        frame(&ctx, &mut controller, vec![egui::Event::PointerMoved(mid)]);
        frame(&ctx, &mut controller, vec![egui::Event::PointerMoved(end)]);
        assert_eq!(finishes.get(), 0, "held slider must not commit");
        frame(&ctx, &mut controller, vec![button(end, false)]);
        frame(&ctx, &mut controller, Vec::new());

        assert!(changes.get() >= 1);
        assert_eq!(finishes.get(), 1);
        assert!(!controller.is_editing());
        let elevation = k.borrow().elevation;
        assert!((-3.0..=3.0).contains(&elevation));
        assert_ne!(elevation, 0.0);
    }

    #[test]
    fn hidden_panel_draws_nothing() {
        let mut panel = Panel::default();
        panel.hide();
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| show(ctx, &mut panel));
        assert!(output.shapes.is_empty());
    }
}
