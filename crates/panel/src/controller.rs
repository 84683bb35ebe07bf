use crate::error::PanelError;
use crate::events::{EventChannel, Subscription};
use crate::value::{FieldKind, FieldValue, Target};
use cubelab_common::Color;

/// Numeric slider constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumberRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl NumberRange {
    /// Constrain a panel-driven value: snap to the step grid, then clamp.
    ///
    /// The grid is anchored at `min` (or `max` when only a maximum is set), so a
    /// snapped value is always `min + k * step`. The upper clamp uses the last
    /// grid point not above `max`.
    pub fn constrain(&self, value: f64) -> f64 {
        let mut v = value;
        let anchor = self.min.or(self.max).unwrap_or(0.0);
        if let Some(step) = self.step {
            v = anchor + ((v - anchor) / step).round() * step;
        }
        if let Some(min) = self.min {
            if v < min {
                v = min;
            }
        }
        if let Some(max) = self.max {
            if v > max {
                v = match self.step {
                    Some(step) => anchor + ((max - anchor) / step + 1e-9).floor() * step,
                    None => max,
                };
            }
        }
        v
    }

    /// Constrain a programmatic write: clamped only when a step is set.
    pub fn constrain_programmatic(&self, value: f64) -> f64 {
        if self.step.is_none() {
            return value;
        }
        let mut v = value;
        if let Some(min) = self.min {
            v = v.max(min);
        }
        if let Some(max) = self.max {
            v = v.min(max);
        }
        v
    }

    fn has_bounds(&self) -> bool {
        self.min.is_some() || self.max.is_some() || self.step.is_some()
    }

    fn validate(&self, field: &str) -> Result<(), PanelError> {
        let invalid = |reason: String| PanelError::InvalidRange {
            field: field.to_string(),
            reason,
        };
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(invalid(format!("min {min} is greater than max {max}")));
            }
        }
        if let Some(step) = self.step {
            if !(step > 0.0 && step.is_finite()) {
                return Err(invalid(format!("step {step} must be positive")));
            }
        }
        Ok(())
    }
}

/// Options accepted by the `bind*` operations.
#[derive(Debug, Clone, Default)]
pub struct BindOptions {
    pub range: NumberRange,
    pub name: Option<String>,
}

impl BindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, min: f64) -> Self {
        self.range.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.range.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.range.step = Some(step);
        self
    }

    /// Display label. Defaults to the field name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// What kind of widget a controller shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Number(NumberRange),
    Toggle,
    Color,
    Action,
}

impl ControlKind {
    fn field_kind(&self) -> FieldKind {
        match self {
            Self::Number(_) => FieldKind::Number,
            Self::Toggle => FieldKind::Bool,
            Self::Color => FieldKind::Color,
            Self::Action => FieldKind::Action,
        }
    }
}

/// One bound control: a target field plus its listeners.
pub struct Controller {
    label: String,
    field: String,
    kind: ControlKind,
    target: Target,
    change: EventChannel<FieldValue>,
    finish_change: EventChannel<FieldValue>,
    editing: bool,
}

impl Controller {
    /// Create a controller for `field` on `target`.
    ///
    /// `requested` is the kind the caller asked for; `None` accepts numbers,
    /// booleans and actions (the generic `bind` operation).
    pub(crate) fn bind(
        target: Target,
        field: &str,
        requested: Option<FieldKind>,
        options: BindOptions,
    ) -> Result<Self, PanelError> {
        let current = target
            .borrow()
            .field(field)
            .ok_or_else(|| PanelError::unknown(field))?;
        let actual = current.kind();

        if let Some(expected) = requested {
            if expected != actual {
                return Err(PanelError::wrong_kind(field, expected, actual));
            }
        } else if actual == FieldKind::Color {
            return Err(PanelError::wrong_kind(field, FieldKind::Number, actual));
        }

        if actual != FieldKind::Number && options.range.has_bounds() {
            return Err(PanelError::NumericOptionsOnNonNumber {
                field: field.to_string(),
            });
        }
        options.range.validate(field)?;

        let kind = match actual {
            FieldKind::Number => ControlKind::Number(options.range),
            FieldKind::Bool => ControlKind::Toggle,
            FieldKind::Color => ControlKind::Color,
            FieldKind::Action => ControlKind::Action,
        };
        let label = options.name.unwrap_or_else(|| field.to_string());
        tracing::debug!(field, label = %label, ?kind, "bound control");

        Ok(Self {
            label,
            field: field.to_string(),
            kind,
            target,
            change: EventChannel::new(),
            finish_change: EventChannel::new(),
            editing: false,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Rename the display label.
    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = label.into();
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    /// Numeric range, if this is a number control.
    pub fn range(&self) -> Option<NumberRange> {
        match self.kind {
            ControlKind::Number(range) => Some(range),
            _ => None,
        }
    }

    /// True between the first panel-driven edit and the matching `release`.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Read the live value from the target.
    pub fn value(&self) -> Result<FieldValue, PanelError> {
        self.target
            .borrow()
            .field(&self.field)
            .ok_or_else(|| PanelError::unknown(&self.field))
    }

    /// Subscribe to every write made through this controller.
    pub fn on_change(&self, listener: impl Fn(&FieldValue) + 'static) -> Subscription {
        self.change.subscribe(listener)
    }

    /// Subscribe to committed edits: fires once when an interactive edit ends.
    pub fn on_finish_change(&self, listener: impl Fn(&FieldValue) + 'static) -> Subscription {
        self.finish_change.subscribe(listener)
    }

    /// Panel-driven numeric edit (slider drag or typed value).
    ///
    /// Returns the value actually written after snapping and clamping.
    pub fn drag(&mut self, value: f64) -> Result<f64, PanelError> {
        let ControlKind::Number(range) = self.kind else {
            return Err(self.kind_error(FieldKind::Number));
        };
        self.ensure_finite(value)?;
        let constrained = range.constrain(value);
        self.write(FieldValue::Number(constrained))?;
        self.editing = true;
        self.change.emit(&FieldValue::Number(constrained));
        Ok(constrained)
    }

    /// Panel-driven colour edit. `hex` is validated before it is written.
    pub fn pick_color(&mut self, hex: &str) -> Result<(), PanelError> {
        if self.kind != ControlKind::Color {
            return Err(self.kind_error(FieldKind::Color));
        }
        let normalized = Color::from_hex(hex)?.to_hex();
        let value = FieldValue::Color(normalized);
        self.write(value.clone())?;
        self.editing = true;
        self.change.emit(&value);
        Ok(())
    }

    /// End an interactive edit. Fires finish-change once if anything was
    /// written since the edit began; returns whether it fired.
    pub fn release(&mut self) -> Result<bool, PanelError> {
        if !self.editing {
            return Ok(false);
        }
        self.editing = false;
        let value = self.value()?;
        self.finish_change.emit(&value);
        Ok(true)
    }

    /// Flip a boolean control. Change and finish-change both fire.
    pub fn toggle(&mut self) -> Result<bool, PanelError> {
        if self.kind != ControlKind::Toggle {
            return Err(self.kind_error(FieldKind::Bool));
        }
        let next = !self.value()?.expect_bool(&self.field)?;
        let value = FieldValue::Bool(next);
        self.write(value.clone())?;
        self.change.emit(&value);
        self.finish_change.emit(&value);
        Ok(next)
    }

    /// Invoke an action control's procedure.
    pub fn press(&mut self) -> Result<(), PanelError> {
        if self.kind != ControlKind::Action {
            return Err(self.kind_error(FieldKind::Action));
        }
        let value = self.value()?;
        let FieldValue::Action(procedure) = &value else {
            return Err(PanelError::wrong_kind(
                &self.field,
                FieldKind::Action,
                value.kind(),
            ));
        };
        tracing::debug!(field = %self.field, "action pressed");
        procedure.call();
        self.change.emit(&value);
        self.finish_change.emit(&value);
        Ok(())
    }

    /// Programmatic write. Numbers are clamped only when the control has a step.
    pub fn set_value(&mut self, value: FieldValue) -> Result<(), PanelError> {
        let expected = self.kind.field_kind();
        if value.kind() != expected {
            return Err(PanelError::wrong_kind(&self.field, expected, value.kind()));
        }
        let value = match (&self.kind, value) {
            (ControlKind::Action, _) => {
                return Err(PanelError::ReadOnly {
                    field: self.field.clone(),
                });
            }
            (ControlKind::Number(range), FieldValue::Number(v)) => {
                self.ensure_finite(v)?;
                FieldValue::Number(range.constrain_programmatic(v))
            }
            (ControlKind::Color, FieldValue::Color(hex)) => {
                FieldValue::Color(Color::from_hex(&hex)?.to_hex())
            }
            (_, other) => other,
        };
        self.write(value.clone())?;
        self.change.emit(&value);
        self.finish_change.emit(&value);
        Ok(())
    }

    fn ensure_finite(&self, value: f64) -> Result<(), PanelError> {
        if value.is_finite() {
            return Ok(());
        }
        Err(PanelError::NonFinite {
            field: self.field.clone(),
            value,
        })
    }

    fn write(&self, value: FieldValue) -> Result<(), PanelError> {
        self.target.borrow_mut().set_field(&self.field, value)
    }

    fn kind_error(&self, requested: FieldKind) -> PanelError {
        PanelError::wrong_kind(&self.field, self.kind.field_kind(), requested)
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("label", &self.label)
            .field("field", &self.field)
            .field("kind", &self.kind)
            .field("editing", &self.editing)
            .finish_non_exhaustive()
    }
}
