use crate::error::PanelError;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A zero-argument procedure stored in a field and bound as an action button.
#[derive(Clone)]
pub struct Procedure(Rc<dyn Fn()>);

impl Procedure {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Run the procedure. Return value, if any, is not consumed.
    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Procedure(..)")
    }
}

impl PartialEq for Procedure {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// The value of a bindable field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Bool(bool),
    /// Serialized colour, `#rrggbb`.
    Color(String),
    Action(Procedure),
}

/// Kind of a [`FieldValue`], used for bind-time checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Bool,
    Color,
    Action,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Number => "number",
            Self::Bool => "boolean",
            Self::Color => "colour",
            Self::Action => "action",
        };
        f.write_str(s)
    }
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Number(_) => FieldKind::Number,
            Self::Bool(_) => FieldKind::Bool,
            Self::Color(_) => FieldKind::Color,
            Self::Action(_) => FieldKind::Action,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<&str> {
        match self {
            Self::Color(v) => Some(v),
            _ => None,
        }
    }

    /// Unwrap a number for a write to `field`, or report the kind mismatch.
    pub fn expect_number(&self, field: &str) -> Result<f64, PanelError> {
        self.as_number()
            .ok_or_else(|| PanelError::wrong_kind(field, FieldKind::Number, self.kind()))
    }

    /// Unwrap a boolean for a write to `field`, or report the kind mismatch.
    pub fn expect_bool(&self, field: &str) -> Result<bool, PanelError> {
        self.as_bool()
            .ok_or_else(|| PanelError::wrong_kind(field, FieldKind::Bool, self.kind()))
    }

    /// Unwrap a colour string for a write to `field`, or report the kind mismatch.
    pub fn expect_color(&self, field: &str) -> Result<&str, PanelError> {
        self.as_color()
            .ok_or_else(|| PanelError::wrong_kind(field, FieldKind::Color, self.kind()))
    }
}

/// An object whose fields can be bound to panel controls.
///
/// Field names are plain strings; nested fields use dotted paths such as
/// `"position.y"` or `"material.wireframe"`.
pub trait Tweakable {
    /// Current value of `field`, or `None` if the object has no such field.
    fn field(&self, field: &str) -> Option<FieldValue>;

    /// Write `value` into `field`.
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), PanelError>;
}

/// A bound target as the panel holds it.
pub type Target = Rc<RefCell<dyn Tweakable>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn procedure_call_runs_closure() {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let p = Procedure::new(move || h.set(h.get() + 1));
        p.call();
        p.clone().call();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn procedures_compare_by_identity() {
        let a = Procedure::new(|| {});
        let b = Procedure::new(|| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn expect_helpers_report_kind() {
        let v = FieldValue::Bool(true);
        assert!(v.expect_bool("visible").unwrap());
        let err = v.expect_number("visible").unwrap_err();
        assert!(matches!(
            err,
            PanelError::WrongKind {
                expected: FieldKind::Number,
                actual: FieldKind::Bool,
                ..
            }
        ));
    }

    #[test]
    fn kind_display() {
        assert_eq!(FieldKind::Color.to_string(), "colour");
        assert_eq!(FieldValue::Number(1.0).kind(), FieldKind::Number);
    }
}
