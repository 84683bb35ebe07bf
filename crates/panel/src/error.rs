use crate::value::FieldKind;
use cubelab_common::ColorError;

/// Errors from binding or editing panel controls.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("no field {field:?} on the bound target")]
    UnknownField { field: String },
    #[error("field {field:?} holds a {actual} value, expected {expected}")]
    WrongKind {
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },
    #[error("min/max/step given for non-numeric field {field:?}")]
    NumericOptionsOnNonNumber { field: String },
    #[error("invalid range for {field:?}: {reason}")]
    InvalidRange { field: String, reason: String },
    #[error("non-finite value {value} for {field:?}")]
    NonFinite { field: String, value: f64 },
    #[error("field {field:?} cannot be written")]
    ReadOnly { field: String },
    #[error(transparent)]
    InvalidColor(#[from] ColorError),
}

impl PanelError {
    /// Shorthand for the error a [`Tweakable`](crate::Tweakable) returns for an unknown name.
    pub fn unknown(field: &str) -> Self {
        Self::UnknownField {
            field: field.to_string(),
        }
    }

    /// Shorthand for a kind mismatch on write.
    pub fn wrong_kind(field: &str, expected: FieldKind, actual: FieldKind) -> Self {
        Self::WrongKind {
            field: field.to_string(),
            expected,
            actual,
        }
    }
}
