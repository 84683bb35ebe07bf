use cubelab_common::Color;
use cubelab_panel::{FieldValue, PanelError, Procedure, Tweakable};

/// Values staged for the panel that cannot be bound onto the scene directly.
///
/// `color` and `subdivision` reach the mesh only through listeners; `spin`
/// is invoked by an action button.
#[derive(Debug, Clone)]
pub struct DebugSettings {
    /// Serialized `#rrggbb` colour of the cube.
    pub color: String,
    /// Segments per axis of the cube geometry.
    pub subdivision: u32,
    pub auto_rotate: bool,
    pub spin: Procedure,
}

impl Tweakable for DebugSettings {
    fn field(&self, field: &str) -> Option<FieldValue> {
        match field {
            "color" => Some(FieldValue::Color(self.color.clone())),
            "subdivision" => Some(FieldValue::Number(self.subdivision as f64)),
            "auto_rotate" => Some(FieldValue::Bool(self.auto_rotate)),
            "spin" => Some(FieldValue::Action(self.spin.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), PanelError> {
        match field {
            "color" => self.color = Color::from_hex(value.expect_color(field)?)?.to_hex(),
            "subdivision" => {
                let n = value.expect_number(field)?;
                self.subdivision = n.round().max(0.0) as u32;
            }
            "auto_rotate" => self.auto_rotate = value.expect_bool(field)?,
            "spin" => {
                return Err(PanelError::ReadOnly {
                    field: field.to_string(),
                });
            }
            _ => return Err(PanelError::unknown(field)),
        }
        Ok(())
    }
}
