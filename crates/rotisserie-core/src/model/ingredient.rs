use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::ids::IngredientId;
use crate::model::unit::Unit;

/// An entry in the shared ingredient dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,

    /// Canonical display name ("Olive oil", "Onion").
    pub name: String,
}

/// One ingredient line of a persisted recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub ingredient_id: IngredientId,

    /// Canonical ingredient name, joined from the dictionary.
    pub name: String,

    pub quantity: Option<f64>,

    /// Unit name; free text that need not exist in the unit table.
    pub unit: Option<String>,

    pub notes: Option<String>,

    /// Zero-based position within the recipe.
    pub sort_order: u32,
}

impl IngredientLine {
    /// Render quantity and unit ("2 cup", "1.5 tbsp", "pinch").
    ///
    /// A unit found in `units` by name is shown by its abbreviation.
    #[must_use]
    pub fn display_quantity(&self, units: &[Unit]) -> Option<String> {
        let unit = self.unit.as_deref().map(|name| {
            units
                .iter()
                .find(|u| u.name == name)
                .and_then(|u| u.abbreviation.as_deref())
                .unwrap_or(name)
        });

        match (self.quantity, unit) {
            (Some(q), Some(u)) => Some(format!("{q} {u}")),
            (Some(q), None) => Some(q.to_string()),
            (None, Some(u)) => Some(u.to_string()),
            (None, None) => None,
        }
    }
}

/// Input for one ingredient line of a new or updated recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientInput {
    /// Raw ingredient name; canonicalized before dictionary lookup.
    #[serde(alias = "ingredient_name")]
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl IngredientInput {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyIngredientName { index });
        }
        match self.quantity {
            Some(q) if !(q.is_finite() && q > 0.0) => {
                Err(ValidationError::InvalidQuantity { index })
            }
            _ => Ok(()),
        }
    }
}
