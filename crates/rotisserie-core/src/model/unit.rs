use serde::{Deserialize, Serialize};

use crate::model::ids::UnitId;

/// Group label for units without a category.
pub const UNCATEGORIZED: &str = "other";

/// A unit of measure from the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub abbreviation: Option<String>,

    /// Grouping for selection lists ("volume", "weight", ...). Not enforced.
    pub category: Option<String>,
}

impl Unit {
    /// Case-insensitive substring match on name or abbreviation.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self
                .abbreviation
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains(&query))
    }
}

/// Group units by category, keeping first-seen category order.
///
/// Units without a category land in [`UNCATEGORIZED`].
#[must_use]
pub fn group_units_by_category(units: &[Unit]) -> Vec<(String, Vec<&Unit>)> {
    let mut groups: Vec<(String, Vec<&Unit>)> = Vec::new();
    for unit in units {
        let category = unit.category.as_deref().unwrap_or(UNCATEGORIZED);
        match groups.iter_mut().find(|(name, _)| name == category) {
            Some((_, members)) => members.push(unit),
            None => groups.push((category.to_string(), vec![unit])),
        }
    }
    groups
}
