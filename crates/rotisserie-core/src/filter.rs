//! Recipe list filtering.
//!
//! A [`RecipeFilter`] is turned into a SQL `WHERE` clause over the `recipes`
//! table (aliased `r`). Criteria are ANDed together; within a criterion any
//! value may match. Tag and ingredient criteria use `EXISTS` sub-queries,
//! so a recipe matching several values is still returned once.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::model::IngredientId;
use crate::normalize::canonical_tag_name;

/// Optional criteria for listing recipes. The default filter matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFilter {
    /// Case-insensitive substring of the recipe name.
    #[serde(default)]
    pub search: Option<String>,

    /// Recipe has at least one of these tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Recipe uses at least one of these ingredients.
    #[serde(default)]
    pub ingredient_ids: Vec<IngredientId>,
}

/// A `WHERE` clause and its positional parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    /// Empty when the filter imposes no constraint, otherwise starts with
    /// `" WHERE "`.
    pub sql: String,
    pub params: Vec<Value>,
}

impl RecipeFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn with_ingredient(mut self, id: IngredientId) -> Self {
        self.ingredient_ids.push(id);
        self
    }

    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns `true` if the filter matches every recipe.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search_term().is_none() && self.tags.is_empty() && self.ingredient_ids.is_empty()
    }

    /// Build the `WHERE` clause for this filter.
    #[must_use]
    pub fn predicate(&self) -> Predicate {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(search) = self.search_term() {
            params.push(Value::Text(contains_pattern(search)));
            conditions.push(format!(
                "casefold(r.name) LIKE ?{} ESCAPE '\\'",
                params.len()
            ));
        }

        if !self.tags.is_empty() {
            let slots = placeholders(params.len() + 1, self.tags.len());
            params.extend(self.tags.iter().map(|t| Value::Text(canonical_tag_name(t))));
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
                 WHERE rt.recipe_id = r.id AND t.name IN ({slots}))"
            ));
        }

        if !self.ingredient_ids.is_empty() {
            let slots = placeholders(params.len() + 1, self.ingredient_ids.len());
            params.extend(self.ingredient_ids.iter().map(|id| Value::Text(id.to_string())));
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM recipe_ingredients ri \
                 WHERE ri.recipe_id = r.id AND ri.ingredient_id IN ({slots}))"
            ));
        }

        let sql = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        Predicate { sql, params }
    }
}

/// `LIKE` pattern matching `term` anywhere in a `casefold`ed column.
///
/// The term is lower-cased here so non-ASCII letters compare folded on
/// both sides.
pub(crate) fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(&term.to_lowercase()))
}

/// Escape `LIKE` wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `?3, ?4, ?5` for `start = 3, count = 3`.
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_where_clause() {
        let predicate = RecipeFilter::new().predicate();
        assert!(predicate.sql.is_empty());
        assert!(predicate.params.is_empty());
        assert!(RecipeFilter::new().with_search("").is_empty());
    }

    #[test]
    fn test_search_only() {
        let predicate = RecipeFilter::new().with_search("soup").predicate();
        assert_eq!(predicate.sql, " WHERE casefold(r.name) LIKE ?1 ESCAPE '\\'");
        assert_eq!(predicate.params, vec![Value::Text("%soup%".to_string())]);
    }

    #[test]
    fn test_tags_are_canonicalized() {
        let predicate = RecipeFilter::new()
            .with_tag(" Vegan ")
            .with_tag("QUICK")
            .predicate();
        assert!(predicate.sql.contains("t.name IN (?1, ?2)"));
        assert_eq!(
            predicate.params,
            vec![
                Value::Text("vegan".to_string()),
                Value::Text("quick".to_string())
            ]
        );
    }

    #[test]
    fn test_all_criteria_are_anded_with_sequential_placeholders() {
        let a = IngredientId::new();
        let b = IngredientId::new();
        let predicate = RecipeFilter::new()
            .with_search("pie")
            .with_tag("dessert")
            .with_ingredient(a)
            .with_ingredient(b)
            .predicate();

        assert_eq!(predicate.sql.matches(" AND EXISTS").count(), 2);
        assert!(predicate.sql.contains("t.name IN (?2)"));
        assert!(predicate.sql.contains("ri.ingredient_id IN (?3, ?4)"));
        assert_eq!(predicate.params.len(), 4);
        assert_eq!(predicate.params[2], Value::Text(a.to_string()));
    }

    #[test]
    fn test_contains_pattern_lowercases_unicode() {
        assert_eq!(contains_pattern("BRÛLÉE"), "%brûlée%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1, 1), "?1");
        assert_eq!(placeholders(3, 3), "?3, ?4, ?5");
    }
}
