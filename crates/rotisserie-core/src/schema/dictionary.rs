use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result, ValidationError};
use crate::filter::contains_pattern;
use crate::model::{Ingredient, IngredientId, Tag, TagId, Unit};
use crate::normalize::{canonical_ingredient_name, canonical_tag_name};

use super::db::{parse_column, Database};

/// Insert the canonical ingredient, or return the existing row.
///
/// A single `INSERT .. ON CONFLICT .. RETURNING` statement, so concurrent
/// callers with the same name cannot create two rows. On conflict the
/// stored name is overwritten with this call's canonical form.
pub(super) fn upsert_ingredient(conn: &Connection, raw: &str) -> Result<Ingredient> {
    let name = canonical_ingredient_name(raw);
    if name.is_empty() {
        return Err(ValidationError::BlankName { kind: "ingredient" }.into());
    }

    let ingredient = conn
        .query_row(
            "INSERT INTO ingredients (id, name) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET name = excluded.name
             RETURNING id, name",
            params![IngredientId::new().to_string(), name],
            row_to_ingredient,
        )
        .optional()?
        .ok_or(Error::NotPersisted {
            entity: "ingredient",
        })?;

    log::debug!("Resolved ingredient {:?} -> {}", raw, ingredient.id);
    Ok(ingredient)
}

/// Insert the canonical tag, or return the existing row.
pub(super) fn upsert_tag(conn: &Connection, raw: &str) -> Result<Tag> {
    let name = canonical_tag_name(raw);
    if name.is_empty() {
        return Err(ValidationError::BlankName { kind: "tag" }.into());
    }

    let tag = conn
        .query_row(
            "INSERT INTO tags (id, name) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET name = excluded.name
             RETURNING id, name",
            params![TagId::new().to_string(), name],
            row_to_tag,
        )
        .optional()?
        .ok_or(Error::NotPersisted { entity: "tag" })?;

    log::debug!("Resolved tag {:?} -> {}", raw, tag.id);
    Ok(tag)
}

pub(super) fn row_to_ingredient(row: &rusqlite::Row) -> rusqlite::Result<Ingredient> {
    Ok(Ingredient {
        id: parse_column(row, 0)?,
        name: row.get(1)?,
    })
}

pub(super) fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: parse_column(row, 0)?,
        name: row.get(1)?,
    })
}

fn row_to_unit(row: &rusqlite::Row) -> rusqlite::Result<Unit> {
    Ok(Unit {
        id: parse_column(row, 0)?,
        name: row.get(1)?,
        abbreviation: row.get(2)?,
        category: row.get(3)?,
    })
}

// Dictionary lookups
impl Database {
    /// Resolve a raw ingredient name to its dictionary row, creating it if
    /// needed. `"onion"`, `" Onion"` and `"ONION "` all resolve to `"Onion"`.
    pub fn resolve_ingredient(&self, raw: &str) -> Result<Ingredient> {
        upsert_ingredient(&self.conn, raw)
    }

    /// Resolve a raw tag name to its dictionary row, creating it if needed.
    pub fn resolve_tag(&self, raw: &str) -> Result<Tag> {
        upsert_tag(&self.conn, raw)
    }

    /// All tags, alphabetical.
    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM tags ORDER BY name")?;
        let tags = stmt
            .query_map([], row_to_tag)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tags)
    }

    /// All ingredients, alphabetical.
    pub fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM ingredients ORDER BY name")?;
        let ingredients = stmt
            .query_map([], row_to_ingredient)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ingredients)
    }

    /// Ingredients whose name contains `query`, ignoring case.
    pub fn search_ingredients(&self, query: &str) -> Result<Vec<Ingredient>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_ingredients();
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, name FROM ingredients
             WHERE casefold(name) LIKE ?1 ESCAPE '\\'
             ORDER BY name",
        )?;
        let ingredients = stmt
            .query_map([contains_pattern(query)], row_to_ingredient)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ingredients)
    }

    /// All units, by category then name.
    pub fn list_units(&self) -> Result<Vec<Unit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, abbreviation, category FROM units
             ORDER BY category, name",
        )?;
        let units = stmt
            .query_map([], row_to_unit)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(units)
    }

    /// Units whose name or abbreviation contains `query`, ignoring case.
    pub fn search_units(&self, query: &str) -> Result<Vec<Unit>> {
        Ok(self
            .list_units()?
            .into_iter()
            .filter(|unit| unit.matches(query))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_ingredient_variants_share_one_row() {
        let db = Database::open_in_memory().unwrap();

        let a = db.resolve_ingredient("onion").unwrap();
        let b = db.resolve_ingredient("Onion ").unwrap();
        let c = db.resolve_ingredient(" ONION").unwrap();

        assert_eq!(a.id, b.id);
        assert_eq!(b.id, c.id);
        assert_eq!(c.name, "Onion");
        assert_eq!(db.list_ingredients().unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_tag_variants_share_one_row() {
        let db = Database::open_in_memory().unwrap();

        let a = db.resolve_tag("Weeknight").unwrap();
        let b = db.resolve_tag("  weeknight ").unwrap();
        let c = db.resolve_tag("WEEKNIGHT").unwrap();

        assert_eq!(a.id, b.id);
        assert_eq!(b.id, c.id);
        assert_eq!(c.name, "weeknight");
    }

    #[test]
    fn test_resolve_overwrites_legacy_casing() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO ingredients (id, name) VALUES (?1, 'GARLIC')",
                [IngredientId::new().to_string()],
            )
            .unwrap();

        let garlic = db.resolve_ingredient("garlic").unwrap();
        assert_eq!(garlic.name, "Garlic");

        let all = db.list_ingredients().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Garlic");
        assert_eq!(all[0].id, garlic.id);
    }

    #[test]
    fn test_resolve_padded_variant_updates_legacy_row() {
        let db = Database::open_in_memory().unwrap();
        let legacy = IngredientId::new();
        db.conn()
            .execute(
                "INSERT INTO ingredients (id, name) VALUES (?1, 'ONION')",
                [legacy.to_string()],
            )
            .unwrap();

        let onion = db.resolve_ingredient(" onion").unwrap();
        assert_eq!(onion.id, legacy);
        assert_eq!(onion.name, "Onion");

        let all = db.list_ingredients().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Onion");
    }

    #[test]
    fn test_resolve_rejects_blank_names() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.resolve_ingredient("   "),
            Err(Error::Validation(ValidationError::BlankName { kind: "ingredient" }))
        ));
        assert!(matches!(
            db.resolve_tag(""),
            Err(Error::Validation(ValidationError::BlankName { kind: "tag" }))
        ));
    }

    #[test]
    fn test_list_tags_alphabetical() {
        let db = Database::open_in_memory().unwrap();
        for name in ["vegan", "breakfast", "Quick"] {
            db.resolve_tag(name).unwrap();
        }
        let names: Vec<String> = db.list_tags().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["breakfast", "quick", "vegan"]);
    }

    #[test]
    fn test_search_ingredients() {
        let db = Database::open_in_memory().unwrap();
        for name in ["red onion", "spring onion", "garlic", "50% cocoa"] {
            db.resolve_ingredient(name).unwrap();
        }

        let names: Vec<String> = db
            .search_ingredients("ONION")
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Red onion", "Spring onion"]);

        assert_eq!(db.search_ingredients("0%").unwrap().len(), 1);
        assert_eq!(db.search_ingredients("").unwrap().len(), 4);
    }

    #[test]
    fn test_search_ingredients_folds_non_ascii_case() {
        let db = Database::open_in_memory().unwrap();
        for name in ["crème fraîche", "cream cheese"] {
            db.resolve_ingredient(name).unwrap();
        }

        let found = db.search_ingredients("CRÈME FRAÎCHE").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Crème fraîche");
    }

    #[test]
    fn test_list_units_ordered_by_category_then_name() {
        let db = Database::open_in_memory().unwrap();
        let units = db.list_units().unwrap();
        assert!(!units.is_empty());

        let keys: Vec<(Option<String>, String)> = units
            .iter()
            .map(|u| (u.category.clone(), u.name.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_search_units_by_abbreviation() {
        let db = Database::open_in_memory().unwrap();
        let units = db.search_units("tbsp").unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].name, "tablespoon");
    }
}
