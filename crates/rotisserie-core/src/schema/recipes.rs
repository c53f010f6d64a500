use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::filter::{contains_pattern, RecipeFilter};
use crate::model::recipe::non_blank;
use crate::model::{
    IngredientInput, IngredientLine, NewRecipe, Recipe, RecipeId, RecipePatch, RecipeWithDetails,
};

use super::db::{parse_column, timestamp, Database};
use super::dictionary::{row_to_tag, upsert_ingredient, upsert_tag};

/// Shortest pattern [`Database::delete_recipes_by_pattern`] accepts.
pub const MIN_CLEANUP_PATTERN_LEN: usize = 3;

const RECIPE_COLUMNS: &str = "id, name, instructions, prep_time_minutes, cook_time_minutes, \
     servings, source_url, notes, created_at, updated_at";

fn row_to_recipe(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: parse_column(row, 0)?,
        name: row.get(1)?,
        instructions: row.get(2)?,
        prep_time_minutes: row.get(3)?,
        cook_time_minutes: row.get(4)?,
        servings: row.get(5)?,
        source_url: row.get(6)?,
        notes: row.get(7)?,
        created_at: parse_column(row, 8)?,
        updated_at: parse_column(row, 9)?,
    })
}

fn row_to_line(row: &rusqlite::Row) -> rusqlite::Result<IngredientLine> {
    Ok(IngredientLine {
        ingredient_id: parse_column(row, 0)?,
        name: row.get(1)?,
        quantity: row.get(2)?,
        unit: row.get(3)?,
        notes: row.get(4)?,
        sort_order: row.get(5)?,
    })
}

/// Insert ingredient lines with `sort_order` equal to their position.
fn insert_lines(conn: &Connection, recipe_id: &RecipeId, lines: &[IngredientInput]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, unit, notes, sort_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    for (index, line) in lines.iter().enumerate() {
        let sort_order = i64::try_from(index)
            .map_err(|_| Error::InvalidData(format!("ingredient position {index} out of range")))?;
        let ingredient = upsert_ingredient(conn, &line.name)?;
        stmt.execute(params![
            recipe_id.to_string(),
            ingredient.id.to_string(),
            line.quantity,
            non_blank(line.unit.as_deref()).map(str::trim),
            non_blank(line.notes.as_deref()),
            sort_order,
        ])?;
    }
    Ok(())
}

fn insert_tags(conn: &Connection, recipe_id: &RecipeId, tags: &[String]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO recipe_tags (recipe_id, tag_id) VALUES (?1, ?2)
         ON CONFLICT DO NOTHING",
    )?;

    for name in tags {
        let tag = upsert_tag(conn, name)?;
        stmt.execute(params![recipe_id.to_string(), tag.id.to_string()])?;
    }
    Ok(())
}

fn optional_integer(value: Option<u32>) -> Value {
    value.map_or(Value::Null, |v| Value::Integer(i64::from(v)))
}

fn optional_text(value: Option<&str>) -> Value {
    non_blank(value).map_or(Value::Null, |v| Value::Text(v.to_string()))
}

/// Column assignments for the fields present in `patch`, in SET order.
fn patch_assignments(patch: &RecipePatch) -> Vec<(&'static str, Value)> {
    let mut assignments = Vec::new();

    if let Some(name) = &patch.name {
        assignments.push(("name", Value::Text(name.trim().to_string())));
    }
    if let Some(instructions) = &patch.instructions {
        assignments.push(("instructions", Value::Text(instructions.clone())));
    }
    if let Some(minutes) = patch.prep_time_minutes {
        assignments.push(("prep_time_minutes", optional_integer(minutes)));
    }
    if let Some(minutes) = patch.cook_time_minutes {
        assignments.push(("cook_time_minutes", optional_integer(minutes)));
    }
    if let Some(servings) = patch.servings {
        assignments.push(("servings", optional_integer(servings)));
    }
    if let Some(url) = &patch.source_url {
        assignments.push(("source_url", optional_text(url.as_deref().map(str::trim))));
    }
    if let Some(notes) = &patch.notes {
        assignments.push(("notes", optional_text(notes.as_deref())));
    }

    assignments.push(("updated_at", Value::Text(timestamp(Utc::now()))));
    assignments
}

// Recipe CRUD
impl Database {
    /// Create a recipe with its ingredient lines and tags.
    ///
    /// Ingredients and tags are resolved against the shared dictionaries.
    /// Everything happens in one transaction. The returned recipe carries
    /// no lines or tags; use [`Database::get_recipe`] for those.
    pub fn create_recipe(&mut self, input: &NewRecipe) -> Result<Recipe> {
        input.validate()?;

        let now = timestamp(Utc::now());
        let tx = self.conn.transaction()?;

        let recipe = tx
            .query_row(
                &format!(
                    "INSERT INTO recipes (
                        id, name, instructions, prep_time_minutes, cook_time_minutes,
                        servings, source_url, notes, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                    RETURNING {RECIPE_COLUMNS}"
                ),
                params![
                    RecipeId::new().to_string(),
                    input.name.trim(),
                    input.instructions,
                    input.prep_time_minutes,
                    input.cook_time_minutes,
                    input.servings,
                    non_blank(input.source_url.as_deref()).map(str::trim),
                    non_blank(input.notes.as_deref()),
                    now,
                    now,
                ],
                row_to_recipe,
            )
            .optional()?
            .ok_or(Error::NotPersisted { entity: "recipe" })?;

        insert_lines(&tx, &recipe.id, &input.ingredients)?;
        insert_tags(&tx, &recipe.id, &input.tags)?;
        tx.commit()?;

        log::info!(
            "Created recipe {} ({:?}) with {} ingredients, {} tags",
            recipe.id,
            recipe.name,
            input.ingredients.len(),
            input.tags.len()
        );
        Ok(recipe)
    }

    /// Fetch a recipe with its ingredient lines (by `sort_order`) and tags
    /// (by name). Returns `None` if the id is unknown.
    pub fn get_recipe(&self, id: &RecipeId) -> Result<Option<RecipeWithDetails>> {
        let recipe = self
            .conn
            .query_row(
                &format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?1"),
                [id.to_string()],
                row_to_recipe,
            )
            .optional()?;

        let Some(recipe) = recipe else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT i.id, i.name, ri.quantity, ri.unit, ri.notes, ri.sort_order
             FROM recipe_ingredients ri
             JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE ri.recipe_id = ?1
             ORDER BY ri.sort_order",
        )?;
        let ingredients = stmt
            .query_map([id.to_string()], row_to_line)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name
             FROM recipe_tags rt
             JOIN tags t ON t.id = rt.tag_id
             WHERE rt.recipe_id = ?1
             ORDER BY t.name",
        )?;
        let tags = stmt
            .query_map([id.to_string()], row_to_tag)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(RecipeWithDetails {
            recipe,
            ingredients,
            tags,
        }))
    }

    /// List recipes matching `filter`, newest first, each at most once.
    pub fn list_recipes(&self, filter: Option<&RecipeFilter>) -> Result<Vec<Recipe>> {
        let predicate = filter
            .filter(|f| !f.is_empty())
            .map(RecipeFilter::predicate)
            .unwrap_or_default();

        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r{}
             ORDER BY r.created_at DESC, r.rowid DESC",
            predicate.sql
        );
        log::debug!("Listing recipes: {sql}");

        let mut stmt = self.conn.prepare(&sql)?;
        let recipes = stmt
            .query_map(params_from_iter(predicate.params.iter()), row_to_recipe)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(recipes)
    }

    /// Apply a partial update.
    ///
    /// Only fields present in `patch` change; `updated_at` is always
    /// refreshed. Present `ingredients` or `tags` replace the whole set.
    /// Returns `None` (and changes nothing) if the id is unknown.
    pub fn update_recipe(&mut self, id: &RecipeId, patch: &RecipePatch) -> Result<Option<Recipe>> {
        patch.validate()?;

        let assignments = patch_assignments(patch);
        let set_clause = assignments
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let mut values: Vec<Value> = assignments.into_iter().map(|(_, v)| v).collect();
        values.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE recipes SET {set_clause} WHERE id = ?{} RETURNING {RECIPE_COLUMNS}",
            values.len()
        );

        let tx = self.conn.transaction()?;
        let Some(recipe) = tx
            .query_row(&sql, params_from_iter(values.iter()), row_to_recipe)
            .optional()?
        else {
            return Ok(None);
        };

        if let Some(ingredients) = &patch.ingredients {
            tx.execute(
                "DELETE FROM recipe_ingredients WHERE recipe_id = ?1",
                [id.to_string()],
            )?;
            insert_lines(&tx, id, ingredients)?;
        }

        if let Some(tags) = &patch.tags {
            tx.execute("DELETE FROM recipe_tags WHERE recipe_id = ?1", [id.to_string()])?;
            insert_tags(&tx, id, tags)?;
        }

        tx.commit()?;
        log::info!("Updated recipe {id}");
        Ok(Some(recipe))
    }

    /// Delete a recipe and its lines and tag links. Dictionary rows stay.
    ///
    /// Returns `false` if the id is unknown.
    pub fn delete_recipe(&self, id: &RecipeId) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM recipes WHERE id = ?1", [id.to_string()])?;
        if deleted > 0 {
            log::info!("Deleted recipe {id}");
        }
        Ok(deleted > 0)
    }

    /// Delete every recipe whose name contains `pattern`, ignoring case.
    ///
    /// The pattern is trimmed and must be at least
    /// [`MIN_CLEANUP_PATTERN_LEN`] characters; shorter patterns fail with
    /// [`Error::InvalidPattern`] before anything is read or written.
    pub fn delete_recipes_by_pattern(&mut self, pattern: &str) -> Result<usize> {
        let trimmed = pattern.trim();
        if trimmed.chars().count() < MIN_CLEANUP_PATTERN_LEN {
            return Err(Error::InvalidPattern {
                pattern: pattern.to_string(),
                min_len: MIN_CLEANUP_PATTERN_LEN,
            });
        }

        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM recipes WHERE casefold(name) LIKE ?1 ESCAPE '\\'",
            [contains_pattern(trimmed)],
        )?;
        tx.commit()?;

        log::info!("Deleted {deleted} recipes matching {trimmed:?}");
        Ok(deleted)
    }
}
