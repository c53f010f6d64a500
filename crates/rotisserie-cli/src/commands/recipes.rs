use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::{bail, Context, Result};
use rotisserie_core::document::{EXAMPLE_JSON, EXAMPLE_TOML};
use rotisserie_core::model::{
    IngredientId, NewRecipe, Recipe, RecipeId, RecipePatch, RecipeWithDetails, Unit,
};
use rotisserie_core::normalize::canonical_ingredient_name;
use rotisserie_core::schema::MIN_CLEANUP_PATTERN_LEN;
use rotisserie_core::{segment_instructions, Database, RecipeFilter};

use super::open_database;

/// Create a recipe from a JSON or TOML file.
pub fn add_recipe(db_path: &Path, file: &Path) -> Result<()> {
    let input = NewRecipe::load(file)
        .with_context(|| format!("Failed to load recipe from {}", file.display()))?;

    let mut db = open_database(db_path)?;
    let recipe = db.create_recipe(&input).context("Failed to save recipe")?;

    println!("✓ Added {}", recipe.name);
    println!("  id: {}", recipe.id);
    Ok(())
}

/// List recipes matching the given criteria, newest first.
pub fn list_recipes(
    db_path: &Path,
    search: Option<String>,
    tags: Vec<String>,
    ingredients: &[String],
    json: bool,
) -> Result<()> {
    let db = open_database(db_path)?;

    let mut filter = RecipeFilter {
        search,
        tags,
        ingredient_ids: Vec::new(),
    };
    for value in ingredients {
        match resolve_ingredient_arg(&db, value)? {
            Some(id) => filter.ingredient_ids.push(id),
            None => log::warn!("No ingredient named {value:?}"),
        }
    }

    // Every requested ingredient was unknown, so nothing can match
    let recipes = if !ingredients.is_empty() && filter.ingredient_ids.is_empty() {
        Vec::new()
    } else {
        db.list_recipes(Some(&filter))?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }

    if recipes.is_empty() {
        println!("No recipes found.");
        return Ok(());
    }

    print!("{}", recipe_table(&recipes)?);
    Ok(())
}

/// Accept an ingredient id or a name in any casing.
fn resolve_ingredient_arg(db: &Database, value: &str) -> Result<Option<IngredientId>> {
    if let Ok(id) = value.parse::<IngredientId>() {
        return Ok(Some(id));
    }

    let name = canonical_ingredient_name(value);
    Ok(db
        .list_ingredients()?
        .into_iter()
        .find(|i| i.name.to_lowercase() == name.to_lowercase())
        .map(|i| i.id))
}

fn recipe_table(recipes: &[Recipe]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{:<36}  {:<40}  {:>8}", "ID", "NAME", "TIME")?;
    for recipe in recipes {
        writeln!(
            out,
            "{:<36}  {:<40}  {:>8}",
            recipe.id,
            truncate(&recipe.name, 40),
            format_minutes(recipe.total_time_minutes()),
        )?;
    }
    writeln!(out, "\n{} recipe(s)", recipes.len())?;
    Ok(out)
}

/// Show one recipe with its ingredient lines, tags and numbered steps.
pub fn show_recipe(db_path: &Path, id: &RecipeId, json: bool) -> Result<()> {
    let db = open_database(db_path)?;
    let Some(details) = db.get_recipe(id)? else {
        bail!("Recipe not found: {id}");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        let units = db.list_units()?;
        print!("{}", render_recipe(&details, &units)?);
    }
    Ok(())
}

fn render_recipe(details: &RecipeWithDetails, units: &[Unit]) -> Result<String, fmt::Error> {
    let recipe = &details.recipe;
    let mut out = String::new();

    writeln!(out, "\n{}\n{}", recipe.name, "=".repeat(recipe.name.chars().count()))?;
    writeln!(out, "  id:       {}", recipe.id)?;
    if let Some(servings) = recipe.servings {
        writeln!(out, "  serves:   {servings}")?;
    }
    if recipe.prep_time_minutes.is_some() || recipe.cook_time_minutes.is_some() {
        writeln!(
            out,
            "  time:     {} prep, {} cook",
            format_minutes(recipe.prep_time_minutes),
            format_minutes(recipe.cook_time_minutes),
        )?;
    }
    if let Some(url) = &recipe.source_url {
        writeln!(out, "  source:   {url}")?;
    }
    if !details.tags.is_empty() {
        let names: Vec<&str> = details.tags.iter().map(|t| t.name.as_str()).collect();
        writeln!(out, "  tags:     {}", names.join(", "))?;
    }

    writeln!(out, "\nIngredients:")?;
    for line in &details.ingredients {
        write!(out, "  - ")?;
        if let Some(amount) = line.display_quantity(units) {
            write!(out, "{amount} ")?;
        }
        write!(out, "{}", line.name)?;
        if let Some(notes) = &line.notes {
            write!(out, " ({notes})")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "\nSteps:")?;
    for (i, step) in segment_instructions(&recipe.instructions).iter().enumerate() {
        writeln!(out, "  {}. {step}", i + 1)?;
    }

    if let Some(notes) = &recipe.notes {
        writeln!(out, "\nNotes:\n  {notes}")?;
    }
    Ok(out)
}

/// Apply a partial update loaded from a JSON or TOML file.
pub fn edit_recipe(db_path: &Path, id: &RecipeId, file: &Path) -> Result<()> {
    let patch = RecipePatch::load(file)
        .with_context(|| format!("Failed to load changes from {}", file.display()))?;
    if patch.is_empty() {
        log::warn!("{} changes nothing; only updated_at will move", file.display());
    }

    let mut db = open_database(db_path)?;
    let Some(recipe) = db.update_recipe(id, &patch)? else {
        bail!("Recipe not found: {id}");
    };

    println!("✓ Updated {}", recipe.name);
    Ok(())
}

/// Delete a single recipe.
pub fn delete_recipe(db_path: &Path, id: &RecipeId) -> Result<()> {
    let db = open_database(db_path)?;
    if !db.delete_recipe(id)? {
        bail!("Recipe not found: {id}");
    }
    println!("✓ Deleted recipe {id}");
    Ok(())
}

/// Delete every recipe whose name contains `pattern`.
pub fn cleanup_recipes(db_path: &Path, pattern: &str, dry_run: bool) -> Result<()> {
    let mut db = open_database(db_path)?;

    if dry_run {
        if pattern.trim().chars().count() < MIN_CLEANUP_PATTERN_LEN {
            bail!(
                "Pattern {pattern:?} is too short; use at least {MIN_CLEANUP_PATTERN_LEN} characters"
            );
        }
        let matches =
            db.list_recipes(Some(&RecipeFilter::new().with_search(pattern.trim())))?;
        if matches.is_empty() {
            println!("No recipes match {pattern:?}.");
        } else {
            println!("Would delete {} recipe(s):", matches.len());
            for recipe in &matches {
                println!("  {}  {}", recipe.id, recipe.name);
            }
        }
        return Ok(());
    }

    let deleted = db.delete_recipes_by_pattern(pattern)?;
    println!("✓ Deleted {deleted} recipe(s) matching {:?}", pattern.trim());
    Ok(())
}

/// Print a template recipe file.
pub fn show_example_recipe(json: bool) -> Result<()> {
    print!("{}", if json { EXAMPLE_JSON } else { EXAMPLE_TOML });
    Ok(())
}

fn format_minutes(minutes: Option<u32>) -> String {
    match minutes {
        None => String::from("-"),
        Some(m) if m < 60 => format!("{m} min"),
        Some(m) if m % 60 == 0 => format!("{} h", m / 60),
        Some(m) => format!("{} h {} min", m / 60, m % 60),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}
