use anyhow::Result;
use rotisserie_core::model::group_units_by_category;
use std::path::Path;

use super::open_database;

pub fn list_tags(db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let tags = db.list_tags()?;

    if tags.is_empty() {
        println!("No tags yet.");
        return Ok(());
    }
    for tag in &tags {
        println!("{}", tag.name);
    }
    Ok(())
}

pub fn list_ingredients(db_path: &Path, search: Option<&str>) -> Result<()> {
    let db = open_database(db_path)?;
    let ingredients = match search {
        Some(query) => db.search_ingredients(query)?,
        None => db.list_ingredients()?,
    };

    if ingredients.is_empty() {
        println!("No ingredients found.");
        return Ok(());
    }
    for ingredient in &ingredients {
        println!("{}  {}", ingredient.id, ingredient.name);
    }
    Ok(())
}

/// Units grouped by category, the way a unit picker shows them.
pub fn list_units(db_path: &Path, search: Option<&str>) -> Result<()> {
    let db = open_database(db_path)?;
    let units = match search {
        Some(query) => db.search_units(query)?,
        None => db.list_units()?,
    };

    if units.is_empty() {
        println!("No units found.");
        return Ok(());
    }

    for (category, members) in group_units_by_category(&units) {
        println!("{category}:");
        for unit in members {
            match &unit.abbreviation {
                Some(abbreviation) => println!("  {:<14} {abbreviation}", unit.name),
                None => println!("  {}", unit.name),
            }
        }
    }
    Ok(())
}
