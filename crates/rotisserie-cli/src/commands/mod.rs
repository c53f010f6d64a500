use anyhow::{Context, Result};
use rotisserie_core::Database;
use std::path::Path;

pub mod config;
pub mod cook;
pub mod dictionary;
pub mod recipes;
pub mod status;

pub use cook::print_steps;
pub use dictionary::{list_ingredients, list_tags, list_units};
pub use recipes::{
    add_recipe, cleanup_recipes, delete_recipe, edit_recipe, list_recipes, show_example_recipe,
    show_recipe,
};
pub use status::show_status;

fn open_database(db_path: &Path) -> Result<Database> {
    Database::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))
}
