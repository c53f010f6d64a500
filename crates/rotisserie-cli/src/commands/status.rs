use anyhow::Result;
use std::path::Path;

use super::open_database;

pub fn show_status(db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let stats = db.stats()?;

    println!("\n🍗 Rotisserie Status\n");
    println!("  Database:    {}", db_path.display());
    println!("  Recipes:     {}", stats.recipes);
    println!("  Ingredients: {}", stats.ingredients);
    println!("  Tags:        {}", stats.tags);
    println!("  Units:       {}", stats.units);

    if stats.recipes == 0 {
        println!("\n  Run `rotisserie example > soup.toml && rotisserie add soup.toml` to get started");
    }

    Ok(())
}
