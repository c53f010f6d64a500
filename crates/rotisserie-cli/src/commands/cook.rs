use anyhow::{bail, Result};
use rotisserie_core::model::RecipeId;
use rotisserie_core::CookingSession;
use std::path::Path;

use super::open_database;

/// Print a recipe's steps, or a single 1-based step with progress.
pub fn print_steps(db_path: &Path, id: &RecipeId, step: Option<usize>) -> Result<()> {
    let db = open_database(db_path)?;
    let Some(details) = db.get_recipe(id)? else {
        bail!("Recipe not found: {id}");
    };

    let mut session = CookingSession::from_instructions(&details.recipe.instructions);
    if session.is_empty() {
        println!("{} has no steps.", details.recipe.name);
        return Ok(());
    }

    match step {
        Some(n) => {
            if n == 0 || n > session.len() {
                bail!(
                    "Step {n} is out of range; {} has {} step(s)",
                    details.recipe.name,
                    session.len()
                );
            }
            session.go_to(n - 1);
            println!("{}", step_heading(&session));
            if let Some(text) = session.current() {
                println!("\n  {text}");
            }
        }
        None => {
            println!("{} ({} steps)\n", details.recipe.name, session.len());
            for (i, text) in session.steps().iter().enumerate() {
                println!("  [{}/{}] {text}", i + 1, session.len());
            }
        }
    }
    Ok(())
}

fn step_heading(session: &CookingSession) -> String {
    format!(
        "Step {} of {} ({:.0}%)",
        session.current_index() + 1,
        session.len(),
        session.progress() * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_heading() {
        let mut session = CookingSession::from_instructions("Chop\nFry\nServe");
        assert_eq!(step_heading(&session), "Step 1 of 3 (33%)");
        session.go_to(2);
        assert_eq!(step_heading(&session), "Step 3 of 3 (100%)");
    }
}
