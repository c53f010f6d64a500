use anyhow::{Context, Result};
use clap::Parser;
use rotisserie_core::model::RecipeId;
use std::path::PathBuf;

mod commands;
mod config;
mod logging;
mod tui;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "rotisserie", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/rotisserie/rotisserie.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Add a recipe from a JSON or TOML file
    ///
    /// The file holds the recipe name, instructions, optional times,
    /// servings, source URL and notes, a list of ingredient lines and a list
    /// of tags. Ingredient and tag names are normalized and shared with the
    /// rest of the catalog, so "Onion" and " onion " are the same ingredient.
    ///
    /// Files ending in .json are read as JSON; anything else as TOML.
    /// Run 'rotisserie example' for a template.
    Add {
        /// Path to the recipe file
        file: PathBuf,
    },
    /// List recipes, newest first
    List {
        /// Only recipes whose name contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Only recipes with any of these tags
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Only recipes using any of these ingredients (name or id)
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe with its ingredients, tags and steps
    Show {
        id: RecipeId,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Apply a partial update from a JSON or TOML file
    ///
    /// Only the fields present in the file change. Setting a field to null
    /// (JSON) clears it. When "ingredients" or "tags" is present the whole
    /// list is replaced.
    Edit {
        id: RecipeId,

        /// Path to the patch file
        file: PathBuf,
    },
    /// Delete a recipe
    Delete { id: RecipeId },
    /// Delete every recipe whose name contains PATTERN
    Cleanup {
        /// Case-insensitive substring, at least 3 characters
        pattern: String,

        /// List the recipes that would be deleted without deleting them
        #[arg(long)]
        dry_run: bool,
    },
    /// List all tags
    Tags,
    /// List ingredients
    Ingredients {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List measurement units by category
    Units {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Walk through a recipe's steps
    Cook {
        id: RecipeId,

        /// Print only this step (1-based)
        #[arg(long)]
        step: Option<usize>,

        /// Open the interactive cooking screen
        #[arg(short, long, conflicts_with = "step")]
        interactive: bool,
    },
    /// Show catalog counts
    Status,
    /// Print an example recipe file
    Example {
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file
    Get { key: Option<String> },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file if it does not exist
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        // Config commands must work even when the config file is broken
        Commands::Config { action } => run_config(action),
        command => run(command, cli.db, cli.verbose),
    }
}

fn run_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => commands::config::show_config(),
        ConfigAction::Get { key } => commands::config::get_config(key),
        ConfigAction::Set { key, value } => commands::config::set_config(&key, &value),
        ConfigAction::Path => commands::config::show_path(),
        ConfigAction::Example => commands::config::show_example(),
        ConfigAction::Init => commands::config::init_config(),
    }
}

fn run(command: Commands, db: Option<PathBuf>, verbose: bool) -> Result<()> {
    let config = Config::load_with_db_path(db)?;
    logging::init(&config.logging, verbose)?;

    let db_path = config.database_path;
    log::debug!("Using database {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory {}", parent.display())
        })?;
    }

    match command {
        Commands::Add { file } => commands::add_recipe(&db_path, &file)?,
        Commands::List {
            search,
            tags,
            ingredients,
            json,
        } => commands::list_recipes(&db_path, search, tags, &ingredients, json)?,
        Commands::Show { id, json } => commands::show_recipe(&db_path, &id, json)?,
        Commands::Edit { id, file } => commands::edit_recipe(&db_path, &id, &file)?,
        Commands::Delete { id } => commands::delete_recipe(&db_path, &id)?,
        Commands::Cleanup { pattern, dry_run } => {
            commands::cleanup_recipes(&db_path, &pattern, dry_run)?;
        }
        Commands::Tags => commands::list_tags(&db_path)?,
        Commands::Ingredients { search } => {
            commands::list_ingredients(&db_path, search.as_deref())?;
        }
        Commands::Units { search } => commands::list_units(&db_path, search.as_deref())?,
        Commands::Cook {
            id,
            step,
            interactive,
        } => {
            if interactive {
                tui::run_tui(&db_path, &id)?;
            } else {
                commands::print_steps(&db_path, &id, step)?;
            }
        }
        Commands::Status => commands::show_status(&db_path)?,
        Commands::Example { json } => commands::show_example_recipe(json)?,
        Commands::Config { action } => run_config(action)?,
    }

    Ok(())
}
