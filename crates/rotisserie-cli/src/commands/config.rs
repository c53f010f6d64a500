use anyhow::{bail, Context, Result};
use toml_edit::{value, DocumentMut};

use crate::config::{self, Config, KEYS};

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    for key in KEYS {
        println!("  {key}: {}", config.get(key).unwrap_or_default());
    }

    println!("\nPriority: CLI args > ENV vars (ROTI_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the whole file.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;
        let Some(value) = config.get(&key) else {
            bail!(unknown_key(&key));
        };
        println!("{value}");
    } else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'rotisserie config init' to create it.");
        }
    }

    Ok(())
}

/// Set a config value, keeping the rest of the file and its comments.
pub fn set_config(key: &str, raw: &str) -> Result<()> {
    let config_path = config::config_file_path();

    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = apply_setting(&contents, key, raw)?;

    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, raw);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Write `key = raw` into a TOML document, typed per key.
fn apply_setting(contents: &str, key: &str, raw: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Config file is not valid TOML")?;

    match key {
        "database_path" => doc["database_path"] = value(raw),
        "logging.level" => {
            crate::logging::parse_level(raw)?;
            doc["logging"]["level"] = value(raw.trim().to_ascii_lowercase());
        }
        "logging.coloured" | "logging.report_caller" => {
            let flag: bool = raw
                .trim()
                .parse()
                .with_context(|| format!("{key} must be true or false, got {raw:?}"))?;
            let field = key.trim_start_matches("logging.");
            doc["logging"][field] = value(flag);
        }
        _ => bail!(unknown_key(key)),
    }

    Ok(doc.to_string())
}

fn unknown_key(key: &str) -> String {
    format!("Unknown config key: {key}\n\nValid keys: {}", KEYS.join(", "))
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure rotisserie.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
