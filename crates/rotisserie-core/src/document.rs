//! Loading recipe input from JSON or TOML files.
//!
//! A file holding a [`NewRecipe`] looks like:
//!
//! ```toml
//! name = "Tomato Soup"
//! instructions = """
//! 1. Roast the tomatoes
//! 2. Blend with stock
//! """
//! servings = 4
//! tags = ["soup", "vegetarian"]
//!
//! [[ingredients]]
//! name = "tomato"
//! quantity = 6
//!
//! [[ingredients]]
//! name = "vegetable stock"
//! quantity = 2
//! unit = "cup"
//! ```

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{NewRecipe, RecipePatch};

/// Template printed by `rotisserie example`.
pub const EXAMPLE_TOML: &str = r#"name = "Tomato Soup"
prep_time_minutes = 10
cook_time_minutes = 40
servings = 4
source_url = "https://example.com/tomato-soup"
notes = "Freezes well."
tags = ["soup", "vegetarian"]
instructions = """
1. Roast the tomatoes and garlic until soft
2. Blend with the stock
3. Season and serve
"""

[[ingredients]]
name = "tomato"
quantity = 6

[[ingredients]]
name = "garlic"
quantity = 3
notes = "cloves, unpeeled"

[[ingredients]]
name = "vegetable stock"
quantity = 2
unit = "cup"
"#;

/// JSON form of [`EXAMPLE_TOML`].
pub const EXAMPLE_JSON: &str = r#"{
  "name": "Tomato Soup",
  "prep_time_minutes": 10,
  "cook_time_minutes": 40,
  "servings": 4,
  "source_url": "https://example.com/tomato-soup",
  "notes": "Freezes well.",
  "tags": ["soup", "vegetarian"],
  "instructions": "1. Roast the tomatoes and garlic until soft\n2. Blend with the stock\n3. Season and serve\n",
  "ingredients": [
    { "name": "tomato", "quantity": 6 },
    { "name": "garlic", "quantity": 3, "notes": "cloves, unpeeled" },
    { "name": "vegetable stock", "quantity": 2, "unit": "cup" }
  ]
}
"#;

/// Serialization format of a recipe file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    /// Pick the format from a path's extension; anything but `.json` is TOML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Parse a document from a string.
pub fn parse<T: DeserializeOwned>(content: &str, format: Format) -> Result<T> {
    match format {
        Format::Json => Ok(serde_json::from_str(content)?),
        Format::Toml => toml::from_str(content)
            .map_err(|e| Error::InvalidData(format!("invalid TOML: {e}"))),
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content, Format::from_path(path)).map_err(|e| match e {
        Error::InvalidData(msg) => Error::InvalidData(format!("{}: {msg}", path.display())),
        other => other,
    })
}

impl NewRecipe {
    /// Load and validate a new recipe from a JSON or TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let recipe: Self = load(path)?;
        recipe.validate()?;
        Ok(recipe)
    }
}

impl RecipePatch {
    /// Load and validate a partial update from a JSON or TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let patch: Self = load(path)?;
        patch.validate()?;
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use tempfile::TempDir;

    const SOUP_TOML: &str = r#"
name = "Tomato Soup"
instructions = """
1. Roast the tomatoes
2. Blend with stock
"""
servings = 4
tags = ["soup", "vegetarian"]

[[ingredients]]
name = "tomato"
quantity = 6

[[ingredients]]
name = "vegetable stock"
quantity = 2.5
unit = "cup"
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.toml")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("recipe")), Format::Toml);
    }

    #[test]
    fn test_parse_toml_recipe() {
        let recipe: NewRecipe = parse(SOUP_TOML, Format::Toml).unwrap();
        assert_eq!(recipe.name, "Tomato Soup");
        assert_eq!(recipe.servings, Some(4));
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].quantity, Some(6.0));
        assert_eq!(recipe.ingredients[1].unit.as_deref(), Some("cup"));
        assert_eq!(recipe.tags, vec!["soup", "vegetarian"]);
    }

    #[test]
    fn test_examples_agree_and_validate() {
        let from_toml: NewRecipe = parse(EXAMPLE_TOML, Format::Toml).unwrap();
        let from_json: NewRecipe = parse(EXAMPLE_JSON, Format::Json).unwrap();
        assert_eq!(from_toml, from_json);
        assert!(from_toml.validate().is_ok());
        assert_eq!(from_toml.ingredients[1].notes.as_deref(), Some("cloves, unpeeled"));
    }

    #[test]
    fn test_parse_json_patch() {
        let patch: RecipePatch =
            parse(r#"{"servings": null, "tags": ["quick"]}"#, Format::Json).unwrap();
        assert_eq!(patch.servings, Some(None));
        assert_eq!(patch.tags, Some(vec!["quick".to_string()]));
        assert!(patch.ingredients.is_none());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result: Result<NewRecipe> = parse("name = ", Format::Toml);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("soup.toml");
        std::fs::write(&path, SOUP_TOML).unwrap();

        let recipe = NewRecipe::load(&path).unwrap();
        assert_eq!(recipe.name, "Tomato Soup");
    }

    #[test]
    fn test_load_validates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, r#"{"name": "Nothing", "instructions": "Wait", "ingredients": []}"#)
            .unwrap();

        assert!(matches!(
            NewRecipe::load(&path),
            Err(Error::Validation(ValidationError::NoIngredients))
        ));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = RecipePatch::load(Path::new("/nonexistent/patch.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
