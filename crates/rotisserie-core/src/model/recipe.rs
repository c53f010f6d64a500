use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::model::ids::RecipeId;
use crate::model::ingredient::{IngredientInput, IngredientLine};
use crate::model::tag::Tag;

/// Longest recipe name the schema accepts, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// A persisted recipe without its ingredient lines or tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,

    /// Free-text method. Cooking mode splits this into steps.
    pub instructions: String,

    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub source_url: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Prep plus cook time, if either is known.
    #[must_use]
    pub fn total_time_minutes(&self) -> Option<u32> {
        match (self.prep_time_minutes, self.cook_time_minutes) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0).saturating_add(cook.unwrap_or(0))),
        }
    }
}

/// A recipe together with its ordered ingredient lines and its tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeWithDetails {
    #[serde(flatten)]
    pub recipe: Recipe,

    /// Ordered by `sort_order`.
    pub ingredients: Vec<IngredientLine>,

    /// Ordered by name.
    pub tags: Vec<Tag>,
}

/// Input for creating a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub instructions: String,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub ingredients: Vec<IngredientInput>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewRecipe {
    #[must_use]
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            prep_time_minutes: None,
            cook_time_minutes: None,
            servings: None,
            source_url: None,
            notes: None,
            ingredients: Vec::new(),
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_prep_time(mut self, minutes: u32) -> Self {
        self.prep_time_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn with_cook_time(mut self, minutes: u32) -> Self {
        self.cook_time_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn with_servings(mut self, servings: u32) -> Self {
        self.servings = Some(servings);
        self
    }

    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn with_ingredient(mut self, ingredient: IngredientInput) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Check every field against the recipe invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_instructions(&self.instructions)?;
        validate_positive("prep_time_minutes", self.prep_time_minutes)?;
        validate_positive("cook_time_minutes", self.cook_time_minutes)?;
        validate_positive("servings", self.servings)?;
        validate_source_url(self.source_url.as_deref())?;
        validate_ingredients(&self.ingredients)?;
        validate_tags(&self.tags)
    }
}

/// A partial update to a recipe.
///
/// Outer `None` leaves a field untouched. For nullable columns the inner
/// `None` clears the stored value. `ingredients` and `tags`, when present,
/// replace the whole set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub prep_time_minutes: Option<Option<u32>>,
    #[serde(default, deserialize_with = "present")]
    pub cook_time_minutes: Option<Option<u32>>,
    #[serde(default, deserialize_with = "present")]
    pub servings: Option<Option<u32>>,
    #[serde(default, deserialize_with = "present")]
    pub source_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub ingredients: Option<Vec<IngredientInput>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl RecipePatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    #[must_use]
    pub fn prep_time_minutes(mut self, minutes: Option<u32>) -> Self {
        self.prep_time_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn cook_time_minutes(mut self, minutes: Option<u32>) -> Self {
        self.cook_time_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn servings(mut self, servings: Option<u32>) -> Self {
        self.servings = Some(servings);
        self
    }

    #[must_use]
    pub fn source_url(mut self, url: Option<String>) -> Self {
        self.source_url = Some(url);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn ingredients(mut self, ingredients: Vec<IngredientInput>) -> Self {
        self.ingredients = Some(ingredients);
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Returns `true` if no recipe column would change (`updated_at` is
    /// still refreshed when such a patch is applied).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validate only the fields that are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(instructions) = &self.instructions {
            validate_instructions(instructions)?;
        }
        validate_positive("prep_time_minutes", self.prep_time_minutes.flatten())?;
        validate_positive("cook_time_minutes", self.cook_time_minutes.flatten())?;
        validate_positive("servings", self.servings.flatten())?;
        if let Some(url) = &self.source_url {
            validate_source_url(url.as_deref())?;
        }
        if let Some(ingredients) = &self.ingredients {
            validate_ingredients(ingredients)?;
        }
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        Ok(())
    }
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Blank optional text is stored as NULL.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

fn validate_instructions(instructions: &str) -> Result<(), ValidationError> {
    if instructions.trim().is_empty() {
        return Err(ValidationError::EmptyInstructions);
    }
    Ok(())
}

fn validate_positive(field: &'static str, value: Option<u32>) -> Result<(), ValidationError> {
    match value {
        Some(0) => Err(ValidationError::NonPositive { field }),
        _ => Ok(()),
    }
}

fn validate_source_url(url: Option<&str>) -> Result<(), ValidationError> {
    let Some(url) = non_blank(url) else {
        return Ok(());
    };
    url::Url::parse(url.trim())
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

fn validate_ingredients(ingredients: &[IngredientInput]) -> Result<(), ValidationError> {
    if ingredients.is_empty() {
        return Err(ValidationError::NoIngredients);
    }
    ingredients
        .iter()
        .enumerate()
        .try_for_each(|(index, ingredient)| ingredient.validate(index))
}

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    match tags.iter().position(|t| t.trim().is_empty()) {
        Some(index) => Err(ValidationError::EmptyTag { index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pancakes() -> NewRecipe {
        NewRecipe::new("Pancakes", "Mix\nFry")
            .with_ingredient(IngredientInput::new("flour").with_quantity(2.0).with_unit("cup"))
            .with_tag("breakfast")
    }

    #[test]
    fn test_new_recipe_builder() {
        let recipe = pancakes().with_servings(4).with_prep_time(10).with_cook_time(15);
        assert_eq!(recipe.servings, Some(4));
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.tags, vec!["breakfast".to_string()]);
        assert!(recipe.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let recipe = NewRecipe {
            name: "   ".to_string(),
            ..pancakes()
        };
        assert_eq!(recipe.validate(), Err(ValidationError::EmptyName));
    }

    #[test]
    fn test_validate_rejects_long_name() {
        let recipe = NewRecipe {
            name: "x".repeat(256),
            ..pancakes()
        };
        assert_eq!(
            recipe.validate(),
            Err(ValidationError::NameTooLong { len: 256, max: 255 })
        );

        let recipe = NewRecipe {
            name: "x".repeat(255),
            ..pancakes()
        };
        assert!(recipe.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_ingredients() {
        let recipe = NewRecipe::new("Water", "Pour");
        assert_eq!(recipe.validate(), Err(ValidationError::NoIngredients));
    }

    #[test]
    fn test_validate_rejects_zero_servings() {
        let recipe = pancakes().with_servings(0);
        assert_eq!(
            recipe.validate(),
            Err(ValidationError::NonPositive { field: "servings" })
        );
    }

    #[test]
    fn test_validate_source_url() {
        assert!(pancakes().with_source_url("https://example.com/pancakes").validate().is_ok());
        assert!(pancakes().with_source_url("").validate().is_ok());
        assert!(matches!(
            pancakes().with_source_url("not a url").validate(),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_blank_tag() {
        let recipe = pancakes().with_tag(" ");
        assert_eq!(recipe.validate(), Err(ValidationError::EmptyTag { index: 1 }));
    }

    #[test]
    fn test_patch_validates_present_fields_only() {
        assert!(RecipePatch::new().validate().is_ok());
        assert!(RecipePatch::new().servings(None).validate().is_ok());
        assert_eq!(
            RecipePatch::new().name("").validate(),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            RecipePatch::new().ingredients(Vec::new()).validate(),
            Err(ValidationError::NoIngredients)
        );
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let patch: RecipePatch = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.servings, None);
        assert!(!patch.is_empty());

        let patch: RecipePatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_total_time() {
        let now = Utc::now();
        let mut recipe = Recipe {
            id: RecipeId::new(),
            name: "Toast".to_string(),
            instructions: "Toast it".to_string(),
            prep_time_minutes: None,
            cook_time_minutes: None,
            servings: None,
            source_url: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(recipe.total_time_minutes(), None);

        recipe.cook_time_minutes = Some(3);
        assert_eq!(recipe.total_time_minutes(), Some(3));

        recipe.prep_time_minutes = Some(2);
        assert_eq!(recipe.total_time_minutes(), Some(5));
    }
}
