pub mod ids;
pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod unit;

pub use ids::{IngredientId, RecipeId, TagId, UnitId};
pub use ingredient::{Ingredient, IngredientInput, IngredientLine};
pub use recipe::{NewRecipe, Recipe, RecipePatch, RecipeWithDetails, MAX_NAME_LEN};
pub use tag::Tag;
pub use unit::{group_units_by_category, Unit, UNCATEGORIZED};
