//! Core domain model for rotisserie.
//!
//! This crate defines the recipe aggregate (recipe, ordered ingredient
//! lines, tag set), the shared ingredient/tag/unit dictionaries, the SQLite
//! schema and repository, the list filter builder, and the instruction
//! segmenter that backs guided cooking mode.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod document;
pub mod error;
pub mod filter;
pub mod model;
pub mod normalize;
pub mod schema;
pub mod steps;

pub use error::{Error, Result, ValidationError};
pub use filter::RecipeFilter;
pub use schema::Database;
pub use steps::{segment_instructions, CookingSession};
