/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Recipes
CREATE TABLE IF NOT EXISTS recipes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 255),
    instructions TEXT NOT NULL CHECK (length(instructions) > 0),
    prep_time_minutes INTEGER CHECK (prep_time_minutes IS NULL OR prep_time_minutes > 0),
    cook_time_minutes INTEGER CHECK (cook_time_minutes IS NULL OR cook_time_minutes > 0),
    servings INTEGER CHECK (servings IS NULL OR servings > 0),
    source_url TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_recipes_created_at ON recipes(created_at);

-- Shared ingredient dictionary; names are canonical and unique ignoring case
CREATE TABLE IF NOT EXISTS ingredients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL COLLATE NOCASE UNIQUE
);

-- Shared tag dictionary
CREATE TABLE IF NOT EXISTS tags (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL COLLATE NOCASE UNIQUE
);

-- Units of measure (reference data)
CREATE TABLE IF NOT EXISTS units (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    abbreviation TEXT,
    category TEXT
);

-- Ingredient lines (recipe owns them; sort_order is dense per recipe)
CREATE TABLE IF NOT EXISTS recipe_ingredients (
    recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
    ingredient_id TEXT NOT NULL REFERENCES ingredients(id),
    quantity REAL CHECK (quantity IS NULL OR quantity > 0),
    unit TEXT,
    notes TEXT,
    sort_order INTEGER NOT NULL CHECK (sort_order >= 0),
    PRIMARY KEY (recipe_id, sort_order)
);

CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_ingredient_id ON recipe_ingredients(ingredient_id);

-- Recipe <-> tag junction
CREATE TABLE IF NOT EXISTS recipe_tags (
    recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
    tag_id TEXT NOT NULL REFERENCES tags(id),
    PRIMARY KEY (recipe_id, tag_id)
);

CREATE INDEX IF NOT EXISTS idx_recipe_tags_tag_id ON recipe_tags(tag_id);
"#;

const MIGRATION_002: &str = r#"
INSERT OR IGNORE INTO units (id, name, abbreviation, category) VALUES
    ('00000000-0000-4000-8000-000000000001', 'teaspoon', 'tsp', 'volume'),
    ('00000000-0000-4000-8000-000000000002', 'tablespoon', 'tbsp', 'volume'),
    ('00000000-0000-4000-8000-000000000003', 'cup', 'c', 'volume'),
    ('00000000-0000-4000-8000-000000000004', 'fluid ounce', 'fl oz', 'volume'),
    ('00000000-0000-4000-8000-000000000005', 'pint', 'pt', 'volume'),
    ('00000000-0000-4000-8000-000000000006', 'quart', 'qt', 'volume'),
    ('00000000-0000-4000-8000-000000000007', 'gallon', 'gal', 'volume'),
    ('00000000-0000-4000-8000-000000000008', 'milliliter', 'ml', 'volume'),
    ('00000000-0000-4000-8000-000000000009', 'liter', 'l', 'volume'),
    ('00000000-0000-4000-8000-000000000010', 'gram', 'g', 'weight'),
    ('00000000-0000-4000-8000-000000000011', 'kilogram', 'kg', 'weight'),
    ('00000000-0000-4000-8000-000000000012', 'ounce', 'oz', 'weight'),
    ('00000000-0000-4000-8000-000000000013', 'pound', 'lb', 'weight'),
    ('00000000-0000-4000-8000-000000000014', 'piece', 'pc', 'count'),
    ('00000000-0000-4000-8000-000000000015', 'clove', NULL, 'count'),
    ('00000000-0000-4000-8000-000000000016', 'slice', NULL, 'count'),
    ('00000000-0000-4000-8000-000000000017', 'can', NULL, 'count'),
    ('00000000-0000-4000-8000-000000000018', 'bunch', NULL, 'count'),
    ('00000000-0000-4000-8000-000000000019', 'pinch', NULL, 'other'),
    ('00000000-0000-4000-8000-000000000020', 'dash', NULL, 'other'),
    ('00000000-0000-4000-8000-000000000021', 'to taste', NULL, 'other');
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: MIGRATION_001,
    },
    Migration {
        version: 2,
        name: "seed_units",
        sql: MIGRATION_002,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_versions_are_increasing() {
        let versions: Vec<u32> = MIGRATIONS.iter().map(|m| m.version).collect();
        let mut sorted = versions.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(versions, sorted);
    }
}
