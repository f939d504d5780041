use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// Shared, read-only row of `exercise_library`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub category: String,
}

impl Exercise {
    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category: row.get("category")?,
        })
    }
}

/// Categories grouped under the "Arms" filter.
pub const ARMS_CATEGORIES: &[&str] = &["Biceps", "Triceps", "Shoulders"];

/// Maximum rows returned by one library search (inclusive range 0..=50).
pub const SEARCH_LIMIT: i64 = 51;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Arms,
    Category(String),
}

impl CategoryFilter {
    pub fn parse(s: &str) -> Self {
        match s {
            "" => CategoryFilter::All,
            "Arms" => CategoryFilter::Arms,
            other => CategoryFilter::Category(other.to_string()),
        }
    }

    /// Category values the filter admits, `None` meaning unrestricted.
    pub fn categories(&self) -> Option<Vec<String>> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Arms => Some(ARMS_CATEGORIES.iter().map(|c| c.to_string()).collect()),
            CategoryFilter::Category(c) => Some(vec![c.clone()]),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self.categories() {
            None => true,
            Some(categories) => categories.iter().any(|c| c == category),
        }
    }
}

/// Render a `snake_case` library name as Title Case words.
pub fn display_name(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
