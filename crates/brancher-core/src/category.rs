use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CATEGORIES: [(&str, &str); 6] = [
    ("CI/CD", "ci"),
    ("Feature", "feat"),
    ("Fix", "fix"),
    ("Performance", "perf"),
    ("Refactor", "refactor"),
    ("Test", "test"),
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryDefinition {
    pub display: String,
    pub code: String,
}

impl CategoryDefinition {
    pub fn new(display: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("at least one category must be defined")]
    Empty,
    #[error("category[{index}] display must be non-empty")]
    EmptyDisplay { index: usize },
    #[error(
        "category[{index}] code '{code}' must be non-empty and use only lowercase letters, digits, '-' or '_'"
    )]
    InvalidCode { index: usize, code: String },
    #[error("category code '{code}' is defined more than once")]
    DuplicateCode { code: String },
}

/// The ordered set of categories offered in the second selection stage.
///
/// Built once at startup and handed to the selection flow; the order here is
/// the display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    categories: Vec<CategoryDefinition>,
}

impl CategoryRegistry {
    pub fn new(categories: Vec<CategoryDefinition>) -> Result<Self, CategoryError> {
        if categories.is_empty() {
            return Err(CategoryError::Empty);
        }

        let mut seen = BTreeSet::<String>::new();
        for (index, category) in categories.iter().enumerate() {
            if category.display.trim().is_empty() {
                return Err(CategoryError::EmptyDisplay { index });
            }

            if !is_valid_code(&category.code) {
                return Err(CategoryError::InvalidCode {
                    index,
                    code: category.code.clone(),
                });
            }

            if !seen.insert(category.code.clone()) {
                return Err(CategoryError::DuplicateCode {
                    code: category.code.clone(),
                });
            }
        }

        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(display, code)| CategoryDefinition::new(*display, *code))
                .collect(),
        }
    }
}

fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.chars().all(|character| {
            character.is_ascii_lowercase()
                || character.is_ascii_digit()
                || character == '-'
                || character == '_'
        })
}
