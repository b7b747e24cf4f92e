use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Job domain a user subscribes to. Each category maps to one listing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Frontend,
    Backend,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Frontend, Category::Backend];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Frontend => "frontend",
            Category::Backend => "backend",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only caller-visible pipeline failure: the token names no registered category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category {token:?}")]
pub struct UnknownCategory {
    pub token: String,
}

impl UnknownCategory {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let trimmed = token.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory::new(token))
    }
}
