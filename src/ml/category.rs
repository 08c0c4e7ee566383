//! The closed set of message categories.
//!
//! The integer mapping is fixed and part of the artifact format:
//!
//! | index | category |
//! |-------|----------|
//! | 0     | general  |
//! | 1     | delivery |
//! | 2     | payment  |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CategorizerError, Result};

/// Number of categories.
pub const NUM_CATEGORIES: usize = 3;

/// A support message category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Account questions, feedback and everything else.
    General = 0,
    /// Shipping, tracking and missing parcels.
    Delivery = 1,
    /// Charges, refunds and billing.
    Payment = 2,
}

impl Category {
    /// All categories ordered by index.
    pub const ALL: [Category; NUM_CATEGORIES] =
        [Category::General, Category::Delivery, Category::Payment];

    /// Look up a category by its index.
    pub fn from_index(index: usize) -> Option<Category> {
        Self::ALL.get(index).copied()
    }

    /// The integer label of this category.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The human-readable name of this category.
    pub fn name(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Delivery => "delivery",
            Category::Payment => "payment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = CategorizerError;

    /// Accepts a category name (case-insensitive) or its integer index.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Category::from_index(index).ok_or_else(|| {
                CategorizerError::invalid_config(format!("Unknown category index: {index}"))
            });
        }

        Category::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CategorizerError::invalid_config(format!("Unknown category: {s}")))
    }
}
