//! Category types.

use chrono::{DateTime, Utc};
use emarket_core::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, with = "emarket_core::types::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "emarket_core::types::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for creating a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Partial category update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
