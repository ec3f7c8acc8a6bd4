//! Domain DTOs for the todo API and the list parameters the store keeps.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! Wire names are camelCase (`createdAt`, `totalPages`, `sortBy`). Absent
//! optional fields are omitted from request bodies so a `PUT` only carries
//! the fields the caller actually wants to change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Server-assigned identity of a todo.
pub type TodoId = u64;

/// Maximum title length, in characters.
pub const TITLE_MAX_LEN: usize = 100;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl CreateTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Trim the draft the way the add screen submits it: surrounding
    /// whitespace is dropped and a blank description becomes absent.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: normalize_description(self.description.as_deref()),
            completed: self.completed,
        }
    }

    /// Client-side checks performed before any network call.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())
    }
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodo {
    /// A patch carrying only the completion flag.
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.as_deref().map(|t| t.trim().to_string()),
            description: self
                .description
                .as_deref()
                .map(|d| d.trim().to_string()),
            completed: self.completed,
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.is_empty() {
            return Err(ApiError::Validation("Nothing to update".to_string()));
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_description(self.description.as_deref())
    }
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::Validation(
            "Please enter a title for your todo".to_string(),
        ));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(ApiError::Validation(format!(
            "Title must be at most {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), ApiError> {
    match description {
        Some(d) if d.chars().count() > DESCRIPTION_MAX_LEN => Err(ApiError::Validation(format!(
            "Description must be at most {DESCRIPTION_MAX_LEN} characters"
        ))),
        _ => Ok(()),
    }
}

/// Field the server sorts the list by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    Title,
    Description,
    Completed,
    #[default]
    CreatedAt,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Description => "description",
            SortField::Completed => "completed",
            SortField::CreatedAt => "createdAt",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Active list parameters. They persist across fetches until changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub filter: String,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
            page: 1,
            limit: 10,
        }
    }
}

impl Filters {
    /// Overlay the fields present in `patch` onto a copy of `self`.
    #[must_use]
    pub fn merge(&self, patch: &FiltersPatch) -> Self {
        Self {
            filter: patch.filter.clone().unwrap_or_else(|| self.filter.clone()),
            sort_by: patch.sort_by.unwrap_or(self.sort_by),
            sort_order: patch.sort_order.unwrap_or(self.sort_order),
            page: patch.page.unwrap_or(self.page),
            limit: patch.limit.unwrap_or(self.limit),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.page < 1 {
            return Err(ApiError::Validation("Page must be at least 1".to_string()));
        }
        if self.limit < 1 {
            return Err(ApiError::Validation("Limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Partial filter overrides. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FiltersPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl FiltersPatch {
    pub fn search(filter: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
            // a new search starts from the first page
            page: Some(1),
            ..Self::default()
        }
    }

    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }
}

/// Server-derived paging information for the last successful list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// Envelope returned by `GET /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPage {
    pub data: Vec<Todo>,
    pub pagination: Pagination,
}
