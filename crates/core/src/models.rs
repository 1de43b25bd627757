use crate::SearchError;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull, NoneAsEmptyString};
use std::fmt;

/// A trimmed, non-empty search string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One post as returned by `GET /api/search`.
///
/// Empty `summary` and `feature_image` strings are treated as absent, the
/// same way the page scripts treat them as falsy.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: u64,
    pub title: String,
    #[serde_as(as = "DefaultOnNull<NoneAsEmptyString>")]
    #[serde(default)]
    pub summary: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub content: String,
    pub author: String,
    pub created_at: String,
    #[serde_as(as = "DefaultOnNull<NoneAsEmptyString>")]
    #[serde(default)]
    pub feature_image: Option<String>,
}

impl SearchResult {
    /// The summary when present, otherwise the first `max_chars` characters of the body.
    pub fn excerpt(&self, max_chars: usize) -> String {
        match &self.summary {
            Some(summary) => summary.clone(),
            None => truncate_text(&self.content, max_chars),
        }
    }

    pub fn link(&self) -> String {
        format!("/post/{}", self.id)
    }
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Raw response body of the search API.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub posts: Vec<SearchResult>,
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub items: Vec<SearchResult>,
    pub total_items: u64,
    pub page: u32,
    /// `None` when the server did not report it; callers fall back to
    /// whatever page count the page markup carried.
    pub total_pages: Option<u32>,
}

impl ResultPage {
    pub fn from_response(response: SearchResponse, requested_page: Option<u32>) -> Self {
        let total_items = response
            .total_items
            .unwrap_or(response.posts.len() as u64);
        Self {
            page: response.page.or(requested_page).unwrap_or(1),
            total_pages: response.total_pages,
            total_items,
            items: response.posts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// More matches exist than were delivered in this page.
    pub fn has_more(&self) -> bool {
        self.total_items > self.items.len() as u64
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub current_query: Option<Query>,
    pub current_page: u32,
    pub total_pages: u32,
    pub is_loading: bool,
}

impl SessionState {
    pub fn for_query(query: Query, total_pages: u32) -> Self {
        Self {
            current_query: Some(query),
            current_page: 1,
            total_pages,
            is_loading: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Visual state of the "load more" control on the full results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMoreState {
    #[default]
    Idle,
    Loading,
    Retry,
    Hidden,
}

impl LoadMoreState {
    pub fn label(&self) -> &'static str {
        match self {
            LoadMoreState::Idle => "Load More",
            LoadMoreState::Loading => "Loading...",
            LoadMoreState::Retry => "Try Again",
            LoadMoreState::Hidden => "",
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, LoadMoreState::Loading)
    }
}
