use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("search api responded with {status}")]
    Status { status: u16 },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SearchError {
    /// Transport failures are surfaced to the user; validation failures are not.
    pub fn is_transport(&self) -> bool {
        !matches!(self, SearchError::EmptyQuery)
    }
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
