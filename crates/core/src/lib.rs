pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod pagination;
pub mod render;
pub mod session;
pub mod stores;
pub mod surface;
pub mod traits;

pub use config::SearchConfig;
pub use controller::{ClickTarget, SearchController, UiEvent};
pub use error::SearchError;
pub use models::{
    truncate_text, LoadMoreState, Query, ResultPage, SearchResponse, SearchResult, SessionState,
};
pub use pagination::{LoadMoreController, LoadMoreOutcome};
pub use session::{submit, LiveSearchSession, SubmitOutcome};
pub use stores::HttpSearchApi;
pub use surface::{MemoryResultsPage, MemorySurface};
pub use traits::{ResultsPageSurface, ResultsSurface, SearchApi};
