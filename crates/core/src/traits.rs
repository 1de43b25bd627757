use crate::{LoadMoreState, Query, ResultPage, SearchError};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SearchApi {
    /// `page` is `None` for the first, unpaginated request.
    async fn search(&self, query: &Query, page: Option<u32>) -> Result<ResultPage, SearchError>;
}

#[async_trait]
impl<T> SearchApi for Arc<T>
where
    T: SearchApi + Send + Sync + ?Sized,
{
    async fn search(&self, query: &Query, page: Option<u32>) -> Result<ResultPage, SearchError> {
        (**self).search(query, page).await
    }
}

/// Output sink for the live results dropdown and its loading indicator.
pub trait ResultsSurface {
    fn show_loading(&mut self);

    fn hide_loading(&mut self);

    /// Replace the content and make the surface visible.
    fn render(&mut self, html: String);

    /// Empty the surface and hide it.
    fn clear(&mut self);

    /// Hide without discarding content.
    fn hide(&mut self);

    fn show(&mut self);

    fn is_visible(&self) -> bool;

    fn has_content(&self) -> bool;
}

/// Output sink for the full results page: the card list and its load-more control.
pub trait ResultsPageSurface {
    fn append(&mut self, html: String);

    fn set_control(&mut self, state: LoadMoreState);
}
