use crate::render::render_cards;
use crate::traits::{ResultsPageSurface, SearchApi};
use crate::{LoadMoreState, Query, SearchConfig, SearchError, SessionState};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMoreOutcome {
    /// Already on the last page; nothing was sent and nothing changed.
    Exhausted,
    Appended { page: u32, items: usize },
    /// Request failed; the control offers a retry of the same page.
    Failed { page: u32 },
}

/// The "load more" flow on the full results page.
///
/// Pages are appended, never replaced. A failed page keeps its page number so
/// the next click retries it instead of skipping ahead.
pub struct LoadMoreController<A, S> {
    api: A,
    surface: S,
    query: Query,
    state: SessionState,
    retry_pending: bool,
    excerpt_chars: usize,
}

impl<A, S> LoadMoreController<A, S>
where
    A: SearchApi + Send + Sync,
    S: ResultsPageSurface,
{
    pub fn new(api: A, surface: S, query: Query, total_pages: u32, config: &SearchConfig) -> Self {
        Self {
            api,
            surface,
            state: SessionState::for_query(query.clone(), total_pages),
            query,
            retry_pending: false,
            excerpt_chars: config.card_excerpt_chars,
        }
    }

    /// Builds the flow from the control's `data-query` and `data-total-pages` attributes.
    /// An unreadable page count is treated as a single page.
    pub fn from_control(
        api: A,
        surface: S,
        data_query: &str,
        data_total_pages: &str,
        config: &SearchConfig,
    ) -> Result<Self, SearchError> {
        let query = Query::parse(data_query)?;
        let total_pages = data_total_pages.trim().parse::<u32>().unwrap_or(1).max(1);
        Ok(Self::new(api, surface, query, total_pages, config))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn is_exhausted(&self) -> bool {
        !self.retry_pending && self.state.current_page >= self.state.total_pages
    }

    pub async fn load_more(&mut self) -> LoadMoreOutcome {
        if self.is_exhausted() {
            return LoadMoreOutcome::Exhausted;
        }

        if !self.retry_pending {
            self.state.current_page += 1;
        }
        let page_number = self.state.current_page;

        self.state.is_loading = true;
        self.surface.set_control(LoadMoreState::Loading);
        debug!(query = %self.query, page = page_number, "loading more results");

        let result = self.api.search(&self.query, Some(page_number)).await;
        self.state.is_loading = false;

        match result {
            Ok(page) => {
                self.retry_pending = false;
                if let Some(total_pages) = page.total_pages {
                    self.state.total_pages = total_pages;
                }

                let items = page.items.len();
                if items > 0 {
                    self.surface.append(render_cards(&page.items, self.excerpt_chars));
                }

                let control = if self.state.current_page >= self.state.total_pages {
                    LoadMoreState::Hidden
                } else {
                    LoadMoreState::Idle
                };
                self.surface.set_control(control);

                LoadMoreOutcome::Appended {
                    page: page_number,
                    items,
                }
            }
            Err(error) => {
                warn!(%error, page = page_number, "error loading more results");
                self.retry_pending = true;
                self.surface.set_control(LoadMoreState::Retry);
                LoadMoreOutcome::Failed { page: page_number }
            }
        }
    }
}
