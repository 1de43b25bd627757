use crate::render::results_page_url;
use crate::{Query, ResultPage, SearchError, SessionState};
use tracing::debug;

/// A request the session has committed to, tagged with the input generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub seq: u64,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Blank input: results cleared, pending timer cancelled.
    Cleared,
    /// Restart the debounce timer for this query.
    Scheduled(Query),
}

#[derive(Debug)]
pub enum ResponseOutcome {
    /// Superseded by newer input; must not touch the view.
    Stale,
    Render { query: Query, page: ResultPage },
    Failed(SearchError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected,
    Navigate(String),
}

/// Live-search state machine.
///
/// Every input bumps `seq`; a response is applied only when it carries the
/// latest `seq` and no newer query is waiting on the debounce timer, so the
/// last query wins regardless of response arrival order.
#[derive(Debug, Default)]
pub struct LiveSearchSession {
    state: SessionState,
    seq: u64,
    pending: Option<Query>,
    /// Query whose results or error the surface currently holds.
    rendered: Option<Query>,
}

impl LiveSearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn on_input(&mut self, raw: &str) -> InputOutcome {
        self.seq += 1;

        let query = match Query::parse(raw) {
            Ok(query) => query,
            Err(_) => {
                self.pending = None;
                self.rendered = None;
                self.state.reset();
                return InputOutcome::Cleared;
            }
        };

        if self.state.current_query.as_ref() != Some(&query) {
            self.state = SessionState::for_query(query.clone(), 0);
        }
        self.state.is_loading = false;
        self.pending = Some(query.clone());
        InputOutcome::Scheduled(query)
    }

    /// Debounce window elapsed; hand out the request to issue, if any.
    pub fn on_timer(&mut self) -> Option<Dispatch> {
        let query = self.pending.take()?;
        self.state.is_loading = true;
        Some(Dispatch {
            seq: self.seq,
            query,
        })
    }

    /// True when the surface holds output for the query the input still shows.
    pub fn shows_current_query(&self) -> bool {
        !self.has_pending()
            && self.rendered.is_some()
            && self.rendered == self.state.current_query
    }

    pub fn is_current(&self, dispatch: &Dispatch) -> bool {
        dispatch.seq == self.seq && self.pending.is_none()
    }

    pub fn on_response(
        &mut self,
        dispatch: Dispatch,
        result: Result<ResultPage, SearchError>,
    ) -> ResponseOutcome {
        if !self.is_current(&dispatch) {
            debug!(
                query = %dispatch.query,
                seq = dispatch.seq,
                current = self.seq,
                "discarding stale search response"
            );
            return ResponseOutcome::Stale;
        }

        self.state.is_loading = false;
        self.rendered = Some(dispatch.query.clone());
        match result {
            Ok(page) => {
                self.state.current_page = page.page;
                self.state.total_pages = page.total_pages.unwrap_or(1);
                ResponseOutcome::Render {
                    query: dispatch.query,
                    page,
                }
            }
            Err(error) => ResponseOutcome::Failed(error),
        }
    }
}

/// Form submission: blank queries are swallowed, anything else navigates to the results page.
pub fn submit(raw: &str) -> SubmitOutcome {
    match Query::parse(raw) {
        Ok(query) => SubmitOutcome::Navigate(results_page_url(&query)),
        Err(_) => SubmitOutcome::Rejected,
    }
}
