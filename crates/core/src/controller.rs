use crate::render::{render_dropdown, render_error};
use crate::session::{self, Dispatch, InputOutcome, LiveSearchSession, ResponseOutcome, SubmitOutcome};
use crate::traits::{ResultsSurface, SearchApi};
use crate::{ResultPage, SearchConfig, SearchError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// Where a click landed, relative to the search widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Input,
    Results,
    Elsewhere,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The input's full current value after a keystroke.
    Input(String),
    Click(ClickTarget),
    Focus,
}

enum TimerAction {
    Restart,
    Cancel,
    Keep,
}

/// Drives one live-search session: debounces input, dispatches requests and
/// renders whichever response belongs to the latest query.
pub struct SearchController<A, S> {
    api: Arc<A>,
    surface: S,
    session: LiveSearchSession,
    config: SearchConfig,
}

impl<A, S> SearchController<A, S>
where
    A: SearchApi + Send + Sync + 'static,
    S: ResultsSurface,
{
    pub fn new(api: Arc<A>, surface: S, config: SearchConfig) -> Self {
        Self {
            api,
            surface,
            session: LiveSearchSession::new(),
            config,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn session(&self) -> &LiveSearchSession {
        &self.session
    }

    pub fn on_submit(&self, raw: &str) -> SubmitOutcome {
        session::submit(raw)
    }

    /// Runs until the event channel closes, then hands the surface back.
    /// Pending timers and in-flight requests are dropped with the session.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) -> S {
        let debounce = sleep(self.config.debounce);
        tokio::pin!(debounce);
        let mut armed = false;
        let mut in_flight: JoinSet<(Dispatch, Result<ResultPage, SearchError>)> = JoinSet::new();

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    match self.handle_event(event) {
                        TimerAction::Restart => {
                            debounce.as_mut().reset(Instant::now() + self.config.debounce);
                            armed = true;
                        }
                        TimerAction::Cancel => armed = false,
                        TimerAction::Keep => {}
                    }
                }
                () = &mut debounce, if armed => {
                    armed = false;
                    if let Some(dispatch) = self.on_timer() {
                        let api = Arc::clone(&self.api);
                        in_flight.spawn(async move {
                            let result = api.search(&dispatch.query, None).await;
                            (dispatch, result)
                        });
                    }
                }
                Some(joined) = in_flight.join_next() => match joined {
                    Ok((dispatch, result)) => self.on_response(dispatch, result),
                    Err(error) => warn!(%error, "search task did not complete"),
                },
            }
        }

        in_flight.abort_all();
        self.surface
    }

    fn handle_event(&mut self, event: UiEvent) -> TimerAction {
        match event {
            UiEvent::Input(raw) => self.on_input(&raw),
            UiEvent::Click(target) => {
                self.on_click_outside(target);
                TimerAction::Keep
            }
            UiEvent::Focus => {
                self.on_focus();
                TimerAction::Keep
            }
        }
    }

    fn on_input(&mut self, raw: &str) -> TimerAction {
        if !self.config.live_search {
            return TimerAction::Keep;
        }

        match self.session.on_input(raw) {
            InputOutcome::Cleared => {
                self.surface.clear();
                self.surface.hide_loading();
                TimerAction::Cancel
            }
            InputOutcome::Scheduled(_) => TimerAction::Restart,
        }
    }

    fn on_timer(&mut self) -> Option<Dispatch> {
        let dispatch = self.session.on_timer()?;
        debug!(query = %dispatch.query, seq = dispatch.seq, "dispatching search");
        self.surface.show_loading();
        Some(dispatch)
    }

    fn on_response(&mut self, dispatch: Dispatch, result: Result<ResultPage, SearchError>) {
        match self.session.on_response(dispatch, result) {
            ResponseOutcome::Stale => {}
            ResponseOutcome::Render { query, page } => {
                self.surface.hide_loading();
                self.surface
                    .render(render_dropdown(&query, &page, self.config.dropdown_excerpt_chars));
            }
            ResponseOutcome::Failed(error) => {
                warn!(%error, "search error");
                self.surface.hide_loading();
                self.surface.render(render_error());
            }
        }
    }

    fn on_click_outside(&mut self, target: ClickTarget) {
        if self.surface.is_visible() && target == ClickTarget::Elsewhere {
            self.surface.hide();
        }
    }

    fn on_focus(&mut self) {
        if self.session.shows_current_query()
            && !self.surface.is_visible()
            && self.surface.has_content()
        {
            self.surface.show();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemorySurface, Query, SearchResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeSearchApi {
        pages: HashMap<String, ResultPage>,
        delays: HashMap<String, Duration>,
        failing: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSearchApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchApi for FakeSearchApi {
        async fn search(&self, query: &Query, _page: Option<u32>) -> Result<ResultPage, SearchError> {
            self.calls.lock().unwrap().push(query.to_string());
            if let Some(delay) = self.delays.get(query.as_str()) {
                sleep(*delay).await;
            }
            if self.failing {
                return Err(SearchError::Status { status: 500 });
            }
            Ok(self.pages.get(query.as_str()).cloned().unwrap_or(ResultPage {
                items: Vec::new(),
                total_items: 0,
                page: 1,
                total_pages: Some(1),
            }))
        }
    }

    fn post(id: u64, title: &str) -> SearchResult {
        SearchResult {
            id,
            title: title.to_string(),
            summary: None,
            content: "...".to_string(),
            author: "Ann".to_string(),
            created_at: "2024-01-01".to_string(),
            feature_image: None,
        }
    }

    fn single(title: &str) -> ResultPage {
        ResultPage {
            items: vec![post(1, title)],
            total_items: 1,
            page: 1,
            total_pages: Some(1),
        }
    }

    fn start(
        api: Arc<FakeSearchApi>,
        config: SearchConfig,
    ) -> (mpsc::Sender<UiEvent>, tokio::task::JoinHandle<MemorySurface>) {
        let (tx, rx) = mpsc::channel(16);
        let controller = SearchController::new(api, MemorySurface::default(), config);
        (tx, tokio::spawn(controller.run(rx)))
    }

    async fn input(tx: &mpsc::Sender<UiEvent>, raw: &str) {
        tx.send(UiEvent::Input(raw.to_string())).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn blank_input_issues_no_request() {
        let api = Arc::new(FakeSearchApi::default());
        let (tx, handle) = start(Arc::clone(&api), SearchConfig::default());

        input(&tx, "").await;
        input(&tx, "    ").await;
        sleep(Duration::from_secs(2)).await;
        drop(tx);

        let surface = handle.await.unwrap();
        assert!(api.calls().is_empty());
        assert!(!surface.visible);
        assert_eq!(surface.render_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_issues_one_request_for_last_value() {
        let api = Arc::new(FakeSearchApi::default());
        let (tx, handle) = start(Arc::clone(&api), SearchConfig::default());

        for raw in ["c", "ca", "cat"] {
            input(&tx, raw).await;
            sleep(Duration::from_millis(100)).await;
        }
        sleep(Duration::from_secs(1)).await;
        drop(tx);

        handle.await.unwrap();
        assert_eq!(api.calls(), vec!["cat".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_sent_before_the_quiet_period() {
        let api = Arc::new(FakeSearchApi::default());
        let (tx, handle) = start(Arc::clone(&api), SearchConfig::default());

        input(&tx, "cat").await;
        sleep(Duration::from_millis(299)).await;
        assert!(api.calls().is_empty());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(api.calls(), vec!["cat".to_string()]);
        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_older_query_is_ignored() {
        let mut api = FakeSearchApi::default();
        api.pages.insert("ca".to_string(), single("Cars"));
        api.pages.insert("cat".to_string(), single("Cats"));
        api.delays.insert("ca".to_string(), Duration::from_millis(500));
        api.delays.insert("cat".to_string(), Duration::from_millis(100));
        let api = Arc::new(api);
        let (tx, handle) = start(Arc::clone(&api), SearchConfig::default());

        input(&tx, "ca").await;
        sleep(Duration::from_millis(350)).await;
        input(&tx, "cat").await;
        sleep(Duration::from_secs(2)).await;
        drop(tx);

        let surface = handle.await.unwrap();
        assert_eq!(api.calls(), vec!["ca".to_string(), "cat".to_string()]);
        assert_eq!(surface.render_count, 1);
        assert!(surface.html.contains("Cats"));
        assert!(!surface.html.contains("Cars"));
        assert!(!surface.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn end_to_end_single_result() {
        let mut api = FakeSearchApi::default();
        api.pages.insert("cat".to_string(), single("Cats"));
        let (tx, handle) = start(Arc::new(api), SearchConfig::default());

        input(&tx, "cat").await;
        sleep(Duration::from_secs(1)).await;
        drop(tx);

        let surface = handle.await.unwrap();
        assert!(surface.visible);
        assert_eq!(surface.html.matches("class=\"dropdown-item\"").count(), 1);
        assert!(surface.html.contains("Cats"));
        assert!(surface.html.contains("By Ann on 2024-01-01"));
        assert!(!surface.html.contains("View all"));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_replaces_results_with_error() {
        let api = FakeSearchApi {
            failing: true,
            ..Default::default()
        };
        let (tx, handle) = start(Arc::new(api), SearchConfig::default());

        input(&tx, "cat").await;
        sleep(Duration::from_secs(1)).await;
        drop(tx);

        let surface = handle.await.unwrap();
        assert!(surface.visible);
        assert!(!surface.loading);
        assert_eq!(surface.html, render_error());
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_input_hides_results_and_cancels_timer() {
        let mut api = FakeSearchApi::default();
        api.pages.insert("cat".to_string(), single("Cats"));
        let api = Arc::new(api);
        let (tx, handle) = start(Arc::clone(&api), SearchConfig::default());

        input(&tx, "cat").await;
        sleep(Duration::from_secs(1)).await;
        input(&tx, "dog").await;
        sleep(Duration::from_millis(100)).await;
        input(&tx, "").await;
        sleep(Duration::from_secs(1)).await;
        drop(tx);

        let surface = handle.await.unwrap();
        assert_eq!(api.calls(), vec!["cat".to_string()]);
        assert!(!surface.visible);
        assert!(!surface.loading);
        assert!(surface.html.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_during_request_drops_its_response() {
        let mut api = FakeSearchApi::default();
        api.pages.insert("cat".to_string(), single("Cats"));
        api.delays.insert("cat".to_string(), Duration::from_millis(500));
        let api = Arc::new(api);
        let (tx, handle) = start(Arc::clone(&api), SearchConfig::default());

        input(&tx, "cat").await;
        sleep(Duration::from_millis(400)).await;
        input(&tx, "").await;
        sleep(Duration::from_secs(1)).await;
        drop(tx);

        let surface = handle.await.unwrap();
        assert_eq!(api.calls(), vec!["cat".to_string()]);
        assert!(!surface.loading);
        assert!(!surface.visible);
        assert!(surface.html.is_empty());
        assert_eq!(surface.render_count, 0);
    }

    #[test]
    fn click_outside_hides_and_focus_redisplays() {
        let mut controller = SearchController::new(
            Arc::new(FakeSearchApi::default()),
            MemorySurface::default(),
            SearchConfig::default(),
        );
        controller.on_input("cat");
        let dispatch = controller.on_timer().expect("pending query");
        controller.on_response(dispatch, Ok(single("Cats")));
        assert!(controller.surface().visible);

        controller.on_click_outside(ClickTarget::Results);
        controller.on_click_outside(ClickTarget::Input);
        assert!(controller.surface().visible);

        controller.on_click_outside(ClickTarget::Elsewhere);
        assert!(!controller.surface().visible);
        assert!(controller.surface().html.contains("Cats"));

        controller.on_focus();
        assert!(controller.surface().visible);
    }

    #[tokio::test(start_paused = true)]
    async fn focus_keeps_results_hidden_once_query_changed() {
        let mut api = FakeSearchApi::default();
        api.pages.insert("cat".to_string(), single("Cats"));
        let (tx, handle) = start(Arc::new(api), SearchConfig::default());

        input(&tx, "cat").await;
        sleep(Duration::from_secs(1)).await;
        tx.send(UiEvent::Click(ClickTarget::Elsewhere)).await.unwrap();
        input(&tx, "dog").await;
        tx.send(UiEvent::Focus).await.unwrap();
        sleep(Duration::from_millis(10)).await;
        drop(tx);

        let surface = handle.await.unwrap();
        assert!(!surface.visible);
        assert!(surface.html.contains("Cats"));
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_live_search_ignores_input() {
        let api = Arc::new(FakeSearchApi::default());
        let (tx, handle) = start(Arc::clone(&api), SearchConfig::default().with_live_search(false));

        input(&tx, "cat").await;
        sleep(Duration::from_secs(1)).await;
        drop(tx);

        handle.await.unwrap();
        assert!(api.calls().is_empty());
    }

    #[test]
    fn submit_delegates_to_session_rules() {
        let controller = SearchController::new(
            Arc::new(FakeSearchApi::default()),
            MemorySurface::default(),
            SearchConfig::default(),
        );
        assert_eq!(controller.on_submit(" "), SubmitOutcome::Rejected);
        assert_eq!(
            controller.on_submit("cat"),
            SubmitOutcome::Navigate("/search?q=cat".to_string())
        );
    }
}
