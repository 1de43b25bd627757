use crate::traits::{ResultsPageSurface, ResultsSurface};
use crate::LoadMoreState;

/// In-memory results dropdown.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    pub html: String,
    pub visible: bool,
    pub loading: bool,
    /// Number of renders applied over the session.
    pub render_count: usize,
}

impl ResultsSurface for MemorySurface {
    fn show_loading(&mut self) {
        self.loading = true;
    }

    fn hide_loading(&mut self) {
        self.loading = false;
    }

    fn render(&mut self, html: String) {
        self.render_count += 1;
        self.html = html;
        self.visible = true;
    }

    fn clear(&mut self) {
        self.html.clear();
        self.visible = false;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn has_content(&self) -> bool {
        !self.html.is_empty()
    }
}

/// In-memory full results page.
#[derive(Debug, Clone, Default)]
pub struct MemoryResultsPage {
    pub cards: Vec<String>,
    pub control: LoadMoreState,
}

impl MemoryResultsPage {
    pub fn html(&self) -> String {
        self.cards.concat()
    }
}

impl ResultsPageSurface for MemoryResultsPage {
    fn append(&mut self, html: String) {
        self.cards.push(html);
    }

    fn set_control(&mut self, state: LoadMoreState) {
        self.control = state;
    }
}
