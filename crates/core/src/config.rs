use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DROPDOWN_EXCERPT_CHARS: usize = 50;
pub const CARD_EXCERPT_CHARS: usize = 150;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base_url: String,
    pub debounce: Duration,
    pub dropdown_excerpt_chars: usize,
    pub card_excerpt_chars: usize,
    /// Search-as-you-type is opt-in per input.
    pub live_search: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            dropdown_excerpt_chars: DROPDOWN_EXCERPT_CHARS,
            card_excerpt_chars: CARD_EXCERPT_CHARS,
            live_search: true,
        }
    }
}

impl SearchConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_live_search(mut self, enabled: bool) -> Self {
        self.live_search = enabled;
        self
    }
}
