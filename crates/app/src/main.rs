use chrono::Utc;
use clap::{Parser, Subcommand};
use live_search_core::render::{render_dropdown, render_error, render_load_more_control};
use live_search_core::{
    ClickTarget, HttpSearchApi, LoadMoreController, LoadMoreOutcome, MemoryResultsPage,
    MemorySurface, Query, ResultsSurface, SearchApi, SearchConfig, SearchController, UiEvent,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "live-search", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the site serving /api/search
    #[arg(long, env = "LIVE_SEARCH_BASE_URL", default_value = live_search_core::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Quiet period before a typed query is sent
    #[arg(long, env = "LIVE_SEARCH_DEBOUNCE_MS", default_value_t = live_search_core::config::DEFAULT_DEBOUNCE_MS)]
    debounce_ms: u64,

    /// Treat the input as a plain search box without search-as-you-type
    #[arg(long, default_value_t = false)]
    no_live_search: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Send one search and print the dropdown markup.
    Query {
        /// Search text
        #[arg(long)]
        q: String,
    },
    /// Walk the full results page by pressing "load more".
    Page {
        /// Search text, as carried by the control's data-query
        #[arg(long)]
        q: String,
        /// Page count, as carried by the control's data-total-pages
        #[arg(long, default_value = "1")]
        total_pages: String,
        /// Maximum number of clicks.
        #[arg(long, default_value = "1")]
        pages: usize,
    },
    /// Read input values from stdin, one per line, and render results live.
    ///
    /// The lines `:click` and `:focus` simulate a click outside the dropdown
    /// and refocusing the input.
    Live {
        /// How long to keep the session open after stdin closes.
        #[arg(long, default_value = "2000")]
        settle_ms: u64,
    },
}

/// Dropdown that echoes each render to stdout.
#[derive(Default)]
struct ConsoleSurface {
    inner: MemorySurface,
}

impl ResultsSurface for ConsoleSurface {
    fn show_loading(&mut self) {
        self.inner.show_loading();
        println!("[loading]");
    }

    fn hide_loading(&mut self) {
        self.inner.hide_loading();
    }

    fn render(&mut self, html: String) {
        println!("{html}");
        self.inner.render(html);
    }

    fn clear(&mut self) {
        self.inner.clear();
        println!("[cleared]");
    }

    fn hide(&mut self) {
        self.inner.hide();
        println!("[hidden]");
    }

    fn show(&mut self) {
        self.inner.show();
        println!("{}", self.inner.html);
    }

    fn is_visible(&self) -> bool {
        self.inner.is_visible()
    }

    fn has_content(&self) -> bool {
        self.inner.has_content()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = SearchConfig::default()
        .with_base_url(&cli.base_url)
        .with_debounce(Duration::from_millis(cli.debounce_ms))
        .with_live_search(!cli.no_live_search);
    let api = HttpSearchApi::new(&config.base_url)?;

    info!(
        version = app_version,
        base_url = %config.base_url,
        started_at = %Utc::now().to_rfc3339(),
        "live-search boot"
    );

    match cli.command {
        Command::Query { q } => {
            let query = match Query::parse(&q) {
                Ok(query) => query,
                Err(_) => {
                    warn!("empty query, nothing sent");
                    return Ok(());
                }
            };

            match api.search(&query, None).await {
                Ok(page) => println!(
                    "{}",
                    render_dropdown(&query, &page, config.dropdown_excerpt_chars)
                ),
                Err(error) => {
                    warn!(%error, "search error");
                    println!("{}", render_error());
                }
            }
        }
        Command::Page {
            q,
            total_pages,
            pages,
        } => {
            let mut flow = LoadMoreController::from_control(
                api,
                MemoryResultsPage::default(),
                &q,
                &total_pages,
                &config,
            )?;

            for _ in 0..pages {
                match flow.load_more().await {
                    LoadMoreOutcome::Exhausted => break,
                    LoadMoreOutcome::Appended { page, items } => {
                        info!(page, items, "appended page");
                    }
                    LoadMoreOutcome::Failed { page } => {
                        warn!(page, "page failed to load");
                        break;
                    }
                }
            }

            let surface = flow.into_surface();
            println!("{}", surface.html());
            if let Some(control) = render_load_more_control(surface.control) {
                println!("{control}");
            }
        }
        Command::Live { settle_ms } => {
            let (tx, rx) = mpsc::channel(64);
            let controller =
                SearchController::new(Arc::new(api), ConsoleSurface::default(), config);
            let session = tokio::spawn(controller.run(rx));

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let event = match line.as_str() {
                    ":click" => UiEvent::Click(ClickTarget::Elsewhere),
                    ":focus" => UiEvent::Focus,
                    _ => UiEvent::Input(line),
                };
                if tx.send(event).await.is_err() {
                    break;
                }
            }

            tokio::time::sleep(Duration::from_millis(settle_ms)).await;
            drop(tx);
            session.await?;
        }
    }

    Ok(())
}
