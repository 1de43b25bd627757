//! HTML for the live dropdown and the full results page.
//!
//! Everything here is a pure function of a query and a result page so the
//! markup can be asserted on without a document.

use crate::{LoadMoreState, Query, ResultPage, SearchResult};
use url::form_urlencoded;

pub const SEARCH_ERROR_MESSAGE: &str = "An error occurred while searching. Please try again.";

pub fn no_results_message(query: &Query) -> String {
    format!("No results found for \"{query}\"")
}

pub fn render_dropdown(query: &Query, page: &ResultPage, excerpt_chars: usize) -> String {
    if page.is_empty() {
        return format!(
            "<div class=\"p-3\">{}</div>",
            escape_html(&no_results_message(query))
        );
    }

    let mut html = format!(
        "<h6 class=\"dropdown-header\">Results for \"{}\"</h6>",
        escape_html(query.as_str())
    );

    for post in &page.items {
        html.push_str(&render_dropdown_item(post, excerpt_chars));
    }

    if page.has_more() {
        html.push_str(&format!(
            "<div class=\"dropdown-divider\"></div>\
             <a href=\"{}\" class=\"dropdown-item text-primary\">View all {} results</a>",
            escape_html(&results_page_url(query)),
            page.total_items
        ));
    }

    html
}

fn render_dropdown_item(post: &SearchResult, excerpt_chars: usize) -> String {
    let thumbnail = post
        .feature_image
        .as_deref()
        .map(|image| {
            format!(
                "<div class=\"me-2\"><img src=\"{}\" alt=\"{}\" width=\"40\" height=\"40\" class=\"rounded\" /></div>",
                escape_html(image),
                escape_html(&post.title)
            )
        })
        .unwrap_or_default();

    format!(
        "<a href=\"{link}\" class=\"dropdown-item\">\
         <div class=\"d-flex align-items-center\">{thumbnail}<div>\
         <div class=\"fw-bold\">{title}</div>\
         <div class=\"small text-muted\">{excerpt}</div>\
         <div class=\"small text-muted\">{byline}</div>\
         </div></div></a>",
        link = post.link(),
        title = escape_html(&post.title),
        excerpt = escape_html(&post.excerpt(excerpt_chars)),
        byline = escape_html(&byline(post)),
    )
}

pub fn render_error() -> String {
    format!("<div class=\"alert alert-danger\">{SEARCH_ERROR_MESSAGE}</div>")
}

pub fn render_card(post: &SearchResult, excerpt_chars: usize) -> String {
    let (image, body_class) = match post.feature_image.as_deref() {
        Some(image) => (
            format!(
                "<div class=\"col-md-4\"><img src=\"{}\" class=\"img-fluid rounded-start\" alt=\"{}\"></div>",
                escape_html(image),
                escape_html(&post.title)
            ),
            "col-md-8",
        ),
        None => (String::new(), "col-12"),
    };

    format!(
        "<div class=\"card mb-3 fade-in\"><div class=\"row g-0\">{image}\
         <div class=\"{body_class}\"><div class=\"card-body\">\
         <h5 class=\"card-title\">{title}</h5>\
         <p class=\"card-text\">{excerpt}</p>\
         <p class=\"card-text\"><small class=\"text-muted\">{byline}</small></p>\
         <a href=\"{link}\" class=\"btn btn-primary btn-sm\">Read More</a>\
         </div></div></div></div>",
        title = escape_html(&post.title),
        excerpt = escape_html(&post.excerpt(excerpt_chars)),
        byline = escape_html(&byline(post)),
        link = post.link(),
    )
}

pub fn render_cards(items: &[SearchResult], excerpt_chars: usize) -> String {
    items
        .iter()
        .map(|post| render_card(post, excerpt_chars))
        .collect()
}

/// Markup for the load-more control, `None` once it is hidden.
pub fn render_load_more_control(state: LoadMoreState) -> Option<String> {
    let label = match state {
        LoadMoreState::Hidden => return None,
        LoadMoreState::Loading => format!(
            "<span class=\"spinner-border spinner-border-sm\" role=\"status\" aria-hidden=\"true\"></span> {}",
            state.label()
        ),
        _ => state.label().to_string(),
    };
    let disabled = if state.is_disabled() { " disabled" } else { "" };

    Some(format!(
        "<button id=\"load-more-results\" class=\"btn btn-outline-primary\"{disabled}>{label}</button>"
    ))
}

pub fn byline(post: &SearchResult) -> String {
    format!("By {} on {}", post.author, post.created_at)
}

pub fn results_page_url(query: &Query) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_str().as_bytes()).collect();
    format!("/search?q={encoded}")
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
