// Markup rendering for the article feed.
// Builds escaped HTML from feed payloads and writes it to a display sink.

use std::borrow::Cow;

use crate::feed::FeedPayload;

/// Shown when there is nothing to render: empty feed, or no network and no cache.
pub const EMPTY_STATE_MESSAGE: &str = "<p>Sorry, cannot load the articles at this time.</p>";

/// Presentation surface for rendered markup.
pub trait DisplaySink {
    /// Add markup after whatever is already shown.
    fn append(&mut self, markup: &str);
    /// Discard what is shown and show `markup` instead.
    fn replace(&mut self, markup: &str);
}

/// How the empty-state message is written to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyState {
    #[default]
    Append,
    Replace,
}

/// String-backed sink holding the body of a page.
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    body: String,
}

impl HtmlDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the markup written so far.
    pub fn contents(&self) -> &str {
        &self.body
    }

    /// Wrap the body in a standalone page with an `#app` root.
    pub fn into_page(self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<main id=\"app\">{}</main>\n</body>\n</html>\n",
            sanitize(title),
            self.body
        )
    }
}

impl DisplaySink for HtmlDocument {
    fn append(&mut self, markup: &str) {
        self.body.push_str(markup);
    }

    fn replace(&mut self, markup: &str) {
        self.body.clear();
        self.body.push_str(markup);
    }
}

/// Escape untrusted text so it is inert inside element content or attribute values.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    html_escape::encode_safe(text)
}

/// Render a feed block, or None if the feed has no articles.
pub fn render_feed(feed: &FeedPayload) -> Option<String> {
    if feed.is_empty() {
        return None;
    }

    let mut html = String::new();
    html.push_str("<div>");
    html.push_str(&format!("<h1>{}</h1>", sanitize(&feed.publication)));
    html.push_str(&format!("<h2>{}</h2>", sanitize(&feed.tagline)));
    for article in &feed.articles {
        html.push_str(&format!(
            "<article><h4>{} by {}</h4><p>{}</p></article>",
            sanitize(&article.title),
            sanitize(&article.author),
            sanitize(&article.article)
        ));
    }
    html.push_str("</div>");

    Some(html)
}

/// Write the empty-state message according to `mode`.
pub fn render_empty<D: DisplaySink + ?Sized>(sink: &mut D, mode: EmptyState) {
    match mode {
        EmptyState::Append => sink.append(EMPTY_STATE_MESSAGE),
        EmptyState::Replace => sink.replace(EMPTY_STATE_MESSAGE),
    }
}
