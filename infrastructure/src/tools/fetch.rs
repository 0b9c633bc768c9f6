//! `read_web_page` tool: fetch a URL and return its text.
//!
//! By default pages go through the `r.jina.ai` reader, which returns the page
//! as markdown. With the reader disabled the page is fetched directly and HTML
//! is flattened to text with `scraper`.
//!
//! Output handed to the model is capped at `max_chars` characters followed by
//! [`dojo_domain::TRUNCATION_MARKER`]. The uncapped page stays on the result
//! and the display preview in the tool trace is derived from it.

use dojo_domain::tool::{
    entities::{ToolCall, ToolKind},
    value_objects::{ToolError, ToolResult},
};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default cap on characters returned to the model
pub const DEFAULT_MAX_CHARS: usize = 10_000;

const USER_AGENT: &str = concat!("startup-dojo/", env!("CARGO_PKG_VERSION"));

pub struct WebPageReader {
    client: reqwest::Client,
    reader_base_url: Option<String>,
    api_key: Option<String>,
    max_chars: usize,
}

impl WebPageReader {
    pub fn new(timeout: Duration) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ToolError::execution_failed(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            reader_base_url: None,
            api_key: None,
            max_chars: DEFAULT_MAX_CHARS,
        })
    }

    /// Route fetches through a reader service such as `https://r.jina.ai`
    pub fn with_reader(mut self, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        self.reader_base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self.api_key = api_key;
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    fn request_url(&self, url: &str) -> String {
        match &self.reader_base_url {
            Some(base) => format!("{}/{}", base, url),
            None => url.to_string(),
        }
    }

    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let name = ToolKind::Read.name();
        let start = Instant::now();

        let url = match call.require_string("url") {
            Ok(u) => u,
            Err(e) => return ToolResult::failure(name, ToolError::invalid_argument(e)),
        };
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return ToolResult::failure(
                name,
                ToolError::invalid_argument(format!("Not an http(s) URL: {}", url)),
            );
        }

        let request_url = self.request_url(url);
        debug!(url = %url, via_reader = self.reader_base_url.is_some(), "Fetching web page");

        let mut req = self.client.get(&request_url);
        if self.reader_base_url.is_some()
            && let Some(key) = &self.api_key
        {
            req = req.bearer_auth(key);
        }

        let response = match req.send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                return ToolResult::failure(name, ToolError::timeout(format!("fetching {}", url)));
            }
            Err(e) => {
                return ToolResult::failure(
                    name,
                    ToolError::execution_failed(format!("Error fetching URL: {}", e)),
                );
            }
        };

        let status = response.status();
        let is_html = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("text/html") || ct.contains("application/xhtml"));

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                return ToolResult::failure(
                    name,
                    ToolError::execution_failed(format!("Error fetching URL: {}", e)),
                );
            }
        };

        if !status.is_success() {
            return ToolResult::failure(
                name,
                ToolError::execution_failed(format!(
                    "Error fetching URL: Status {} - {}",
                    status.as_u16(),
                    body
                )),
            );
        }

        let text = if is_html && self.reader_base_url.is_none() {
            html_to_text(&body)
        } else {
            body
        };

        ToolResult::capped(name, text, self.max_chars)
            .with_duration(start.elapsed().as_millis() as u64)
    }
}

/// Extract readable text from HTML, dropping scripts, styles and other
/// non-content subtrees
pub fn html_to_text(html: &str) -> String {
    use scraper::{ElementRef, Html, Node};

    const SKIP: [&str; 5] = ["script", "style", "noscript", "svg", "template"];

    fn walk(element: ElementRef, out: &mut Vec<String>) {
        if SKIP.contains(&element.value().name()) {
            return;
        }
        for child in element.children() {
            match child.value() {
                Node::Text(t) if !t.trim().is_empty() => out.push(t.trim().to_string()),
                Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        walk(el, out);
                    }
                }
                _ => {}
            }
        }
    }

    let document = Html::parse_document(html);
    let body = scraper::Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next());

    let mut parts = Vec::new();
    walk(body.unwrap_or_else(|| document.root_element()), &mut parts);
    parts.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}
