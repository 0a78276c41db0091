use serde::Serialize;
use sift_common::Result;
use tracing::{debug, info};
use url::Url;

use crate::browser::PageFetcher;
use crate::chunk::{DEFAULT_MAX_LENGTH, split_dom_content};
use crate::extract::{clean_body_content, extract_body_content};

/// Result of running a page through body extraction, cleaning and chunking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub text: String,
    pub text_chars: usize,
    pub max_length: usize,
    pub chunks: Vec<String>,
}

/// Run the three text stages over raw page markup.
pub fn process_markup(html: &str, max_length: usize) -> Result<ProcessedPage> {
    let body = extract_body_content(html);
    process_body(&body, max_length)
}

/// Like [`process_markup`], for input that is already body markup.
pub fn process_body(body: &str, max_length: usize) -> Result<ProcessedPage> {
    let text = clean_body_content(body);
    let chunks = split_dom_content(&text, max_length)?;
    let text_chars = text.chars().count();

    debug!(
        target: "sift.pipeline",
        body_bytes = body.len(),
        text_chars,
        chunks = chunks.len(),
        max_length,
        "page processed"
    );

    Ok(ProcessedPage {
        url: None,
        text,
        text_chars,
        max_length,
        chunks,
    })
}

/// Fetch-then-process pipeline over a [`PageFetcher`].
pub struct PagePipeline<F> {
    fetcher: F,
    max_length: usize,
}

impl<F: PageFetcher> PagePipeline<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Process markup that was obtained elsewhere.
    pub fn process(&self, html: &str) -> Result<ProcessedPage> {
        process_markup(html, self.max_length)
    }

    /// Retrieve `url` and process its markup. Retrieval errors come back as
    /// [`SiftError::Retrieval`](sift_common::SiftError::Retrieval) unchanged.
    pub async fn scrape(&self, url: &Url) -> Result<ProcessedPage> {
        info!(target: "sift.pipeline", %url, "fetching page");
        let html = self.fetcher.fetch(url).await?;
        info!(target: "sift.pipeline", %url, bytes = html.len(), "page fetched; extracting content");

        let mut page = self.process(&html)?;
        page.url = Some(url.to_string());
        Ok(page)
    }
}
