use std::sync::Arc;

use async_trait::async_trait;
use sift_common::RetrievalError;
use sift_drivers::sift_browser::options::BrowserOptions;
use sift_drivers::sift_browser::session::fetch_page_source;
use url::Url;

/// Anything that can turn a URL into rendered page markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, RetrievalError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &Url) -> Result<String, RetrievalError> {
        (**self).fetch(url).await
    }
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Box<T> {
    async fn fetch(&self, url: &Url) -> Result<String, RetrievalError> {
        (**self).fetch(url).await
    }
}

/// Concrete fetcher backed by a chromedriver session per call.
#[derive(Debug, Clone, Default)]
pub struct FantocciniFetcher {
    options: BrowserOptions,
}

impl FantocciniFetcher {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BrowserOptions {
        &self.options
    }
}

#[async_trait]
impl PageFetcher for FantocciniFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, RetrievalError> {
        fetch_page_source(&self.options, url).await
    }
}
