use crate::sift_browser::options::{build_capabilities, BrowserOptions};
use fantoccini::{Client, ClientBuilder};
use sift_common::RetrievalError;
use tracing::{debug, info, warn};
use url::Url;

/// One WebDriver browser session.
///
/// Sessions are not closed on drop; callers either go through
/// [`fetch_page_source`] or call [`BrowserSession::close`] themselves.
pub struct BrowserSession {
    client: Client,
    endpoint: String,
}

impl BrowserSession {
    /// Start a session on the WebDriver service named in `options`.
    pub async fn connect(options: &BrowserOptions) -> Result<Self, RetrievalError> {
        info!(
            target: "browser.session",
            endpoint = %options.webdriver_url,
            headless = options.headless,
            "launching browser session"
        );

        let client = ClientBuilder::native()
            .capabilities(build_capabilities(options))
            .connect(&options.webdriver_url)
            .await
            .map_err(|e| RetrievalError::Launch {
                endpoint: options.webdriver_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: options.webdriver_url.clone(),
        })
    }

    /// Navigate to `url` and return the rendered page source.
    pub async fn load_source(&self, url: &Url) -> Result<String, RetrievalError> {
        self.client
            .goto(url.as_str())
            .await
            .map_err(|e| RetrievalError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        info!(target: "browser.session", %url, "page loaded");

        let html = self
            .client
            .source()
            .await
            .map_err(|e| RetrievalError::Source {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        debug!(target: "browser.session", %url, bytes = html.len(), "page source captured");
        Ok(html)
    }

    /// WebDriver endpoint this session was opened on.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<(), RetrievalError> {
        self.client
            .close()
            .await
            .map_err(|e| RetrievalError::Shutdown {
                message: e.to_string(),
            })
    }
}

/// Open a session, load `url` under the page-load timeout and close the
/// session again, whatever the outcome of the load.
///
/// A failure to close is logged and does not replace the load result.
pub async fn fetch_page_source(
    options: &BrowserOptions,
    url: &Url,
) -> Result<String, RetrievalError> {
    let session = BrowserSession::connect(options).await?;

    let result = match tokio::time::timeout(options.page_load_timeout, session.load_source(url))
        .await
    {
        Ok(loaded) => loaded,
        Err(_) => Err(RetrievalError::Timeout {
            url: url.to_string(),
            secs: options.page_load_timeout.as_secs(),
        }),
    };

    let endpoint = session.endpoint().to_string();
    if let Err(e) = session.close().await {
        warn!(target: "browser.session", %endpoint, error = %e, "browser session did not close cleanly");
    }

    result
}
