use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use webdriver::capabilities::Capabilities;

/// Default chromedriver endpoint.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

#[derive(Debug, Clone)]
/// How a browser session is launched and how long a page may take to load.
pub struct BrowserOptions {
    pub webdriver_url: String,
    pub headless: bool,
    pub page_load_timeout: Duration,
    /// Appended after the built-in Chrome arguments.
    pub extra_args: Vec<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            page_load_timeout: Duration::from_secs(30),
            extra_args: Vec::new(),
        }
    }
}

/// Construct Chrome command‑line arguments for the given options.
pub fn build_chrome_arguments(options: &BrowserOptions) -> Vec<String> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
    ];
    if options.headless {
        args.push("--headless".to_string());
        args.push("--disable-gpu".to_string());
    }
    args.extend(options.extra_args.iter().cloned());
    args
}

/// WebDriver capabilities requesting a Chrome session with our arguments.
pub fn build_capabilities(options: &BrowserOptions) -> Capabilities {
    let mut caps = Capabilities::new();
    let mut chrome_opts = HashMap::new();
    chrome_opts.insert("args".to_string(), json!(build_chrome_arguments(options)));
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
    caps
}
