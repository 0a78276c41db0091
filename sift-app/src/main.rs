use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use render::{OutputMode, write_page};
use sift_common::observability::init_logging;
use sift_config::{SiftConfig, SiftConfigLoader};
use sift_drivers::sift_browser::options::BrowserOptions;
use sift_web::browser::FantocciniFetcher;
use sift_web::pipeline::{PagePipeline, process_body, process_markup};
use tracing::info;
use url::Url;

mod render;

const DEFAULT_CONFIG_FILE: &str = "sift.yaml";

#[derive(Debug, Parser)]
#[command(
    name = "sift",
    version,
    about = "Fetch a page in a headless browser and cut its visible text into chunks"
)]
struct Cli {
    /// Configuration file (YAML); `sift.yaml` in the working directory is used when present
    #[arg(short, long, env = "SIFT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputMode::Text, global = true)]
    output: OutputMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load a URL through chromedriver and chunk the rendered body text
    Fetch {
        url: Url,
        /// Maximum characters per chunk (overrides `chunking.max_length`)
        #[arg(short = 'n', long)]
        max_length: Option<usize>,
        /// WebDriver endpoint (overrides `browser.webdriver_url`)
        #[arg(long)]
        webdriver_url: Option<String>,
        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },
    /// Chunk local markup read from a file, or stdin when no file is given
    Chunk {
        input: Option<PathBuf>,
        /// Maximum characters per chunk (overrides `chunking.max_length`)
        #[arg(short = 'n', long)]
        max_length: Option<usize>,
        /// Treat the input as body markup and skip body extraction
        #[arg(long)]
        skip_body: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SiftConfig> {
    let loader = match path {
        Some(p) => SiftConfigLoader::new().with_file(p),
        None => SiftConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().context("failed to load configuration")
}

fn browser_options(cfg: &SiftConfig, webdriver_url: Option<String>, headed: bool) -> BrowserOptions {
    BrowserOptions {
        webdriver_url: webdriver_url.unwrap_or_else(|| cfg.browser.webdriver_url.clone()),
        headless: cfg.browser.headless && !headed,
        page_load_timeout: Duration::from_secs(cfg.browser.page_load_timeout_secs),
        extra_args: cfg.browser.extra_args.clone(),
    }
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read markup from stdin")?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins over file)
    let cfg = load_config(cli.config.as_ref())?;

    let log_path = init_logging(cfg.logging.to_log_config("sift"))?;
    info!(log = %log_path.display(), "sift starting");

    let page = match cli.command {
        Commands::Fetch {
            url,
            max_length,
            webdriver_url,
            headed,
        } => {
            let options = browser_options(&cfg, webdriver_url, headed);
            let pipeline = PagePipeline::new(FantocciniFetcher::new(options))
                .with_max_length(max_length.unwrap_or(cfg.chunking.max_length));
            pipeline.scrape(&url).await?
        }
        Commands::Chunk {
            input,
            max_length,
            skip_body,
        } => {
            let markup = read_input(input.as_ref())?;
            let max_length = max_length.unwrap_or(cfg.chunking.max_length);
            if skip_body {
                process_body(&markup, max_length)?
            } else {
                process_markup(&markup, max_length)?
            }
        }
    };

    info!(
        chunks = page.chunks.len(),
        text_chars = page.text_chars,
        "page processed"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_page(&mut out, &page, cli.output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fetch_with_overrides() {
        let cli = Cli::try_parse_from([
            "sift",
            "--output",
            "json",
            "fetch",
            "https://example.com/",
            "-n",
            "4000",
            "--headed",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputMode::Json);
        match cli.command {
            Commands::Fetch {
                url,
                max_length,
                headed,
                webdriver_url,
            } => {
                assert_eq!(url.as_str(), "https://example.com/");
                assert_eq!(max_length, Some(4000));
                assert!(headed);
                assert!(webdriver_url.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_urls() {
        assert!(Cli::try_parse_from(["sift", "fetch", "not a url"]).is_err());
    }

    #[test]
    fn chunk_reads_stdin_by_default() {
        let cli = Cli::try_parse_from(["sift", "chunk", "--skip-body"]).unwrap();
        match cli.command {
            Commands::Chunk {
                input, skip_body, ..
            } => {
                assert!(input.is_none());
                assert!(skip_body);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_flags_override_browser_settings() {
        let cfg = SiftConfig::default();
        let options = browser_options(&cfg, Some("http://grid:4444".into()), true);
        assert_eq!(options.webdriver_url, "http://grid:4444");
        assert!(!options.headless);
        assert_eq!(options.page_load_timeout, Duration::from_secs(30));

        let defaults = browser_options(&cfg, None, false);
        assert_eq!(defaults.webdriver_url, "http://localhost:9515");
        assert!(defaults.headless);
    }
}
