use anyhow::Result;
use clap::ValueEnum;
use sift_web::pipeline::ProcessedPage;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// One block per chunk under a `--- chunk i/n ---` header
    #[default]
    Text,
    /// The whole processed page as pretty-printed JSON
    Json,
}

pub fn write_page<W: Write>(out: &mut W, page: &ProcessedPage, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Text => {
            let total = page.chunks.len();
            for (i, chunk) in page.chunks.iter().enumerate() {
                writeln!(
                    out,
                    "--- chunk {}/{} ({} chars) ---",
                    i + 1,
                    total,
                    chunk.chars().count()
                )?;
                writeln!(out, "{chunk}")?;
            }
        }
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, page)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
