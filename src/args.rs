use clap::{Parser, ValueEnum};
use page_harvest::FetchMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-harvest")]
#[command(about = "Extracts structured content and visual identity from web pages")]
#[command(version)]
pub struct Args {
    /// Page URL to snapshot
    pub url: String,

    /// Operation to perform
    #[arg(short, long, value_enum, default_value_t = Operation::Content)]
    pub op: Operation,

    /// Retrieval mode (screenshot always uses a rendering session)
    #[arg(short, long, value_enum, default_value_t = ModeArg::Rendered)]
    pub mode: ModeArg,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint override for rendered mode
    #[arg(long)]
    pub webdriver_url: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    /// Structured text content (title, headings, paragraphs, buttons)
    Content,
    /// Color palette, fonts and image assets
    Palette,
    /// Base64-encoded screenshot of the rendered page
    Screenshot,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Rendered,
    Direct,
}

/// Convert from CLI argument mode to the library mode
pub fn convert_mode(arg_mode: ModeArg) -> FetchMode {
    match arg_mode {
        ModeArg::Rendered => FetchMode::Rendered,
        ModeArg::Direct => FetchMode::Direct,
    }
}
