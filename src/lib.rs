pub mod assets;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod palette;
pub mod parsers;
pub mod results;
pub mod rules;

// Re-export commonly used types for convenience
pub use error::SnapshotError;
pub use results::{ExtractedDocument, PaletteResult, ScreenshotResult};

use chrono::Utc;
use config::{RenderConfig, SnapshotConfig};
use fetchers::CssSource;
use rules::ExtractionRules;
use url::Url;

/// How a page is retrieved before extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Full browser session that executes page scripts and rides out
    /// bot-challenge interstitials before harvesting markup
    Rendered,
    /// Raw document/stylesheet retrieval without script execution
    Direct,
}

/// Builder for a single-page snapshot.
///
/// Every snapshot is independent: nothing is cached or shared across
/// requests, and rendered-mode sessions live and die within one call.
pub struct Snapshot {
    url: String,
    mode: FetchMode,
    config: SnapshotConfig,
    rules: ExtractionRules,
}

impl Snapshot {
    /// Create a new snapshot builder for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: FetchMode::Rendered,
            config: SnapshotConfig::default(),
            rules: ExtractionRules::default(),
        }
    }

    /// Set the retrieval mode
    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the full configuration
    pub fn with_config(mut self, config: SnapshotConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = SnapshotConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Substitute the extraction rule tables
    pub fn with_rules(mut self, rules: ExtractionRules) -> Self {
        self.rules = rules;
        self
    }

    /// Validates the target URL before any network activity.
    fn target_url(&self) -> Result<Url, SnapshotError> {
        let trimmed = self.url.trim();
        if trimmed.is_empty() {
            return Err(SnapshotError::MissingUrl);
        }
        Url::parse(trimmed).map_err(|e| SnapshotError::InvalidUrl(e.to_string()))
    }

    /// Render profile with the WEBDRIVER_URL environment override applied.
    fn render_config(&self, base: &RenderConfig) -> RenderConfig {
        let mut config = base.clone();
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                config.webdriver_url = webdriver_url;
            }
        }
        config
    }

    /// Extract structured text content from the page.
    pub async fn content(&self) -> Result<ExtractedDocument, SnapshotError> {
        let url = self.target_url()?;
        let html = match self.mode {
            FetchMode::Rendered => {
                let config = self.render_config(&self.config.render);
                fetchers::rendered::harvest_page(url.as_str(), &config, &self.rules).await?
            }
            FetchMode::Direct => fetchers::direct::fetch_document(&url, &self.config.fetch).await?,
        };

        Ok(parsers::content::extract_document(
            &html,
            url.as_str(),
            &self.rules,
        ))
    }

    /// Extract the page's color palette, fonts and image assets.
    pub async fn palette(&self) -> Result<PaletteResult, SnapshotError> {
        let url = self.target_url()?;
        let (html, stylesheets): (String, Vec<CssSource>) = match self.mode {
            FetchMode::Rendered => {
                let config = self.render_config(&self.config.render);
                let html =
                    fetchers::rendered::harvest_page(url.as_str(), &config, &self.rules).await?;
                let stylesheets =
                    fetchers::direct::supplement_stylesheets(&html, &url, &self.config.fetch).await;
                (html, stylesheets)
            }
            FetchMode::Direct => {
                let fetched = fetchers::direct::fetch_page(&url, &self.config.fetch).await?;
                (fetched.html, fetched.stylesheets)
            }
        };

        Ok(palette::build_palette(&html, &url, &stylesheets, &self.rules))
    }

    /// Capture a screenshot of the fully rendered page. Always uses a
    /// rendering session, regardless of the configured mode.
    pub async fn screenshot(&self) -> Result<ScreenshotResult, SnapshotError> {
        let url = self.target_url()?;
        let config = self.render_config(&self.config.screenshot);
        let payload =
            fetchers::rendered::capture_screenshot(url.as_str(), &config, &self.rules).await?;

        Ok(ScreenshotResult {
            success: true,
            screenshot: payload,
            url: url.to_string(),
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_url_rejected_before_network() {
        let err = Snapshot::new("").content().await.unwrap_err();
        assert!(matches!(err, SnapshotError::MissingUrl));
    }

    #[tokio::test]
    async fn test_malformed_url_rejected_before_network() {
        let err = Snapshot::new("not a url").palette().await.unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidUrl(_)));
        assert_eq!(err.status_code(), 400);
    }
}
