use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Fixed browser identity presented to target sites in both modes
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Declared language preference presented to target sites
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Configuration for a rendered-page session.
///
/// Two timeout profiles exist (extraction and screenshot); both are plain
/// tunable values rather than separate code paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// URL of the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Deadline for navigation to the target URL (fatal on expiry)
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,

    /// Deadline for a body element to appear (non-fatal on expiry)
    #[serde(default = "default_body_timeout")]
    pub body_timeout_secs: u64,

    /// Deadline for challenge interstitials to clear (non-fatal on expiry)
    #[serde(default = "default_challenge_timeout")]
    pub challenge_timeout_secs: u64,

    /// Extra delay applied when the challenge deadline expires
    #[serde(default = "default_challenge_grace")]
    pub challenge_grace_secs: u64,

    /// Delay after readiness to let late dynamic content render
    #[serde(default = "default_settle")]
    pub settle_secs: u64,

    /// Interval between readiness probes
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

impl RenderConfig {
    /// Profile used for content and palette extraction.
    pub fn extraction() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            navigation_timeout_secs: default_navigation_timeout(),
            body_timeout_secs: default_body_timeout(),
            challenge_timeout_secs: default_challenge_timeout(),
            challenge_grace_secs: default_challenge_grace(),
            settle_secs: default_settle(),
            poll_interval_ms: default_poll_interval(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }

    /// Profile used for screenshot capture: larger viewport, shorter
    /// grace/settle delays.
    pub fn screenshot() -> Self {
        Self {
            challenge_grace_secs: 3,
            settle_secs: 1,
            viewport_width: 1920,
            viewport_height: 1080,
            ..Self::extraction()
        }
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn body_timeout(&self) -> Duration {
        Duration::from_secs(self.body_timeout_secs)
    }

    pub fn challenge_timeout(&self) -> Duration {
        Duration::from_secs(self.challenge_timeout_secs)
    }

    pub fn challenge_grace(&self) -> Duration {
        Duration::from_secs(self.challenge_grace_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::extraction()
    }
}

/// Configuration for direct-fetch mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Deadline for the primary document request (fatal on expiry)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Independent deadline for each linked stylesheet request
    #[serde(default = "default_stylesheet_timeout")]
    pub stylesheet_timeout_secs: u64,

    /// Upper bound on linked stylesheets fetched per document
    #[serde(default = "default_max_stylesheets")]
    pub max_stylesheets: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

impl FetchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn stylesheet_timeout(&self) -> Duration {
        Duration::from_secs(self.stylesheet_timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            stylesheet_timeout_secs: default_stylesheet_timeout(),
            max_stylesheets: default_max_stylesheets(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

/// Top-level configuration for the snapshot pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Rendered-mode profile for content/palette extraction
    #[serde(default)]
    pub render: RenderConfig,

    /// Rendered-mode profile for screenshot capture
    #[serde(default = "RenderConfig::screenshot")]
    pub screenshot: RenderConfig,

    /// Direct-fetch mode settings
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::extraction(),
            screenshot: RenderConfig::screenshot(),
            fetch: FetchConfig::default(),
        }
    }
}

impl SnapshotConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_navigation_timeout() -> u64 {
    60
}

fn default_body_timeout() -> u64 {
    30
}

fn default_challenge_timeout() -> u64 {
    45
}

fn default_challenge_grace() -> u64 {
    5
}

fn default_settle() -> u64 {
    2
}

fn default_poll_interval() -> u64 {
    500
}

fn default_viewport_width() -> u32 {
    1366
}

fn default_viewport_height() -> u32 {
    768
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_accept_language() -> String {
    DEFAULT_ACCEPT_LANGUAGE.to_string()
}

fn default_request_timeout() -> u64 {
    20
}

fn default_stylesheet_timeout() -> u64 {
    10
}

fn default_max_stylesheets() -> usize {
    5
}
