use serde::{Deserialize, Serialize};

/// Maximum number of paragraphs kept per document
pub const MAX_PARAGRAPHS: usize = 10;
/// Maximum number of short text spans kept per document
pub const MAX_SPANS: usize = 15;
/// Maximum number of CTA colors in a palette
pub const MAX_CTA_COLORS: usize = 3;
/// Maximum number of general colors in a palette
pub const MAX_GENERAL_COLORS: usize = 8;
/// Maximum number of asset URLs in a palette
pub const MAX_ASSETS: usize = 20;
/// Maximum number of font families in a palette
pub const MAX_FONTS: usize = 3;

/// Named tables driving extraction and filtering.
///
/// All denylists and selector lists live here rather than inline in the
/// components that consume them, so tests and callers can substitute
/// variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRules {
    /// Phrases that mark boilerplate paragraphs (matched case-insensitively)
    #[serde(default = "default_paragraph_denylist")]
    pub paragraph_denylist: Vec<String>,

    /// Phrases shown by bot-challenge interstitials (matched case-insensitively
    /// against page text and title)
    #[serde(default = "default_challenge_phrases")]
    pub challenge_phrases: Vec<String>,

    /// Selectors identifying CTA-like elements for color attribution
    #[serde(default = "default_cta_selectors")]
    pub cta_selectors: Vec<String>,

    /// Selector list for interactive-element (label + link) extraction
    #[serde(default = "default_interactive_selector")]
    pub interactive_selector: String,

    /// Color tokens that never count as palette colors
    #[serde(default = "default_excluded_colors")]
    pub excluded_colors: Vec<String>,

    /// Palette emitted when a page yields no general colors at all
    #[serde(default = "default_fallback_palette")]
    pub fallback_palette: Vec<String>,

    /// Regex patterns marking tracking pixels, favicons and similar noise
    #[serde(default = "default_asset_noise_patterns")]
    pub asset_noise_patterns: Vec<String>,

    /// Path extensions accepted as image assets
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// Font-family keywords that are not real typefaces
    #[serde(default = "default_generic_font_families")]
    pub generic_font_families: Vec<String>,

    /// Tags whose subtrees are excluded from content extraction
    #[serde(default = "default_strip_tags")]
    pub strip_tags: Vec<String>,

    /// Class names whose subtrees are excluded from content extraction
    #[serde(default = "default_strip_classes")]
    pub strip_classes: Vec<String>,

    /// Title used when neither `<title>` nor an `<h1>` is present
    #[serde(default = "default_title_fallback")]
    pub title_fallback: String,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            paragraph_denylist: default_paragraph_denylist(),
            challenge_phrases: default_challenge_phrases(),
            cta_selectors: default_cta_selectors(),
            interactive_selector: default_interactive_selector(),
            excluded_colors: default_excluded_colors(),
            fallback_palette: default_fallback_palette(),
            asset_noise_patterns: default_asset_noise_patterns(),
            image_extensions: default_image_extensions(),
            generic_font_families: default_generic_font_families(),
            strip_tags: default_strip_tags(),
            strip_classes: default_strip_classes(),
            title_fallback: default_title_fallback(),
        }
    }
}

impl ExtractionRules {
    /// Returns true when page text or title still shows a challenge
    /// interstitial phrase.
    pub fn challenge_matches(&self, body_text: &str, title: &str) -> bool {
        let body = body_text.to_lowercase();
        let title = title.to_lowercase();
        self.challenge_phrases.iter().any(|phrase| {
            let phrase = phrase.to_lowercase();
            body.contains(&phrase) || title.contains(&phrase)
        })
    }

    /// Returns true when a trimmed paragraph contains a denylisted phrase.
    pub fn is_boilerplate(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.paragraph_denylist
            .iter()
            .any(|phrase| lower.contains(&phrase.to_lowercase()))
    }

    /// Returns true when a normalized color token is denylisted.
    pub fn is_excluded_color(&self, color: &str) -> bool {
        self.excluded_colors.iter().any(|c| c == color)
    }
}

fn default_paragraph_denylist() -> Vec<String> {
    [
        "copyright",
        "©",
        "all rights reserved",
        "privacy policy",
        "terms of service",
        "cookie policy",
        "follow us",
        "subscribe",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_challenge_phrases() -> Vec<String> {
    [
        "just a moment",
        "checking your browser",
        "attention required",
        "verify you are human",
        "access denied",
        "cloudflare",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_cta_selectors() -> Vec<String> {
    [
        "button",
        "input[type=\"submit\"]",
        "a.btn",
        "a.button",
        ".btn",
        ".button",
        ".cta",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_interactive_selector() -> String {
    "button, a, input[type=\"submit\"], .btn, .button".to_string()
}

fn default_excluded_colors() -> Vec<String> {
    [
        "#fff",
        "#ffffff",
        "#000",
        "#000000",
        "transparent",
        "inherit",
        "initial",
        "currentcolor",
        "unset",
        "none",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_fallback_palette() -> Vec<String> {
    [
        "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_asset_noise_patterns() -> Vec<String> {
    vec![
        r"(?i)favicon".to_string(),
        r"(?i)\bpixel\b".to_string(),
        r"(?i)tracking".to_string(),
        r"(?i)analytics".to_string(),
        r"(?i)beacon".to_string(),
        r"(?i)spacer".to_string(),
        // Explicit dimension tokens like 32x32 or 1x1 in the path
        r"\b\d{1,4}x\d{1,4}\b".to_string(),
    ]
}

fn default_image_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "webp", "svg"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_generic_font_families() -> Vec<String> {
    [
        "inherit",
        "initial",
        "unset",
        "sans-serif",
        "serif",
        "monospace",
        "cursive",
        "fantasy",
        "system-ui",
        "ui-sans-serif",
        "ui-serif",
        "ui-monospace",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_strip_tags() -> Vec<String> {
    ["script", "style", "footer", "header", "aside", "noscript"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_strip_classes() -> Vec<String> {
    ["advertisement", "ads", "cookie-banner"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_title_fallback() -> String {
    "No title found".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_matching_is_case_insensitive() {
        let rules = ExtractionRules::default();

        assert!(rules.challenge_matches("Checking your browser before accessing", ""));
        assert!(rules.challenge_matches("", "Just a Moment..."));
        assert!(rules.challenge_matches("Attention Required! | Cloudflare", ""));
        assert!(!rules.challenge_matches("Welcome to our store", "Acme Widgets"));
    }

    #[test]
    fn test_substituted_mixed_case_phrases_still_match() {
        let rules = ExtractionRules {
            challenge_phrases: vec!["Bot Check".to_string()],
            paragraph_denylist: vec!["Sponsored Content".to_string()],
            ..ExtractionRules::default()
        };

        assert!(rules.challenge_matches("performing a bot check now", ""));
        assert!(rules.challenge_matches("", "BOT CHECK"));
        assert!(rules.is_boilerplate("this is sponsored content from our partners"));
    }

    #[test]
    fn test_boilerplate_detection() {
        let rules = ExtractionRules::default();

        assert!(rules.is_boilerplate("Copyright 2024 Acme Inc. All Rights Reserved."));
        assert!(rules.is_boilerplate("Subscribe to our newsletter for updates and offers"));
        assert!(!rules.is_boilerplate("Our product ships worldwide in two days."));
    }

    #[test]
    fn test_excluded_colors_are_normalized_tokens() {
        let rules = ExtractionRules::default();

        assert!(rules.is_excluded_color("#fff"));
        assert!(rules.is_excluded_color("transparent"));
        assert!(!rules.is_excluded_color("#ff6b35"));
    }
}
