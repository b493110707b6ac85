use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Heading texts grouped by level, in document order within each level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadingMap {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

/// A button or link with its visible label and optional target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractiveElement {
    /// Visible label text (never empty)
    pub text: String,

    /// Link target, when the element carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Structured text content extracted from a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// URL the content was extracted from
    pub url: String,

    /// Document title (with h1 and literal fallbacks applied)
    pub title: String,

    /// Meta description (name=description, else og:description, else empty)
    pub meta_description: String,

    /// Headings by level
    pub headings: HeadingMap,

    /// Filtered body paragraphs, document order, capped
    pub paragraphs: Vec<String>,

    /// Short inline text spans, document order, capped
    pub spans: Vec<String>,

    /// Buttons and links with non-empty labels
    pub buttons: Vec<InteractiveElement>,

    /// List-item texts (feature/pricing style lists), unfiltered
    pub features: Vec<String>,

    /// Capture timestamp
    pub extracted_at: DateTime<Utc>,
}

/// Source identity attached to a palette result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub url: String,
}

/// Visual identity extracted from a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteResult {
    /// Ranked palette, CTA colors first, capped at the general-color limit
    pub colors: Vec<String>,

    /// Colors attributed to call-to-action elements
    pub cta_colors: Vec<String>,

    /// General page colors, disjoint from `cta_colors`; the fixed fallback
    /// palette when nothing was extractable
    pub general_colors: Vec<String>,

    /// Deduplicated image asset URLs
    pub assets: Vec<String>,

    /// Distinct font-family names
    pub fonts: Vec<String>,

    /// Source page identity
    pub metadata: PageMetadata,
}

/// Base64-encoded capture of a fully rendered page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotResult {
    pub success: bool,

    /// `data:image/png;base64,...` payload
    pub screenshot: String,

    pub url: String,

    pub timestamp: DateTime<Utc>,
}
