use crate::fetchers::CssSource;
use crate::palette::dedupe;
use crate::rules::{ExtractionRules, MAX_ASSETS};
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// Rejects tracking pixels, favicons and non-raster noise from collected
/// asset URLs. Patterns are compiled once from the rules tables.
#[derive(Debug)]
pub struct AssetFilter {
    noise: Vec<Regex>,
    extensions: Vec<String>,
}

impl AssetFilter {
    /// Compiles the noise patterns from the rules tables. A pattern that
    /// fails to compile is logged and skipped; the rest of the table still
    /// applies.
    pub fn new(rules: &ExtractionRules) -> Self {
        let mut noise = Vec::with_capacity(rules.asset_noise_patterns.len());
        for pattern in &rules.asset_noise_patterns {
            match Regex::new(pattern) {
                Ok(re) => noise.push(re),
                Err(e) => {
                    ::log::warn!("Skipping invalid asset noise pattern {:?}: {}", pattern, e)
                }
            }
        }

        Self {
            noise,
            extensions: rules.image_extensions.clone(),
        }
    }

    /// Whether a normalized URL should appear in asset output.
    ///
    /// `data:` URIs are inline rather than fetchable and never pass. Noise
    /// patterns are applied to the URL without its query string; the
    /// extension check looks at the path only.
    pub fn should_keep(&self, url_str: &str) -> bool {
        if url_str.starts_with("data:") {
            return false;
        }

        let parsed = match Url::parse(url_str) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        let without_query = format!(
            "{}://{}{}",
            parsed.scheme(),
            parsed.host_str().unwrap_or(""),
            parsed.path()
        );
        if self.noise.iter().any(|re| re.is_match(&without_query)) {
            return false;
        }

        let path = parsed.path().to_lowercase();
        self.extensions
            .iter()
            .any(|ext| path.ends_with(&format!(".{}", ext)))
    }
}

/// Resolves a raw asset reference against its base URL.
///
/// Protocol-relative URLs become https, absolute URLs and `data:` URIs pass
/// through unchanged, and everything else is joined against `base`.
pub fn normalize_asset_url(raw: &str, base: &Url) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.starts_with("//") {
        return Some(format!("https:{}", raw));
    }
    if raw.starts_with("data:") {
        return Some(raw.to_string());
    }

    match Url::parse(raw) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            base.join(raw).ok().map(|joined| joined.to_string())
        }
        Err(_) => None,
    }
}

fn background_url_pattern() -> Regex {
    Regex::new(r#"(?i)background(?:-image)?\s*:[^;{}]*?url\(\s*['"]?([^'")\s]+)['"]?\s*\)"#)
        .expect("Invalid background pattern")
}

/// Gathers image assets from `<img>` tags, inline background declarations
/// and stylesheet background declarations.
///
/// HTML-embedded references resolve against the document URL; references
/// inside an external stylesheet resolve against that stylesheet's own URL.
pub fn collect_assets(
    doc: &Html,
    page_url: &Url,
    stylesheets: &[CssSource],
    filter: &AssetFilter,
) -> Vec<String> {
    let img_selector = Selector::parse("img").unwrap();
    let inline_selector = Selector::parse("[style]").unwrap();
    let style_selector = Selector::parse("style").unwrap();
    let background = background_url_pattern();
    let mut assets = Vec::new();

    for element in doc.select(&img_selector) {
        if let Some(src) = element.value().attr("src") {
            assets.extend(normalize_asset_url(src, page_url));
        }
    }

    for element in doc.select(&inline_selector) {
        if let Some(style) = element.value().attr("style") {
            for caps in background.captures_iter(style) {
                assets.extend(normalize_asset_url(&caps[1], page_url));
            }
        }
    }

    for element in doc.select(&style_selector) {
        let css = element.text().collect::<String>();
        for caps in background.captures_iter(&css) {
            assets.extend(normalize_asset_url(&caps[1], page_url));
        }
    }

    for sheet in stylesheets {
        for caps in background.captures_iter(&sheet.text) {
            assets.extend(normalize_asset_url(&caps[1], &sheet.url));
        }
    }

    dedupe(assets)
        .into_iter()
        .filter(|url| filter.should_keep(url))
        .take(MAX_ASSETS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://site.com/page").unwrap()
    }

    #[test]
    fn test_protocol_relative_normalization() {
        let result = normalize_asset_url("//cdn.x.com/img.png", &base());
        assert_eq!(result.as_deref(), Some("https://cdn.x.com/img.png"));
    }

    #[test]
    fn test_root_relative_normalization() {
        let result = normalize_asset_url("/img.png", &base());
        assert_eq!(result.as_deref(), Some("https://site.com/img.png"));
    }

    #[test]
    fn test_relative_path_resolves_against_stylesheet_base() {
        let sheet_base = Url::parse("https://cdn.example.com/a.css").unwrap();
        let result = normalize_asset_url("images/bg.png", &sheet_base);
        assert_eq!(
            result.as_deref(),
            Some("https://cdn.example.com/images/bg.png")
        );
    }

    #[test]
    fn test_data_uri_passes_normalization_but_not_filter() {
        let data = "data:image/png;base64,iVBORw0KGgo=";
        let normalized = normalize_asset_url(data, &base()).unwrap();
        assert_eq!(normalized, data);

        let filter = AssetFilter::new(&ExtractionRules::default());
        assert!(!filter.should_keep(&normalized));
    }

    #[test]
    fn test_filter_rejects_noise_and_non_images() {
        let filter = AssetFilter::new(&ExtractionRules::default());

        assert!(!filter.should_keep("https://site.com/favicon.ico"));
        assert!(!filter.should_keep("https://site.com/favicon-32x32.png"));
        assert!(!filter.should_keep("https://tracking.example.com/img.png"));
        assert!(!filter.should_keep("https://site.com/icons/sprite-16x16.svg"));
        assert!(!filter.should_keep("https://site.com/app.js"));
        assert!(!filter.should_keep("https://site.com/photo.tiff"));

        assert!(filter.should_keep("https://site.com/hero.jpg"));
        assert!(filter.should_keep("https://site.com/hero.webp?v=3"));
        assert!(filter.should_keep("https://cdn.x.com/logo.svg"));
    }

    #[test]
    fn test_invalid_noise_pattern_skipped_rest_of_table_applies() {
        let mut rules = ExtractionRules::default();
        rules.asset_noise_patterns.push("(".to_string());

        let filter = AssetFilter::new(&rules);

        assert!(!filter.should_keep("https://site.com/favicon.ico"));
        assert!(filter.should_keep("https://site.com/hero.jpg"));
    }

    #[test]
    fn test_collect_assets_deduplicates_and_uses_per_source_bases() {
        let html = r#"
            <html><head>
              <style>.hero { background-image: url('/banner.png'); }</style>
            </head><body>
              <img src="/banner.png">
              <img src="//cdn.x.com/img.png">
              <div style="background: url(photos/team.jpg)"></div>
              <img src="data:image/png;base64,AAAA">
            </body></html>
        "#;
        let doc = Html::parse_document(html);
        let page_url = base();
        let sheets = vec![CssSource {
            url: Url::parse("https://cdn.example.com/a.css").unwrap(),
            text: ".x { background-image: url(bg/tile.webp); }".to_string(),
        }];
        let filter = AssetFilter::new(&ExtractionRules::default());

        let assets = collect_assets(&doc, &page_url, &sheets, &filter);

        assert_eq!(
            assets,
            vec![
                "https://site.com/banner.png".to_string(),
                "https://cdn.x.com/img.png".to_string(),
                "https://site.com/photos/team.jpg".to_string(),
                "https://cdn.example.com/bg/tile.webp".to_string(),
            ]
        );
    }
}
