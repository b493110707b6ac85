pub mod cta;
pub mod variables;

#[cfg(test)]
mod tests;

use crate::assets::{self, AssetFilter};
use crate::fetchers::CssSource;
use crate::parsers::content;
use crate::results::{PageMetadata, PaletteResult};
use crate::rules::{ExtractionRules, MAX_CTA_COLORS, MAX_FONTS, MAX_GENERAL_COLORS};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Removes duplicates while preserving first-occurrence order.
pub fn dedupe(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Gathers the CSS text embedded in a document: `<style>` contents followed
/// by inline style attributes.
pub fn embedded_css(doc: &Html) -> String {
    let style_selector = Selector::parse("style").unwrap();
    let inline_selector = Selector::parse("[style]").unwrap();
    let mut css = String::new();

    for element in doc.select(&style_selector) {
        css.push_str(&element.text().collect::<String>());
        css.push('\n');
    }

    for element in doc.select(&inline_selector) {
        if let Some(style) = element.value().attr("style") {
            css.push_str(style);
            css.push_str(";\n");
        }
    }

    css
}

/// Two-pass color resolution.
///
/// Pass 1 sees embedded CSS only; pass 2 rebuilds the variable table over
/// the full aggregate (embedded plus external stylesheets) and re-extracts,
/// superseding pass 1. Variables defined in an external sheet thereby become
/// available to color declarations anywhere in the aggregate.
pub fn resolve_color_passes(embedded: &str, sheets: &[&str]) -> (Vec<String>, Vec<String>) {
    let table = variables::extract_variables(embedded);
    let pass1 = variables::extract_colors(embedded, &table);

    let aggregated = aggregate_css(embedded, sheets);
    let table = variables::extract_variables(&aggregated);
    let pass2 = variables::extract_colors(&aggregated, &table);

    (pass1, pass2)
}

fn aggregate_css(embedded: &str, sheets: &[&str]) -> String {
    let mut aggregated = String::from(embedded);
    for sheet in sheets {
        aggregated.push('\n');
        aggregated.push_str(sheet);
    }
    aggregated
}

/// Distinct font-family names declared in `css`, first family per
/// declaration, quotes stripped, generic families skipped.
pub fn extract_fonts(css: &str, rules: &ExtractionRules) -> Vec<String> {
    let pattern = Regex::new(r"(?i)font-family\s*:\s*([^;{}]+)").expect("Invalid font pattern");
    let mut fonts = Vec::new();

    for caps in pattern.captures_iter(css) {
        let value = caps[1].trim();
        if value.contains("var(") {
            continue;
        }

        let first = value
            .split(',')
            .next()
            .unwrap_or("")
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .trim();
        if first.is_empty() {
            continue;
        }
        if rules
            .generic_font_families
            .iter()
            .any(|generic| generic.eq_ignore_ascii_case(first))
        {
            continue;
        }

        fonts.push(first.to_string());
    }

    dedupe(fonts).into_iter().take(MAX_FONTS).collect()
}

/// Builds the full visual-identity result for a harvested page.
pub fn build_palette(
    html: &str,
    page_url: &Url,
    stylesheets: &[CssSource],
    rules: &ExtractionRules,
) -> PaletteResult {
    let doc = Html::parse_document(html);
    let embedded = embedded_css(&doc);
    let sheet_texts: Vec<&str> = stylesheets.iter().map(|s| s.text.as_str()).collect();

    let (pass1, pass2) = resolve_color_passes(&embedded, &sheet_texts);
    ::log::debug!(
        "Color passes for {}: {} before external stylesheets, {} after",
        page_url,
        pass1.len(),
        pass2.len()
    );

    let aggregated = aggregate_css(&embedded, &sheet_texts);

    let cta_colors: Vec<String> = dedupe(cta::attribute_cta_colors(&doc, &aggregated, rules))
        .into_iter()
        .filter(|color| !rules.is_excluded_color(color))
        .take(MAX_CTA_COLORS)
        .collect();

    let mut general_colors: Vec<String> = dedupe(pass2)
        .into_iter()
        .filter(|color| !rules.is_excluded_color(color) && !cta_colors.contains(color))
        .take(MAX_GENERAL_COLORS)
        .collect();
    if general_colors.is_empty() {
        ::log::debug!("No general colors extracted for {}, using fallback palette", page_url);
        general_colors = rules.fallback_palette.clone();
    }

    let colors: Vec<String> = dedupe(cta_colors.iter().chain(general_colors.iter()).cloned())
        .into_iter()
        .take(MAX_GENERAL_COLORS)
        .collect();

    let asset_filter = AssetFilter::new(rules);
    let collected = assets::collect_assets(&doc, page_url, stylesheets, &asset_filter);

    let fonts = extract_fonts(&aggregated, rules);

    PaletteResult {
        colors,
        cta_colors,
        general_colors,
        assets: collected,
        fonts,
        metadata: PageMetadata {
            title: content::resolve_title(&doc, rules),
            description: content::resolve_meta_description(&doc),
            url: page_url.to_string(),
        },
    }
}
