use crate::results::{ExtractedDocument, HeadingMap, InteractiveElement};
use crate::rules::{ExtractionRules, MAX_PARAGRAPHS, MAX_SPANS};
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};

/// Extracts structured text content from a page.
pub fn extract_document(html: &str, url: &str, rules: &ExtractionRules) -> ExtractedDocument {
    let doc = Html::parse_document(html);

    let document = ExtractedDocument {
        url: url.to_string(),
        title: resolve_title(&doc, rules),
        meta_description: resolve_meta_description(&doc),
        headings: collect_headings(&doc, rules),
        paragraphs: collect_paragraphs(&doc, rules),
        spans: collect_spans(&doc, rules),
        buttons: collect_interactive(&doc, rules),
        features: collect_features(&doc, rules),
        extracted_at: Utc::now(),
    };

    ::log::debug!(
        "Extracted {} paragraphs, {} buttons, {} features from {}",
        document.paragraphs.len(),
        document.buttons.len(),
        document.features.len(),
        url
    );

    document
}

/// Whitespace-normalized text of an element's subtree.
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn element_is_chrome(element: &scraper::node::Element, rules: &ExtractionRules) -> bool {
    if rules.strip_tags.iter().any(|tag| tag == element.name()) {
        return true;
    }
    element
        .classes()
        .any(|class| rules.strip_classes.iter().any(|marker| marker == class))
}

/// True when the element sits inside page chrome (scripts, headers,
/// footers, ad and cookie-banner containers) excluded from extraction.
fn in_stripped_region(element: ElementRef, rules: &ExtractionRules) -> bool {
    if element_is_chrome(element.value(), rules) {
        return true;
    }
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| element_is_chrome(ancestor.value(), rules))
}

/// Document title, falling back to the first h1 and then a fixed literal.
pub fn resolve_title(doc: &Html, rules: &ExtractionRules) -> String {
    let title_selector = Selector::parse("title").unwrap();
    if let Some(element) = doc.select(&title_selector).next() {
        let title = element_text(element);
        if !title.is_empty() {
            return title;
        }
    }

    let h1_selector = Selector::parse("h1").unwrap();
    for element in doc.select(&h1_selector) {
        if in_stripped_region(element, rules) {
            continue;
        }
        let title = element_text(element);
        if !title.is_empty() {
            return title;
        }
    }

    rules.title_fallback.clone()
}

/// Meta description, preferring `name=description` over `og:description`.
pub fn resolve_meta_description(doc: &Html) -> String {
    let named = Selector::parse(r#"meta[name="description"]"#).unwrap();
    let open_graph = Selector::parse(r#"meta[property="og:description"]"#).unwrap();

    doc.select(&named)
        .filter_map(|element| element.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .or_else(|| {
            doc.select(&open_graph)
                .filter_map(|element| element.value().attr("content"))
                .map(str::trim)
                .find(|content| !content.is_empty())
        })
        .unwrap_or("")
        .to_string()
}

fn collect_headings(doc: &Html, rules: &ExtractionRules) -> HeadingMap {
    let mut headings = HeadingMap::default();
    let sinks: [(&str, &mut Vec<String>); 6] = [
        ("h1", &mut headings.h1),
        ("h2", &mut headings.h2),
        ("h3", &mut headings.h3),
        ("h4", &mut headings.h4),
        ("h5", &mut headings.h5),
        ("h6", &mut headings.h6),
    ];

    for (tag, sink) in sinks {
        let selector = Selector::parse(tag).unwrap();
        for element in doc.select(&selector) {
            if in_stripped_region(element, rules) {
                continue;
            }
            let text = element_text(element);
            if !text.is_empty() {
                sink.push(text);
            }
        }
    }

    headings
}

/// Whether a trimmed paragraph passes the length, alphabetic-ratio and
/// denylist heuristics.
pub fn paragraph_passes(text: &str, rules: &ExtractionRules) -> bool {
    let length = text.chars().count();
    if !(30..=500).contains(&length) {
        return false;
    }

    let alphabetic = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    if (alphabetic as f64) / (length as f64) < 0.5 {
        return false;
    }

    !rules.is_boilerplate(text)
}

fn collect_paragraphs(doc: &Html, rules: &ExtractionRules) -> Vec<String> {
    let selector = Selector::parse("p").unwrap();
    doc.select(&selector)
        .filter(|element| !in_stripped_region(*element, rules))
        .map(element_text)
        .filter(|text| paragraph_passes(text, rules))
        .take(MAX_PARAGRAPHS)
        .collect()
}

fn collect_spans(doc: &Html, rules: &ExtractionRules) -> Vec<String> {
    let selector = Selector::parse("span").unwrap();
    doc.select(&selector)
        .filter(|element| !in_stripped_region(*element, rules))
        .map(element_text)
        .filter(|text| text.chars().count() > 10)
        .take(MAX_SPANS)
        .collect()
}

fn collect_interactive(doc: &Html, rules: &ExtractionRules) -> Vec<InteractiveElement> {
    let selector = match Selector::parse(&rules.interactive_selector) {
        Ok(selector) => selector,
        Err(_) => {
            ::log::warn!(
                "Skipping invalid interactive selector: {}",
                rules.interactive_selector
            );
            return Vec::new();
        }
    };
    doc.select(&selector)
        .filter(|element| !in_stripped_region(*element, rules))
        .filter_map(|element| {
            let text = element_text(element);
            if text.is_empty() {
                return None;
            }
            let href = element.value().attr("href").map(|href| href.to_string());
            Some(InteractiveElement { text, href })
        })
        .collect()
}

fn collect_features(doc: &Html, rules: &ExtractionRules) -> Vec<String> {
    // List items are kept unfiltered: feature and pricing lists are dense
    // and short, unlike body paragraphs
    let selector = Selector::parse("ul li, ol li").unwrap();
    doc.select(&selector)
        .filter(|element| !in_stripped_region(*element, rules))
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}
