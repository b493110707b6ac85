use crate::palette::variables::{self, CssVariableTable};
use crate::rules::ExtractionRules;
use regex::Regex;
use scraper::{Html, Selector};

/// Collects colors attributed to call-to-action elements.
///
/// For every element matching a configured CTA selector: colors from its
/// inline style attribute, from rule blocks selecting any of its classes,
/// and from rule blocks selecting its tag name. No cascade resolution is
/// attempted; accumulation is unordered and duplicates are expected, with
/// deduplication applied downstream.
pub fn attribute_cta_colors(doc: &Html, css: &str, rules: &ExtractionRules) -> Vec<String> {
    let table = variables::extract_variables(css);
    let mut colors = Vec::new();

    for selector in &rules.cta_selectors {
        let parsed = match Selector::parse(selector) {
            Ok(parsed) => parsed,
            Err(_) => {
                ::log::warn!("Skipping invalid CTA selector: {}", selector);
                continue;
            }
        };

        for element in doc.select(&parsed) {
            if let Some(style) = element.value().attr("style") {
                colors.extend(variables::extract_colors(style, &table));
            }

            for class in element.value().classes() {
                colors.extend(class_rule_colors(css, class, &table));
            }

            colors.extend(tag_rule_colors(css, element.value().name(), &table));
        }
    }

    colors
}

/// Colors from rule blocks whose selector is the given class.
fn class_rule_colors(css: &str, class: &str, table: &CssVariableTable) -> Vec<String> {
    let pattern = format!(r"\.{}[^{{}}]*\{{([^}}]*)\}}", regex::escape(class));
    rule_block_colors(css, &pattern, table)
}

/// Colors from rule blocks whose selector is the given tag name.
///
/// The tag must be followed by a non-identifier character so that `a`
/// never picks up `article` or `aside` rule blocks.
fn tag_rule_colors(css: &str, tag: &str, table: &CssVariableTable) -> Vec<String> {
    let pattern = format!(
        r"(?:^|[\s,}}]){}(?:[\s.:#\[,>][^{{}}]*)?\{{([^}}]*)\}}",
        regex::escape(tag)
    );
    rule_block_colors(css, &pattern, table)
}

fn rule_block_colors(css: &str, pattern: &str, table: &CssVariableTable) -> Vec<String> {
    match Regex::new(pattern) {
        Ok(regex) => regex
            .captures_iter(css)
            .flat_map(|caps| variables::extract_colors(&caps[1], table))
            .collect(),
        Err(e) => {
            ::log::warn!("Failed to compile rule-block pattern: {}", e);
            Vec::new()
        }
    }
}
