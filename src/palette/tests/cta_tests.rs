use crate::palette::cta::attribute_cta_colors;
use crate::rules::ExtractionRules;
use scraper::Html;

fn rules() -> ExtractionRules {
    ExtractionRules::default()
}

#[test]
fn test_inline_style_colors_attributed() {
    let doc = Html::parse_document(
        r#"<html><body><button style="background-color: #FF6B35">Buy now</button></body></html>"#,
    );

    let colors = attribute_cta_colors(&doc, "", &rules());
    assert!(colors.contains(&"#ff6b35".to_string()));
}

#[test]
fn test_class_rule_colors_attributed() {
    let doc =
        Html::parse_document(r#"<html><body><a class="btn">Get started</a></body></html>"#);
    let css = ".btn { background: #112233; padding: 4px; }";

    let colors = attribute_cta_colors(&doc, css, &rules());
    assert!(colors.contains(&"#112233".to_string()));
}

#[test]
fn test_tag_rule_colors_attributed() {
    let doc = Html::parse_document(r#"<html><body><button>Go</button></body></html>"#);
    let css = "button { color: #445566; }\n.other { color: #778899; }";

    let colors = attribute_cta_colors(&doc, css, &rules());
    assert!(colors.contains(&"#445566".to_string()));
    assert!(!colors.contains(&"#778899".to_string()));
}

#[test]
fn test_tag_rules_not_matched_by_prefix() {
    let doc = Html::parse_document(r#"<html><body><a class="btn">Read more</a></body></html>"#);
    let css = "article { color: #999888; }\naside { color: #887766; }\na { color: #445566; }";

    let colors = attribute_cta_colors(&doc, css, &rules());
    assert!(colors.contains(&"#445566".to_string()));
    assert!(!colors.contains(&"#999888".to_string()));
    assert!(!colors.contains(&"#887766".to_string()));
}

#[test]
fn test_class_rules_resolve_variables() {
    let doc = Html::parse_document(r#"<html><body><a class="cta">Try it</a></body></html>"#);
    let css = ":root { --brand: #0a0b0c; } .cta { background-color: var(--brand); }";

    let colors = attribute_cta_colors(&doc, css, &rules());
    assert!(colors.contains(&"#0a0b0c".to_string()));
}

#[test]
fn test_regex_metacharacters_in_class_names_are_escaped() {
    let doc = Html::parse_document(
        r#"<html><body><button class="promo[1] x+y">Deal</button></body></html>"#,
    );
    let css = "button { color: #445566; }";

    // Must not panic on the unescapable-looking class names
    let colors = attribute_cta_colors(&doc, css, &rules());
    assert!(colors.contains(&"#445566".to_string()));
}

#[test]
fn test_non_cta_elements_not_attributed() {
    let doc = Html::parse_document(
        r#"<html><body><p style="color: #123123">Just a paragraph</p></body></html>"#,
    );

    let colors = attribute_cta_colors(&doc, "", &rules());
    assert!(colors.is_empty());
}
