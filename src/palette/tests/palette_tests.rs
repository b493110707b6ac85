use crate::fetchers::CssSource;
use crate::palette::{build_palette, embedded_css, extract_fonts, resolve_color_passes};
use crate::rules::ExtractionRules;
use scraper::Html;
use url::Url;

fn rules() -> ExtractionRules {
    ExtractionRules::default()
}

fn page_url() -> Url {
    Url::parse("https://site.com/").unwrap()
}

#[test]
fn test_embedded_css_gathers_style_tags_and_inline_styles() {
    let doc = Html::parse_document(
        r#"<html><head><style>.a { color: #111213; }</style></head>
           <body><div style="background: #212223"></div></body></html>"#,
    );

    let css = embedded_css(&doc);
    assert!(css.contains(".a { color: #111213; }"));
    assert!(css.contains("background: #212223"));
}

#[test]
fn test_second_pass_sees_variables_from_external_sheets() {
    let embedded = ".hero { color: var(--brand); }";
    let sheet = ":root { --brand: #ff0000; }";

    let (pass1, pass2) = resolve_color_passes(embedded, &[sheet]);

    assert!(!pass1.contains(&"#ff0000".to_string()));
    assert!(pass2.contains(&"#ff0000".to_string()));
}

#[test]
fn test_fonts_capped_with_generics_and_quotes_handled() {
    let css = r#"
        body { font-family: "Inter", sans-serif; }
        h1 { font-family: 'Playfair Display', serif; }
        code { font-family: monospace; }
        .a { font-family: Roboto, sans-serif; }
        .b { font-family: "Inter", sans-serif; }
        .c { font-family: Lato, sans-serif; }
    "#;

    let fonts = extract_fonts(css, &rules());
    assert_eq!(fonts, vec!["Inter", "Playfair Display", "Roboto"]);
}

#[test]
fn test_cta_and_general_colors_are_disjoint() {
    let html = r#"<html><head><style>
            .btn { background: #ff6b35; }
            p { color: #123456; }
            h1 { color: #654321; }
        </style></head>
        <body><a class="btn">Buy</a><p>text</p></body></html>"#;

    let palette = build_palette(html, &page_url(), &[], &rules());

    assert!(palette.cta_colors.contains(&"#ff6b35".to_string()));
    assert!(palette.general_colors.contains(&"#123456".to_string()));
    for color in &palette.cta_colors {
        assert!(!palette.general_colors.contains(color));
    }
    // Ranked list is CTA-first
    assert_eq!(palette.colors[0], "#ff6b35");
}

#[test]
fn test_fallback_palette_emitted_only_when_empty() {
    let html = "<html><head><title>Bare</title></head><body><p>text</p></body></html>";
    let rules = rules();

    let palette = build_palette(html, &page_url(), &[], &rules);

    assert_eq!(palette.general_colors, rules.fallback_palette);
    assert!(palette.cta_colors.is_empty());

    // A page with real colors never mixes in the fallback
    let html = r#"<html><head><style>p { color: #123456; }</style></head>
        <body><p>text</p></body></html>"#;
    let palette = build_palette(html, &page_url(), &[], &rules);
    assert_eq!(palette.general_colors, vec!["#123456"]);
}

#[test]
fn test_excluded_colors_never_appear() {
    let html = r#"<html><head><style>
            p { color: #fff; background: #123456; }
        </style></head><body><p>text</p></body></html>"#;

    let palette = build_palette(html, &page_url(), &[], &rules());

    assert!(!palette.general_colors.contains(&"#fff".to_string()));
    assert!(palette.general_colors.contains(&"#123456".to_string()));
}

#[test]
fn test_general_colors_capped_at_eight() {
    let css: String = (0..12)
        .map(|i| format!(".c{} {{ color: #10203{:x}; }}\n", i, i))
        .collect();
    let html = format!(
        "<html><head><style>{}</style></head><body></body></html>",
        css
    );

    let palette = build_palette(&html, &page_url(), &[], &rules());
    assert_eq!(palette.general_colors.len(), 8);
}

#[test]
fn test_invalid_noise_pattern_does_not_abort_palette() {
    let mut rules = rules();
    rules.asset_noise_patterns.push("(".to_string());
    let html = r#"<html><body><img src="/hero.jpg"></body></html>"#;

    let palette = build_palette(html, &page_url(), &[], &rules);
    assert_eq!(palette.assets, vec!["https://site.com/hero.jpg"]);
}

#[test]
fn test_palette_uses_stylesheet_colors_and_metadata() {
    let html = r#"<html><head>
            <title>Acme</title>
            <meta name="description" content="Widgets for all">
        </head><body></body></html>"#;
    let sheets = vec![CssSource {
        url: Url::parse("https://cdn.example.com/a.css").unwrap(),
        text: ":root { --main: #abcdef; } body { color: var(--main); }".to_string(),
    }];

    let palette = build_palette(html, &page_url(), &sheets, &rules());

    assert!(palette.general_colors.contains(&"#abcdef".to_string()));
    assert_eq!(palette.metadata.title, "Acme");
    assert_eq!(palette.metadata.description, "Widgets for all");
    assert_eq!(palette.metadata.url, "https://site.com/");
}
