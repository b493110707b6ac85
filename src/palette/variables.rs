use regex::Regex;
use std::collections::HashMap;

/// Custom-property names mapped to their raw declared values.
///
/// Built fresh per aggregation pass; the last declaration for a name wins.
pub type CssVariableTable = HashMap<String, String>;

fn variable_declaration_pattern() -> Regex {
    Regex::new(r"(--[A-Za-z0-9_-]+)\s*:\s*([^;{}]+)").expect("Invalid variable pattern")
}

fn variable_reference_pattern() -> Regex {
    Regex::new(r"var\(\s*(--[A-Za-z0-9_-]+)[^)]*\)").expect("Invalid reference pattern")
}

fn color_declaration_pattern() -> Regex {
    Regex::new(
        r"(?i)\b(?:background-color|background|border-color|outline-color|color|fill|stroke)\s*:\s*([^;{}]+)",
    )
    .expect("Invalid declaration pattern")
}

fn color_literal_pattern() -> Regex {
    Regex::new(r"(?i)#[0-9a-f]{6}\b|#[0-9a-f]{3}\b|rgba?\([^)]*\)|hsla?\([^)]*\)")
        .expect("Invalid color pattern")
}

/// Records every custom-property declaration in `css`.
///
/// Malformed declarations simply produce no entry; this is never an error.
pub fn extract_variables(css: &str) -> CssVariableTable {
    let pattern = variable_declaration_pattern();
    let mut table = CssVariableTable::new();

    for caps in pattern.captures_iter(css) {
        let value = caps[2].trim();
        if value.is_empty() {
            continue;
        }
        table.insert(caps[1].to_string(), value.to_string());
    }

    ::log::debug!("Extracted {} CSS variables", table.len());
    table
}

/// Substitutes `var(--name[, fallback])` references using `table`.
///
/// References to undefined names are left in place verbatim; the fallback
/// argument is not consulted.
pub fn resolve_variable_references(value: &str, table: &CssVariableTable) -> String {
    let pattern = variable_reference_pattern();
    pattern
        .replace_all(value, |caps: &regex::Captures| match table.get(&caps[1]) {
            Some(resolved) => resolved.trim().to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Collects color literals from color-bearing declarations in `css`.
///
/// Declaration values containing variable references are substituted first;
/// values that still contain a reference afterwards are discarded as noise.
/// Tokens are normalized to trimmed lowercase.
pub fn extract_colors(css: &str, table: &CssVariableTable) -> Vec<String> {
    let declarations = color_declaration_pattern();
    let literals = color_literal_pattern();
    let mut colors = Vec::new();

    for caps in declarations.captures_iter(css) {
        let raw = caps[1].trim();
        let resolved = if raw.contains("var(") {
            resolve_variable_references(raw, table)
        } else {
            raw.to_string()
        };

        // Only fully resolved values count
        if resolved.contains("var(") {
            continue;
        }

        for literal in literals.find_iter(&resolved) {
            colors.push(literal.as_str().trim().to_lowercase());
        }
    }

    colors
}
