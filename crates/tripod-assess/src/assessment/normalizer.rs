/// Canonical form of a free-text person name, used as the identity key for managers and the
/// people they report to. Trims, collapses whitespace runs, and title-cases each token.
pub fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Absent names normalize to the empty string.
pub fn normalize_optional(value: Option<&str>) -> String {
    value.map(normalize_name).unwrap_or_default()
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut cased = String::with_capacity(token.len());
    cased.push(single_char(first.to_uppercase()).unwrap_or(first));
    for ch in chars {
        cased.push(single_char(ch.to_lowercase()).unwrap_or(ch));
    }
    cased
}

// Multi-char case mappings (e.g. 'ß' -> "SS") are left alone so normalization stays idempotent.
fn single_char(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    let first = mapped.next()?;
    mapped.next().is_none().then_some(first)
}
