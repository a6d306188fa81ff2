use crate::models::from_minor_units;

/// Format cents with thousand separators, e.g. `-123456789` → `"-$1,234,567.89"`.
pub(crate) fn format_money(cents: i64) -> String {
    let plain = from_minor_units(cents);
    let unsigned = plain.trim_start_matches('-');
    let (int_part, dec_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if cents < 0 {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
