use crate::error::{LedgerError, LedgerResult};

/// Parse a decimal string such as `12`, `12.3` or `12.34` into cents.
///
/// Extra fractional digits are truncated, never rounded. Signs are not
/// accepted here; callers that allow them strip the sign first.
pub(crate) fn to_minor_units(text: &str) -> LedgerResult<i64> {
    let s = text.trim();
    let invalid = || LedgerError::InvalidAmount(text.to_string());

    if s.is_empty() || s.matches('.').count() > 1 {
        return Err(invalid());
    }

    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() || !is_all_digits(whole) || !is_all_digits(frac) {
        return Err(invalid());
    }

    let cents = match frac.len() {
        0 => 0,
        1 => i64::from(frac.as_bytes()[0] - b'0') * 10,
        _ => frac[..2].parse::<i64>().map_err(|_| invalid())?,
    };

    whole
        .parse::<i64>()
        .ok()
        .and_then(|d| d.checked_mul(100))
        .and_then(|d| d.checked_add(cents))
        .ok_or_else(invalid)
}

/// Render cents as a signed decimal with exactly two fractional digits.
pub(crate) fn from_minor_units(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let magnitude = cents.unsigned_abs();
    format!("{sign}{}.{:02}", magnitude / 100, magnitude % 100)
}

fn is_all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
