use crate::error::{LedgerError, LedgerResult};

pub(crate) const UNCATEGORIZED: &str = "uncategorized";

/// Trim surrounding whitespace and lower-case.
pub(crate) fn normalize_category(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Normalize and reject categories that end up empty.
pub(crate) fn require_category(s: &str) -> LedgerResult<String> {
    let category = normalize_category(s);
    if category.is_empty() {
        return Err(LedgerError::InvalidCategory);
    }
    Ok(category)
}

/// Outcome of running free text through the rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Classification {
    Rule { rule_id: i64, category: String },
    Uncategorized,
}

impl Classification {
    pub(crate) fn category(&self) -> &str {
        match self {
            Self::Rule { category, .. } => category,
            Self::Uncategorized => UNCATEGORIZED,
        }
    }

    pub(crate) fn is_match(&self) -> bool {
        matches!(self, Self::Rule { .. })
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.category())
    }
}
