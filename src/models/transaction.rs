use chrono::NaiveDate;

use super::category::require_category;
use crate::error::LedgerResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transaction {
    pub(crate) id: Option<i64>,
    pub(crate) date: NaiveDate,
    /// Signed amount in cents.
    pub(crate) amount_cents: i64,
    pub(crate) category: String,
    pub(crate) note: Option<String>,
}

impl Transaction {
    /// Build an unsaved transaction. The category is normalized and must be
    /// non-empty; a blank note is treated as absent.
    pub(crate) fn new(
        date: NaiveDate,
        amount_cents: i64,
        category: &str,
        note: Option<&str>,
    ) -> LedgerResult<Self> {
        Ok(Self {
            id: None,
            date,
            amount_cents,
            category: require_category(category)?,
            note: note
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        })
    }

    pub(crate) fn note_or_empty(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }
}
