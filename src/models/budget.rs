use super::period::Month;

/// Spending ceiling for one category in one month. At most one per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Budget {
    pub(crate) month: Month,
    pub(crate) category: String,
    pub(crate) limit_cents: i64,
}
