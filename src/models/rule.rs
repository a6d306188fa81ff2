use super::category::normalize_category;

/// Keyword classification rule. Higher priority wins; ties go to the
/// earlier rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rule {
    pub(crate) id: Option<i64>,
    pub(crate) keyword: String,
    pub(crate) category: String,
    pub(crate) priority: i64,
}

impl Rule {
    pub(crate) fn new(keyword: &str, category: &str, priority: i64) -> Self {
        Self {
            id: None,
            keyword: normalize_category(keyword),
            category: normalize_category(category),
            priority,
        }
    }
}
