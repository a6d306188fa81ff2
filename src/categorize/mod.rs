use crate::models::{Classification, Rule};

/// Snapshot of the rule set in evaluation order. Built once per
/// classification pass so every lookup in that pass sees the same rules.
pub(crate) struct Categorizer {
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    id: i64,
    keyword: String,
    category: String,
    priority: i64,
}

impl Categorizer {
    pub(crate) fn new(rules: &[Rule]) -> Self {
        let mut compiled: Vec<CompiledRule> = rules
            .iter()
            .filter(|r| !r.keyword.trim().is_empty())
            .map(|r| CompiledRule {
                id: r.id.unwrap_or(i64::MAX),
                keyword: r.keyword.trim().to_lowercase(),
                category: r.category.clone(),
                priority: r.priority,
            })
            .collect();

        // Stable sort keeps unsaved rules in slice order.
        compiled.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));

        Self { rules: compiled }
    }

    /// First rule (by priority desc, id asc) whose keyword occurs in `text`.
    pub(crate) fn classify(&self, text: &str) -> Classification {
        let lower = text.to_lowercase();
        if lower.trim().is_empty() {
            return Classification::Uncategorized;
        }

        self.rules
            .iter()
            .find(|rule| lower.contains(&rule.keyword))
            .map(|rule| Classification::Rule {
                rule_id: rule.id,
                category: rule.category.clone(),
            })
            .unwrap_or(Classification::Uncategorized)
    }

    pub(crate) fn len(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests;
