use std::collections::HashMap;

/// Raw aggregation for a period as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Totals {
    pub(crate) grand_total: i64,
    /// `(category, cents)`, largest total first.
    pub(crate) by_category: Vec<(String, i64)>,
    /// `(category, limit_cents)` in budget store order; empty without a month.
    pub(crate) budgets: Vec<(String, i64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BudgetStatus {
    Ok,
    Over,
}

impl BudgetStatus {
    pub(crate) fn from_remaining(remaining: i64) -> Self {
        if remaining >= 0 {
            Self::Ok
        } else {
            Self::Over
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Over => "OVER",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BudgetCheck {
    pub(crate) category: String,
    pub(crate) limit: i64,
    pub(crate) spent: i64,
    pub(crate) remaining: i64,
    pub(crate) status: BudgetStatus,
}

/// Budget-vs-actual view derived from [`Totals`]. Both lists follow the
/// order in which the budget store returned the budgets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BudgetReport {
    pub(crate) checks: Vec<BudgetCheck>,
    /// Budgeted categories with no spending yet.
    pub(crate) unspent: Vec<(String, i64)>,
}

impl BudgetReport {
    pub(crate) fn build(totals: &Totals) -> Self {
        let spent_by_category: HashMap<&str, i64> = totals
            .by_category
            .iter()
            .map(|(c, cents)| (c.as_str(), *cents))
            .collect();

        let mut report = Self::default();
        for (category, limit) in &totals.budgets {
            match spent_by_category.get(category.as_str()) {
                Some(&spent) => {
                    let remaining = limit.saturating_sub(spent);
                    report.checks.push(BudgetCheck {
                        category: category.clone(),
                        limit: *limit,
                        spent,
                        remaining,
                        status: BudgetStatus::from_remaining(remaining),
                    });
                }
                None => report.unspent.push((category.clone(), *limit)),
            }
        }
        report
    }

    pub(crate) fn check_for(&self, category: &str) -> Option<&BudgetCheck> {
        self.checks.iter().find(|c| c.category == category)
    }
}
