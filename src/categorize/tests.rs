#![allow(clippy::unwrap_used)]

use super::*;
use crate::db::Database;

fn make_rule(id: i64, keyword: &str, category: &str, priority: i64) -> Rule {
    Rule {
        id: Some(id),
        ..Rule::new(keyword, category, priority)
    }
}

// ── Categorizer ───────────────────────────────────────────────

#[test]
fn test_classify_contains_match() {
    let rules = vec![make_rule(1, "coffee", "dining", 0), make_rule(2, "amazon", "shopping", 0)];
    let cat = Categorizer::new(&rules);
    assert_eq!(cat.classify("STARBUCKS COFFEE #123").category(), "dining");
    assert_eq!(cat.classify("AMAZON.COM PURCHASE").category(), "shopping");
}

#[test]
fn test_classify_case_insensitive() {
    let rules = vec![make_rule(1, "coffee", "dining", 0)];
    let cat = Categorizer::new(&rules);
    assert_eq!(cat.classify("Coffee Shop").category(), "dining");
    assert_eq!(cat.classify("COFFEE SHOP").category(), "dining");
    assert_eq!(cat.classify("coffee shop").category(), "dining");
}

#[test]
fn test_classify_higher_priority_wins() {
    let rules = vec![make_rule(1, "food", "dining", 1), make_rule(2, "fast", "fastfood", 5)];
    let cat = Categorizer::new(&rules);
    assert_eq!(
        cat.classify("fastfood diner"),
        Classification::Rule {
            rule_id: 2,
            category: "fastfood".into()
        }
    );
}

#[test]
fn test_classify_priority_tie_earlier_rule_wins() {
    // Input order deliberately reversed
    let rules = vec![make_rule(7, "shop", "later", 3), make_rule(4, "shop", "earlier", 3)];
    let cat = Categorizer::new(&rules);
    assert_eq!(cat.classify("coffee shop").category(), "earlier");
}

#[test]
fn test_classify_no_match() {
    let rules = vec![make_rule(1, "coffee", "dining", 0)];
    let cat = Categorizer::new(&rules);
    assert_eq!(cat.classify("xyz"), Classification::Uncategorized);
    assert_eq!(cat.classify("xyz").category(), "uncategorized");
}

#[test]
fn test_classify_empty_rule_set() {
    let cat = Categorizer::new(&[]);
    assert_eq!(cat.len(), 0);
    assert_eq!(cat.classify("xyz"), Classification::Uncategorized);
}

#[test]
fn test_classify_empty_text() {
    let rules = vec![make_rule(1, "a", "letters", 0)];
    let cat = Categorizer::new(&rules);
    assert_eq!(cat.classify(""), Classification::Uncategorized);
    assert_eq!(cat.classify("   "), Classification::Uncategorized);
}

#[test]
fn test_classify_is_deterministic() {
    let rules = vec![
        make_rule(1, "market", "groceries", 2),
        make_rule(2, "super", "shopping", 2),
        make_rule(3, "supermarket", "groceries", 1),
    ];
    let cat = Categorizer::new(&rules);
    let first = cat.classify("SUPERMARKET 42");
    for _ in 0..100 {
        assert_eq!(cat.classify("SUPERMARKET 42"), first);
    }
    assert_eq!(first.category(), "groceries");
}

#[test]
fn test_blank_keywords_ignored() {
    let rules = vec![make_rule(1, "   ", "everything", 10), make_rule(2, "gym", "health", 0)];
    let cat = Categorizer::new(&rules);
    assert_eq!(cat.len(), 1);
    assert_eq!(cat.classify("city gym").category(), "health");
}

// ── Database-backed rules ─────────────────────────────────────

#[test]
fn test_db_classify_uses_stored_rules() {
    let db = Database::open_in_memory().unwrap();
    db.add_rule("food", "dining", 1).unwrap();
    db.add_rule("fast", "fastfood", 5).unwrap();
    assert_eq!(db.classify("fastfood diner").unwrap().category(), "fastfood");
    assert_eq!(db.classify("Whole Foods").unwrap().category(), "dining");
    assert_eq!(db.classify("xyz").unwrap().category(), "uncategorized");
}

#[test]
fn test_db_classify_shared_keyword_different_priorities() {
    let db = Database::open_in_memory().unwrap();
    db.add_rule("uber", "transport", 0).unwrap();
    db.add_rule("uber", "dining", 2).unwrap();
    assert_eq!(db.classify("UBER EATS").unwrap().category(), "dining");
}
