#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;

use super::*;
use crate::error::LedgerError;

// ── Money ─────────────────────────────────────────────────────

#[test]
fn test_to_minor_units_basic() {
    assert_eq!(to_minor_units("12").unwrap(), 1200);
    assert_eq!(to_minor_units("12.3").unwrap(), 1230);
    assert_eq!(to_minor_units("12.34").unwrap(), 1234);
    assert_eq!(to_minor_units("0.05").unwrap(), 5);
    assert_eq!(to_minor_units("  7.5 ").unwrap(), 750);
}

#[test]
fn test_to_minor_units_truncates_extra_precision() {
    assert_eq!(to_minor_units("12.349").unwrap(), 1234);
    assert_eq!(to_minor_units("0.999").unwrap(), 99);
}

#[test]
fn test_to_minor_units_trailing_point() {
    assert_eq!(to_minor_units("12.").unwrap(), 1200);
}

#[test]
fn test_to_minor_units_rejects_malformed() {
    for bad in ["", "   ", "abc", "1.2.3", ".50", "-5", "+5", "1,000", "12.a", "1e3"] {
        assert!(
            matches!(to_minor_units(bad), Err(LedgerError::InvalidAmount(_))),
            "expected InvalidAmount for {bad:?}"
        );
    }
}

#[test]
fn test_to_minor_units_overflow() {
    assert!(to_minor_units("99999999999999999999").is_err());
}

#[test]
fn test_from_minor_units() {
    assert_eq!(from_minor_units(0), "0.00");
    assert_eq!(from_minor_units(5), "0.05");
    assert_eq!(from_minor_units(1234), "12.34");
    assert_eq!(from_minor_units(-1234), "-12.34");
    assert_eq!(from_minor_units(-5), "-0.05");
    assert_eq!(from_minor_units(90000), "900.00");
}

#[test]
fn test_from_minor_units_extremes() {
    assert_eq!(from_minor_units(i64::MIN), "-92233720368547758.08");
    assert_eq!(from_minor_units(i64::MAX), "92233720368547758.07");
}

#[test]
fn test_money_roundtrip() {
    for x in 0..=1_000_000 {
        assert_eq!(to_minor_units(&from_minor_units(x)).unwrap(), x);
    }
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_normalize_category() {
    assert_eq!(normalize_category("  Food "), "food");
    assert_eq!(normalize_category("RENT"), "rent");
    assert_eq!(normalize_category("   "), "");
}

#[test]
fn test_normalize_category_idempotent() {
    for s in ["", " a ", "Dining Out", "\tGROCERIES\n", "ÉCOLE", "already"] {
        let once = normalize_category(s);
        assert_eq!(normalize_category(&once), once);
    }
}

#[test]
fn test_require_category_rejects_blank() {
    assert!(matches!(require_category(" \t"), Err(LedgerError::InvalidCategory)));
    assert_eq!(require_category(" Travel ").unwrap(), "travel");
}

#[test]
fn test_classification_category() {
    let matched = Classification::Rule {
        rule_id: 3,
        category: "dining".into(),
    };
    assert_eq!(matched.category(), "dining");
    assert!(matched.is_match());
    assert_eq!(Classification::Uncategorized.category(), "uncategorized");
    assert!(!Classification::Uncategorized.is_match());
    assert_eq!(format!("{}", Classification::Uncategorized), "uncategorized");
}

// ── Month / dates ─────────────────────────────────────────────

#[test]
fn test_month_parse_valid() {
    assert_eq!(Month::parse("2024-03").unwrap().as_str(), "2024-03");
    assert_eq!(Month::parse(" 2024-12 ").unwrap().as_str(), "2024-12");
}

#[test]
fn test_month_parse_invalid() {
    for bad in ["2024-00", "2024-13", "2024-3", "24-03", "2024/03", "2024-03-01", "", "abcd-ef"] {
        assert!(
            matches!(Month::parse(bad), Err(LedgerError::InvalidMonth(_))),
            "expected InvalidMonth for {bad:?}"
        );
    }
}

#[test]
fn test_month_of_date() {
    let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    assert_eq!(Month::of(d), Month::parse("2024-01").unwrap());
    assert_eq!(Month::of(d).date_pattern(), "2024-01-%");
}

#[test]
fn test_parse_date() {
    assert_eq!(
        parse_date("2024-02-29").unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
    assert!(parse_date("TODAY").is_ok());
    assert!(matches!(parse_date("2023-02-29"), Err(LedgerError::InvalidDate(_))));
    assert!(matches!(parse_date("02/01/2024"), Err(LedgerError::InvalidDate(_))));
}

// ── Transaction / Rule ────────────────────────────────────────

#[test]
fn test_transaction_new_normalizes() {
    let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let txn = Transaction::new(d, -1234, "  Food ", Some("  lunch  ")).unwrap();
    assert!(txn.id.is_none());
    assert_eq!(txn.category, "food");
    assert_eq!(txn.note.as_deref(), Some("lunch"));
}

#[test]
fn test_transaction_blank_note_is_absent() {
    let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let txn = Transaction::new(d, 100, "food", Some("   ")).unwrap();
    assert!(txn.note.is_none());
    assert_eq!(txn.note_or_empty(), "");
}

#[test]
fn test_transaction_empty_category_rejected() {
    let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    assert!(matches!(
        Transaction::new(d, 100, "  ", None),
        Err(LedgerError::InvalidCategory)
    ));
}

#[test]
fn test_rule_new_normalizes() {
    let rule = Rule::new(" Coffee ", " Dining ", 2);
    assert!(rule.id.is_none());
    assert_eq!(rule.keyword, "coffee");
    assert_eq!(rule.category, "dining");
    assert_eq!(rule.priority, 2);
}
