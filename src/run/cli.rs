use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::render::{format_money, truncate};
use crate::config::DEFAULT_EXPORT_PATH;
use crate::db::{Database, TransactionFilter, DEFAULT_QUERY_LIMIT};
use crate::import::{ColumnMapping, ImportMode};
use crate::models::{normalize_category, parse_date, to_minor_units, Classification, Month};
use crate::report::BudgetReport;

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };

    let rest = &args[2..];
    match command.as_str() {
        "add" => cli_add(rest, db),
        "list" | "ls" => cli_list(rest, db),
        "totals" => cli_totals(rest, db),
        "delete" | "rm" => cli_delete(rest, db),
        "budget-set" => cli_budget_set(rest, db),
        "budget-show" => cli_budget_show(rest, db),
        "rule-add" => cli_rule_add(rest, db),
        "rule-list" => cli_rule_list(db),
        "classify" => cli_classify(rest, db),
        "import" => cli_import(rest, db),
        "export" => cli_export(rest, db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendlog {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("spendlog - local expense ledger");
    println!();
    println!("Usage: spendlog <command> [options]");
    println!();
    println!("Commands:");
    println!("  add --date <YYYY-MM-DD|today> --amount <12.34> --category <name> [--note <text>]");
    println!("  list [--limit N] [--category C] [--month YYYY-MM] [--from D] [--to D] [--search S]");
    println!("  totals [--month YYYY-MM]      Totals overall and by category, with budgets");
    println!("  delete <id>                   Delete a transaction");
    println!("  budget-set --month YYYY-MM --category <name> --amount <300.00>");
    println!("  budget-show [--month YYYY-MM] Show budgets (default: current month)");
    println!("  rule-add --keyword <text> --category <name> [--priority N]");
    println!("  rule-list                     List rules (higher priority wins)");
    println!("  classify <text>               Show which category the rules assign");
    println!("  import <file.csv>             Import a bank CSV (dry run unless --commit)");
    println!("    --date-col <name>           Date column (default: date)");
    println!("    --amount-col <name>         Amount column (default: amount)");
    println!("    --desc-col <name>           Description column (default: description)");
    println!("    --category-col <name>       Use this column's category instead of rules");
    println!("    --date-format <fmt>         strftime pattern (default: %Y-%m-%d)");
    println!("    --commit                    Insert rows into the database");
    println!("  export [--month YYYY-MM] [--out <path>]  (default: current month, exports/month.csv)");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .filter(|v| !v.trim().is_empty())
}

fn required_flag<'a>(args: &'a [String], flag: &str) -> Result<&'a str> {
    flag_value(args, flag).ok_or_else(|| anyhow::anyhow!("Missing required option {flag}"))
}

/// `--month` if given, else the current calendar month.
fn month_or_current(args: &[String]) -> Result<Month> {
    Ok(flag_value(args, "--month")
        .map(Month::parse)
        .transpose()?
        .unwrap_or_else(Month::current))
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    let date = parse_date(required_flag(args, "--date")?)?;
    let amount = to_minor_units(required_flag(args, "--amount")?)?;
    let category = required_flag(args, "--category")?;
    let note = flag_value(args, "--note");

    let id = db.add_transaction(date, amount, category, note)?;
    println!(
        "Added #{id}: {date}  {}  [{}] {}",
        format_money(amount),
        normalize_category(category),
        note.unwrap_or("")
    );
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database) -> Result<()> {
    let limit = match flag_value(args, "--limit") {
        Some(l) => l
            .parse()
            .with_context(|| format!("Invalid --limit '{l}'"))?,
        None => DEFAULT_QUERY_LIMIT,
    };
    let filter = TransactionFilter {
        category: flag_value(args, "--category").map(str::to_string),
        month: flag_value(args, "--month").map(Month::parse).transpose()?,
        from: flag_value(args, "--from").map(parse_date).transpose()?,
        to: flag_value(args, "--to").map(parse_date).transpose()?,
        search: flag_value(args, "--search").map(str::to_string),
        limit,
    };

    let rows = db.get_transactions(&filter)?;
    if rows.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!("{:<5} {:<10}  {:>12}  {:<14}  Note", "ID", "Date", "Amount", "Category");
    println!("{}", "─".repeat(60));
    for txn in &rows {
        println!(
            "{:<5} {:<10}  {:>12}  {:<14}  {}",
            txn.id.unwrap_or(0),
            txn.date.to_string(),
            format_money(txn.amount_cents),
            truncate(&txn.category, 14),
            txn.note_or_empty(),
        );
    }
    Ok(())
}

fn cli_totals(args: &[String], db: &mut Database) -> Result<()> {
    let month = flag_value(args, "--month").map(Month::parse).transpose()?;
    let totals = db.totals(month.as_ref())?;
    let report = BudgetReport::build(&totals);

    let label = month.as_ref().map(|m| format!(" for {m}")).unwrap_or_default();
    println!("Total{label}: {}", format_money(totals.grand_total));

    if !totals.by_category.is_empty() {
        println!();
        println!("By category:");
        for (category, cents) in &totals.by_category {
            let mut line = format!("  {category:<14} {}", format_money(*cents));
            if let Some(check) = report.check_for(category) {
                line.push_str(&format!(
                    "   (budget {}, remaining {} -> {})",
                    format_money(check.limit),
                    format_money(check.remaining),
                    check.status
                ));
            }
            println!("{line}");
        }
    }

    if !report.unspent.is_empty() {
        println!();
        println!("Budgeted categories with no spending:");
        for (category, limit) in &report.unspent {
            println!("  {category:<14} budget {}", format_money(*limit));
        }
    }
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let raw = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: spendlog delete <id>"))?;
    let id: i64 = raw
        .parse()
        .with_context(|| format!("Invalid transaction id '{raw}'"))?;
    db.delete_transaction(id)?;
    println!("Deleted transaction #{id}.");
    Ok(())
}

fn cli_budget_set(args: &[String], db: &mut Database) -> Result<()> {
    let month = Month::parse(required_flag(args, "--month")?)?;
    let category = required_flag(args, "--category")?;
    let limit = to_minor_units(required_flag(args, "--amount")?)?;

    let budget = db.set_budget(&month, category, limit)?;
    println!(
        "Budget set: {} [{}] = {}",
        budget.month,
        budget.category,
        format_money(budget.limit_cents)
    );
    Ok(())
}

fn cli_budget_show(args: &[String], db: &mut Database) -> Result<()> {
    let month = month_or_current(args)?;
    let budgets = db.get_budgets(&month)?;
    if budgets.is_empty() {
        println!("No budgets set for {month}.");
        return Ok(());
    }
    println!("Budgets for {month}:");
    for budget in &budgets {
        println!("  {:<14} {}", budget.category, format_money(budget.limit_cents));
    }
    Ok(())
}

fn cli_rule_add(args: &[String], db: &mut Database) -> Result<()> {
    let keyword = required_flag(args, "--keyword")?;
    let category = required_flag(args, "--category")?;
    let priority: i64 = match flag_value(args, "--priority") {
        Some(p) => p
            .parse()
            .with_context(|| format!("Invalid --priority '{p}'"))?,
        None => 0,
    };

    let id = db.add_rule(keyword, category, priority)?;
    println!(
        "Rule #{id} added: '{}' -> [{}] priority={priority}",
        keyword.trim().to_lowercase(),
        normalize_category(category)
    );
    Ok(())
}

fn cli_rule_list(db: &mut Database) -> Result<()> {
    let rules = db.get_rules()?;
    if rules.is_empty() {
        println!("No rules yet.");
        return Ok(());
    }
    println!("Rules (higher priority wins):");
    for rule in &rules {
        println!(
            "  {:<4} priority={:<4} '{}' -> {}",
            rule.id.unwrap_or(0),
            rule.priority,
            rule.keyword,
            rule.category
        );
    }
    Ok(())
}

fn cli_classify(args: &[String], db: &mut Database) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: spendlog classify <text>");
    }
    let text = args.join(" ");
    match db.classify(&text)? {
        Classification::Rule { rule_id, category } => println!("{category} (rule #{rule_id})"),
        Classification::Uncategorized => println!("{}", Classification::Uncategorized),
    }
    Ok(())
}

fn cli_import(args: &[String], db: &mut Database) -> Result<()> {
    let file_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .ok_or_else(|| anyhow::anyhow!("Usage: spendlog import <file.csv> [--commit]"))?;
    let path = PathBuf::from(shellexpand(file_path));

    let defaults = ColumnMapping::default();
    let mapping = ColumnMapping {
        date_column: flag_value(args, "--date-col").map_or(defaults.date_column, str::to_string),
        amount_column: flag_value(args, "--amount-col").map_or(defaults.amount_column, str::to_string),
        description_column: flag_value(args, "--desc-col")
            .map_or(defaults.description_column, str::to_string),
        category_column: flag_value(args, "--category-col").map(str::to_string),
        date_format: flag_value(args, "--date-format").map_or(defaults.date_format, str::to_string),
    };
    let mode = if has_flag(args, "--commit") {
        ImportMode::Commit
    } else {
        ImportMode::DryRun
    };

    let outcome = crate::import::import_file(db, &path, &mapping, mode)?;
    println!("Auto-categorized {}/{} rows", outcome.matched, outcome.staged);
    if outcome.skipped > 0 {
        println!("Skipped {} rows missing a date or amount", outcome.skipped);
    }
    match mode {
        ImportMode::Commit => println!("Imported {} rows into database.", outcome.inserted),
        ImportMode::DryRun => println!(
            "[DRY-RUN] Would import {} rows. Re-run with --commit to insert.",
            outcome.staged
        ),
    }
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let month = month_or_current(args)?;
    let output_path = flag_value(args, "--out")
        .map(shellexpand)
        .unwrap_or_else(|| DEFAULT_EXPORT_PATH.to_string());
    let path = Path::new(&output_path);

    let count = crate::import::export_month(db, &month, path)?;
    println!("Exported {count} transactions for {month} to {}", path.display());
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
