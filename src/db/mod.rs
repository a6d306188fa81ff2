mod schema;

use chrono::NaiveDate;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use tracing::debug;

use crate::categorize::Categorizer;
use crate::error::{LedgerError, LedgerResult};
use crate::models::*;
use crate::report::Totals;

pub(crate) const DEFAULT_QUERY_LIMIT: usize = 20;

/// Conjunctive filters for [`Database::get_transactions`]. Unset fields do
/// not constrain the result.
#[derive(Debug, Clone)]
pub(crate) struct TransactionFilter {
    pub(crate) category: Option<String>,
    pub(crate) month: Option<Month>,
    pub(crate) from: Option<NaiveDate>,
    pub(crate) to: Option<NaiveDate>,
    /// Case-insensitive substring of the note.
    pub(crate) search: Option<String>,
    pub(crate) limit: usize,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            category: None,
            month: None,
            from: None,
            to: None,
            search: None,
            limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> LedgerResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        register_functions(&conn)?;
        let mut db = Self { conn };
        db.migrate()?;
        debug!(path = %path.display(), "opened ledger database");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> LedgerResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        register_functions(&conn)?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> LedgerResult<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })?;

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    /// Validate and store a single transaction, returning its id.
    pub(crate) fn add_transaction(
        &self,
        date: NaiveDate,
        amount_cents: i64,
        category: &str,
        note: Option<&str>,
    ) -> LedgerResult<i64> {
        let txn = Transaction::new(date, amount_cents, category, note)?;
        self.insert_transaction(&txn)
    }

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> LedgerResult<i64> {
        self.conn.execute(
            "INSERT INTO transactions (date, amount_cents, category, note)
             VALUES (?1, ?2, ?3, ?4)",
            params![txn.date, txn.amount_cents, txn.category, txn.note],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, date = %txn.date, amount_cents = txn.amount_cents, category = %txn.category, "inserted transaction");
        Ok(id)
    }

    /// Insert every row inside one SQLite transaction; nothing is written
    /// if any row fails.
    pub(crate) fn insert_transactions_batch(&mut self, txns: &[Transaction]) -> LedgerResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO transactions (date, amount_cents, category, note)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for txn in txns {
                stmt.execute(params![txn.date, txn.amount_cents, txn.category, txn.note])?;
            }
        }
        tx.commit()?;
        debug!(count = txns.len(), "inserted transaction batch");
        Ok(txns.len())
    }

    pub(crate) fn delete_transaction(&self, id: i64) -> LedgerResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(LedgerError::NotFound(id));
        }
        debug!(id, "deleted transaction");
        Ok(())
    }

    /// Newest first: `(date desc, id desc)`, capped at `filter.limit`.
    pub(crate) fn get_transactions(&self, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        let mut sql = String::from(
            "SELECT id, date, amount_cents, category, note FROM transactions WHERE 1=1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(category) = &filter.category {
            sql.push_str(&format!(" AND category = ?{}", param_values.len() + 1));
            param_values.push(Box::new(normalize_category(category)));
        }
        if let Some(month) = &filter.month {
            sql.push_str(&format!(" AND date LIKE ?{}", param_values.len() + 1));
            param_values.push(Box::new(month.date_pattern()));
        }
        if let Some(from) = filter.from {
            sql.push_str(&format!(" AND date >= ?{}", param_values.len() + 1));
            param_values.push(Box::new(from));
        }
        if let Some(to) = filter.to {
            sql.push_str(&format!(" AND date <= ?{}", param_values.len() + 1));
            param_values.push(Box::new(to));
        }
        if let Some(search) = &filter.search {
            sql.push_str(&format!(
                " AND unicode_lower(COALESCE(note, '')) LIKE ?{} ESCAPE '\\'",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("%{}%", escape_like(&search.to_lowercase()))));
        }

        sql.push_str(&format!(
            " ORDER BY date DESC, id DESC LIMIT ?{}",
            param_values.len() + 1
        ));
        param_values.push(Box::new(i64::try_from(filter.limit).unwrap_or(i64::MAX)));

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Every transaction in `month`, oldest first.
    pub(crate) fn transactions_for_month(&self, month: &Month) -> LedgerResult<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, amount_cents, category, note FROM transactions
             WHERE date LIKE ?1
             ORDER BY date ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![month.date_pattern()], row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Insert or overwrite the limit for `(month, category)`.
    pub(crate) fn set_budget(&self, month: &Month, category: &str, limit_cents: i64) -> LedgerResult<Budget> {
        let category = require_category(category)?;
        if limit_cents < 0 {
            return Err(LedgerError::InvalidAmount(from_minor_units(limit_cents)));
        }
        self.conn.execute(
            "INSERT INTO budgets (month, category, limit_cents)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(month, category) DO UPDATE SET limit_cents = excluded.limit_cents",
            params![month.as_str(), category, limit_cents],
        )?;
        debug!(month = %month, category = %category, limit_cents, "set budget");
        Ok(Budget {
            month: month.clone(),
            category,
            limit_cents,
        })
    }

    /// Budgets for `month`, largest limit first.
    pub(crate) fn get_budgets(&self, month: &Month) -> LedgerResult<Vec<Budget>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, limit_cents FROM budgets
             WHERE month = ?1
             ORDER BY limit_cents DESC, category ASC",
        )?;
        let rows = stmt.query_map(params![month.as_str()], |row| {
            Ok(Budget {
                month: month.clone(),
                category: row.get(0)?,
                limit_cents: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Rules ─────────────────────────────────────────────────

    pub(crate) fn add_rule(&self, keyword: &str, category: &str, priority: i64) -> LedgerResult<i64> {
        let rule = Rule::new(keyword, category, priority);
        if rule.keyword.is_empty() {
            return Err(LedgerError::InvalidKeyword);
        }
        if rule.category.is_empty() {
            return Err(LedgerError::InvalidCategory);
        }
        self.conn.execute(
            "INSERT INTO rules (keyword, category, priority) VALUES (?1, ?2, ?3)",
            params![rule.keyword, rule.category, rule.priority],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, keyword = %rule.keyword, category = %rule.category, priority, "added rule");
        Ok(id)
    }

    /// All rules in evaluation order: `(priority desc, id asc)`.
    pub(crate) fn get_rules(&self) -> LedgerResult<Vec<Rule>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, keyword, category, priority FROM rules ORDER BY priority DESC, id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Rule {
                id: Some(row.get(0)?),
                keyword: row.get(1)?,
                category: row.get(2)?,
                priority: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn categorizer(&self) -> LedgerResult<Categorizer> {
        Ok(Categorizer::new(&self.get_rules()?))
    }

    pub(crate) fn classify(&self, text: &str) -> LedgerResult<Classification> {
        Ok(self.categorizer()?.classify(text))
    }

    // ── Analytics ─────────────────────────────────────────────

    /// Grand total and per-category sums, optionally restricted to a month.
    /// Budgets are attached only when a month is given.
    pub(crate) fn totals(&self, month: Option<&Month>) -> LedgerResult<Totals> {
        let (filter, param_values): (&str, Vec<String>) = match month {
            Some(m) => ("WHERE date LIKE ?1", vec![m.date_pattern()]),
            None => ("", vec![]),
        };

        let grand_total: i64 = self.conn.query_row(
            &format!("SELECT COALESCE(SUM(amount_cents), 0) FROM transactions {filter}"),
            rusqlite::params_from_iter(param_values.iter()),
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT category, SUM(amount_cents) AS total
             FROM transactions
             {filter}
             GROUP BY category
             ORDER BY total DESC, category ASC"
        ))?;
        let by_category = stmt
            .query_map(rusqlite::params_from_iter(param_values.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let budgets = match month {
            Some(m) => self
                .get_budgets(m)?
                .into_iter()
                .map(|b| (b.category, b.limit_cents))
                .collect(),
            None => Vec::new(),
        };

        Ok(Totals {
            grand_total,
            by_category,
            budgets,
        })
    }
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: Some(row.get(0)?),
        date: row.get(1)?,
        amount_cents: row.get(2)?,
        category: row.get(3)?,
        note: row.get(4)?,
    })
}

/// SQLite's `lower()` and `LIKE` only fold ASCII; `unicode_lower` matches
/// the case folding the rule engine uses.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "unicode_lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
