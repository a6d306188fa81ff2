use chrono::format::{ParseErrorKind, Parsed, StrftimeItems};
use chrono::NaiveDate;
use csv::StringRecord;
use std::path::Path;
use tracing::{info, warn};

use crate::categorize::Categorizer;
use crate::db::Database;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{normalize_category, to_minor_units, Transaction, DATE_FORMAT};

/// Which CSV headers hold each field, and how dates are written.
#[derive(Debug, Clone)]
pub(crate) struct ColumnMapping {
    pub(crate) date_column: String,
    pub(crate) amount_column: String,
    pub(crate) description_column: String,
    /// When set, a non-empty value in this column overrides rule matching.
    pub(crate) category_column: Option<String>,
    /// chrono `strftime` pattern.
    pub(crate) date_format: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_column: "date".into(),
            amount_column: "amount".into(),
            description_column: "description".into(),
            category_column: None,
            date_format: DATE_FORMAT.into(),
        }
    }
}

/// Column positions resolved against a concrete header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedColumns {
    date: usize,
    amount: usize,
    description: Option<usize>,
    category: Option<usize>,
}

impl ColumnMapping {
    /// Date and amount columns are required; description and category may be
    /// absent from the file.
    pub(crate) fn resolve(&self, headers: &StringRecord) -> LedgerResult<ResolvedColumns> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name.trim())
        };
        let require =
            |name: &str| find(name).ok_or_else(|| LedgerError::MissingColumn(name.to_string()));

        Ok(ResolvedColumns {
            date: require(&self.date_column)?,
            amount: require(&self.amount_column)?,
            description: find(&self.description_column),
            category: self.category_column.as_deref().and_then(find),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImportMode {
    /// Run the whole pipeline but persist nothing.
    DryRun,
    Commit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ImportOutcome {
    pub(crate) staged: usize,
    pub(crate) inserted: usize,
    /// Staged rows whose category came from a rule.
    pub(crate) matched: usize,
    /// Rows without a date or amount.
    pub(crate) skipped: usize,
}

pub(crate) fn import_file(
    db: &mut Database,
    path: &Path,
    mapping: &ColumnMapping,
    mode: ImportMode,
) -> LedgerResult<ImportOutcome> {
    if !path.exists() {
        return Err(LedgerError::SourceNotFound(path.to_path_buf()));
    }
    let (headers, records) = read_records(path)?;
    import_rows(db, &headers, &records, mapping, mode)
}

/// Read the header row and every record of a CSV file.
pub(crate) fn read_records(path: &Path) -> LedgerResult<(StringRecord, Vec<StringRecord>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)?;

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(LedgerError::EmptySource);
    }
    let records = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((headers, records))
}

/// Parse, classify and stage `records`, then insert them as one batch when
/// `mode` is [`ImportMode::Commit`]. Any malformed date or amount aborts
/// before the store is touched.
pub(crate) fn import_rows(
    db: &mut Database,
    headers: &StringRecord,
    records: &[StringRecord],
    mapping: &ColumnMapping,
    mode: ImportMode,
) -> LedgerResult<ImportOutcome> {
    let columns = mapping.resolve(headers)?;
    let categorizer = db.categorizer()?;
    let (staged, mut outcome) = stage_rows(records, &columns, &mapping.date_format, &categorizer)?;

    if outcome.skipped > 0 {
        warn!(skipped = outcome.skipped, "skipped rows missing a date or amount");
    }

    match mode {
        ImportMode::DryRun => {
            info!(staged = outcome.staged, matched = outcome.matched, rules = categorizer.len(), "import dry run");
        }
        ImportMode::Commit => {
            outcome.inserted = db.insert_transactions_batch(&staged)?;
            info!(inserted = outcome.inserted, rules = categorizer.len(), "import committed");
        }
    }
    Ok(outcome)
}

fn stage_rows(
    records: &[StringRecord],
    columns: &ResolvedColumns,
    date_format: &str,
    categorizer: &Categorizer,
) -> LedgerResult<(Vec<Transaction>, ImportOutcome)> {
    let mut staged = Vec::with_capacity(records.len());
    let mut outcome = ImportOutcome::default();

    for (i, record) in records.iter().enumerate() {
        let field = |idx: Option<usize>| idx.and_then(|c| record.get(c)).map(str::trim).unwrap_or("");

        let raw_date = field(Some(columns.date));
        let raw_amount = field(Some(columns.amount));
        let description = field(columns.description);

        if raw_date.is_empty() || raw_amount.is_empty() {
            outcome.skipped += 1;
            continue;
        }

        // Header is line 1
        let date = parse_date(raw_date, date_format, i + 2)?;
        let amount_cents = parse_signed_amount(raw_amount)?;

        let explicit = normalize_category(field(columns.category));
        let category = if explicit.is_empty() {
            let classification = categorizer.classify(description);
            if classification.is_match() {
                outcome.matched += 1;
            }
            classification.category().to_string()
        } else {
            explicit
        };

        staged.push(Transaction::new(date, amount_cents, &category, Some(description))?);
    }

    outcome.staged = staged.len();
    Ok((staged, outcome))
}

/// Formats without a day field (`%m/%Y`) resolve to the first of the month.
fn parse_date(s: &str, fmt: &str, row: usize) -> LedgerResult<NaiveDate> {
    let date_error = || LedgerError::DateParse {
        row,
        value: s.to_string(),
        format: fmt.to_string(),
    };

    match NaiveDate::parse_from_str(s, fmt) {
        Ok(date) => Ok(date),
        Err(e) if e.kind() == ParseErrorKind::NotEnough => {
            let mut parsed = Parsed::new();
            chrono::format::parse(&mut parsed, s, StrftimeItems::new(fmt)).map_err(|_| date_error())?;
            parsed.set_day(1).map_err(|_| date_error())?;
            parsed.to_naive_date().map_err(|_| date_error())
        }
        Err(_) => Err(date_error()),
    }
}

/// Bank-style amount: optional leading sign, comma thousands separators.
fn parse_signed_amount(raw: &str) -> LedgerResult<i64> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(cleaned)),
    };

    let cents = to_minor_units(digits).map_err(|_| LedgerError::InvalidAmount(raw.to_string()))?;
    Ok(if negative { -cents } else { cents })
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
