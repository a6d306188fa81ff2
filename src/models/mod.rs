mod budget;
mod category;
mod money;
mod period;
mod rule;
mod transaction;

pub(crate) use budget::Budget;
pub(crate) use category::{normalize_category, require_category, Classification};
pub(crate) use money::{from_minor_units, to_minor_units};
pub(crate) use period::{parse_date, Month, DATE_FORMAT};
pub(crate) use rule::Rule;
pub(crate) use transaction::Transaction;

#[cfg(test)]
mod tests;
