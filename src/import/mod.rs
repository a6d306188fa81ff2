mod csv_export;
mod csv_import;

pub(crate) use csv_export::export_month;
pub(crate) use csv_import::{import_file, ColumnMapping, ImportMode};
