use std::path::Path;

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::db;
use crate::error::{FamLedgerError, Result};
use crate::models::TxnKind;

/// Columns an import table must carry, in canonical spelling. Header
/// matching is case-insensitive; extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Date", "Description", "Amount", "Type"];

/// Only this many row errors are reported back; rows past the cap are still
/// processed and counted.
const MAX_REPORTED_ERRORS: usize = 10;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a currency-ish amount into an exact decimal: tolerates `$`,
/// thousands commas, stray quotes, and accounting parentheses for negatives.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return inner.trim().parse::<Decimal>().ok().map(|d| -d);
    }
    s.parse().ok()
}

/// Normalize an imported date to the stored `YYYY-MM-DD HH:MM:SS` form.
/// Accepts a bare `YYYY-MM-DD` (midnight) or passes through a value that
/// already carries a time.
pub fn parse_created_at(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    let date = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(format!("{} 00:00:00", date.format("%Y-%m-%d")))
}

#[cfg(any(feature = "xlsx", test))]
pub fn excel_serial_to_date(serial: f64) -> String {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = chrono::NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
    let date = base + chrono::Duration::days(serial as i64);
    date.format("%Y-%m-%d").to_string()
}

// ---------------------------------------------------------------------------
// Header validation
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ColumnIndices {
    date: usize,
    description: usize,
    amount: usize,
    kind: usize,
}

/// Resolve the four required columns in a header row. Any absence is
/// batch-fatal and the error names every missing column.
fn column_indices<'a>(headers: impl Iterator<Item = &'a str>) -> Result<ColumnIndices> {
    let mut date = None;
    let mut description = None;
    let mut amount = None;
    let mut kind = None;

    for (i, header) in headers.enumerate() {
        match header.trim().to_lowercase().as_str() {
            "date" => date = Some(i),
            "description" => description = Some(i),
            "amount" => amount = Some(i),
            "type" => kind = Some(i),
            _ => {}
        }
    }

    let mut missing = Vec::new();
    for (name, idx) in REQUIRED_COLUMNS
        .iter()
        .zip([&date, &description, &amount, &kind])
    {
        if idx.is_none() {
            missing.push(name.to_string());
        }
    }
    if !missing.is_empty() {
        return Err(FamLedgerError::MissingColumns(missing));
    }

    Ok(ColumnIndices {
        date: date.unwrap_or(0),
        description: description.unwrap_or(0),
        amount: amount.unwrap_or(0),
        kind: kind.unwrap_or(0),
    })
}

// ---------------------------------------------------------------------------
// File readers
// ---------------------------------------------------------------------------

/// A raw tabular row, as read from a file, before any validation.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub kind: String,
}

pub fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    let headers = rdr.headers()?.clone();
    let idx = column_indices(headers.iter())?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        rows.push(RawRow {
            date: field(idx.date),
            description: field(idx.description),
            amount: field(idx.amount),
            kind: field(idx.kind),
        });
    }
    Ok(rows)
}

#[cfg(feature = "xlsx")]
pub fn read_xlsx_rows(path: &Path) -> Result<Vec<RawRow>> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| FamLedgerError::Other(format!("Failed to open XLSX: {e}")))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| FamLedgerError::Other("XLSX file has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| FamLedgerError::Other(format!("Failed to read sheet: {e}")))?;

    let mut rows_iter = range.rows();
    let header: Vec<String> = rows_iter
        .next()
        .map(|cells| cells.iter().map(cell_text).collect())
        .unwrap_or_default();
    let idx = column_indices(header.iter().map(|s| s.as_str()))?;

    let mut rows = Vec::new();
    for cells in rows_iter {
        let text = |i: usize| cells.get(i).map(cell_text).unwrap_or_default();
        let date = match cells.get(idx.date) {
            Some(Data::Float(f)) => excel_serial_to_date(*f),
            Some(Data::Int(i)) => excel_serial_to_date(*i as f64),
            Some(Data::DateTime(dt)) => excel_serial_to_date(dt.as_f64()),
            _ => text(idx.date),
        };
        rows.push(RawRow {
            date,
            description: text(idx.description),
            amount: text(idx.amount),
            kind: text(idx.kind),
        });
    }
    Ok(rows)
}

#[cfg(feature = "xlsx")]
fn cell_text(data: &calamine::Data) -> String {
    use calamine::Data;
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format!("{f}"),
        Data::Int(i) => i.to_string(),
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ImportReport {
    pub imported: usize,
    pub failed: usize,
    /// `"Row <n>: <message>"` strings, capped at the first ten failures.
    pub errors: Vec<String>,
}

/// Import raw rows as records owned by the given member. Row failures are
/// recorded and skipped; rows already imported stay. A missing member is
/// batch-fatal.
pub fn import_rows(conn: &Connection, member_id: i64, rows: &[RawRow]) -> Result<ImportReport> {
    db::get_member(conn, member_id)?;

    let mut imported = 0usize;
    let mut failed = 0usize;
    let mut errors = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        match import_row(conn, member_id, row) {
            Ok(()) => imported += 1,
            Err(message) => {
                failed += 1;
                if errors.len() < MAX_REPORTED_ERRORS {
                    errors.push(format!("Row {}: {message}", i + 1));
                }
            }
        }
    }

    Ok(ImportReport {
        imported,
        failed,
        errors,
    })
}

fn import_row(conn: &Connection, member_id: i64, row: &RawRow) -> std::result::Result<(), String> {
    let created_at = parse_created_at(&row.date)
        .ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD)", row.date))?;
    let kind = TxnKind::parse(&row.kind)
        .ok_or_else(|| format!("unknown type '{}' (expected expense, mile, or hour)", row.kind))?;
    let amount =
        parse_amount(&row.amount).ok_or_else(|| format!("invalid amount '{}'", row.amount))?;
    db::insert_txn(conn, member_id, kind, &row.description, amount, Some(&created_at))
        .map_err(|e| e.to_string())?;
    Ok(())
}

/// Import a file, dispatching on its extension.
pub fn import_file(conn: &Connection, path: &Path, member_id: i64) -> Result<ImportReport> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    let rows = match ext.as_str() {
        "csv" => read_csv_rows(path)?,
        #[cfg(feature = "xlsx")]
        "xlsx" => read_xlsx_rows(path)?,
        _ => return Err(FamLedgerError::UnsupportedFormat(path.display().to_string())),
    };
    import_rows(conn, member_id, &rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
