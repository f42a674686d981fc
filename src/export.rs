use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;

use crate::error::Result;
use crate::reports::ExportRow;

/// Header of the flat export and of the workbook's transactions sheet. The
/// leading Date/Description/Amount/Type columns are exactly what the
/// importer requires, so an export feeds straight back in.
pub const EXPORT_HEADER: [&str; 9] = [
    "Date",
    "Member",
    "Type",
    "Description",
    "Amount",
    "Category",
    "Deductible",
    "Confidence",
    "Form",
];

/// A named table destined for one sheet of the workbook export.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn header(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

// ---------------------------------------------------------------------------
// Sheet builders. Each takes the full row set and stands alone.
// ---------------------------------------------------------------------------

/// Every transaction with its classification, one row each.
pub fn transactions_sheet(rows: &[ExportRow]) -> Sheet {
    Sheet {
        name: "Transactions".to_string(),
        header: header(&EXPORT_HEADER),
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.member.clone(),
                    r.kind.label().to_string(),
                    r.description.clone(),
                    r.amount.to_string(),
                    r.category.clone(),
                    yes_no(r.deductible).to_string(),
                    format!("{:.2}", r.confidence),
                    r.form.clone(),
                ]
            })
            .collect(),
    }
}

/// Totals split by category and deductibility.
pub fn category_summary_sheet(rows: &[ExportRow]) -> Sheet {
    let mut buckets: BTreeMap<(String, bool), (Decimal, usize)> = BTreeMap::new();
    for row in rows {
        let bucket = buckets
            .entry((row.category.clone(), row.deductible))
            .or_insert((Decimal::ZERO, 0));
        bucket.0 += row.amount;
        bucket.1 += 1;
    }
    Sheet {
        name: "Category Summary".to_string(),
        header: header(&["Category", "Deductible", "Total", "Count"]),
        rows: buckets
            .into_iter()
            .map(|((category, deductible), (total, count))| {
                vec![
                    category,
                    yes_no(deductible).to_string(),
                    total.to_string(),
                    count.to_string(),
                ]
            })
            .collect(),
    }
}

/// Per-member record count and summed amount.
pub fn member_summary_sheet(rows: &[ExportRow]) -> Sheet {
    let mut buckets: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();
    for row in rows {
        let bucket = buckets
            .entry(row.member.clone())
            .or_insert((0, Decimal::ZERO));
        bucket.0 += 1;
        bucket.1 += row.amount;
    }
    Sheet {
        name: "Members".to_string(),
        header: header(&["Member", "Records", "Total Amount"]),
        rows: buckets
            .into_iter()
            .map(|(member, (count, total))| vec![member, count.to_string(), total.to_string()])
            .collect(),
    }
}

pub fn workbook(rows: &[ExportRow]) -> Vec<Sheet> {
    vec![
        transactions_sheet(rows),
        category_summary_sheet(rows),
        member_summary_sheet(rows),
    ]
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

pub fn write_sheet<W: Write>(sheet: &Sheet, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&sheet.header)?;
    for row in &sheet.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// The flat single-file encoding: just the transactions sheet.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<()> {
    write_sheet(&transactions_sheet(rows), writer)
}

/// The multi-sheet encoding: one CSV per sheet inside `dir`. Returns the
/// written paths in sheet order.
pub fn write_workbook(rows: &[ExportRow], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for sheet in workbook(rows) {
        let path = dir.join(format!("{}.csv", slug(&sheet.name)));
        let file = std::fs::File::create(&path)?;
        write_sheet(&sheet, file)?;
        written.push(path);
    }
    Ok(written)
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TxnKind;
    use rust_decimal_macros::dec;

    fn row(
        member: &str,
        kind: TxnKind,
        description: &str,
        amount: Decimal,
        category: &str,
        deductible: bool,
    ) -> ExportRow {
        ExportRow {
            date: "2025-04-02".into(),
            member: member.into(),
            kind,
            description: description.into(),
            amount,
            category: category.into(),
            deductible,
            confidence: 0.85,
            form: "Schedule C".into(),
        }
    }

    fn sample() -> Vec<ExportRow> {
        vec![
            row("Dana", TxnKind::Expense, "office supplies", dec!(40.00), "Business Expense", true),
            row("Dana", TxnKind::Expense, "doctor copay", dec!(0.05), "Medical Expense", false),
            row("Dana", TxnKind::Expense, "doctor visit", dec!(120.00), "Medical Expense", true),
            row("Jamie", TxnKind::Mile, "client site", dec!(12.5), "Business Mileage", true),
        ]
    }

    #[test]
    fn test_transactions_sheet_shape() {
        let sheet = transactions_sheet(&sample());
        assert_eq!(sheet.name, "Transactions");
        assert_eq!(sheet.header[0], "Date");
        assert_eq!(sheet.rows.len(), 4);
        assert_eq!(
            sheet.rows[0],
            vec![
                "2025-04-02", "Dana", "Expense", "office supplies", "40.00",
                "Business Expense", "Yes", "0.85", "Schedule C",
            ]
        );
        assert_eq!(sheet.rows[3][2], "Mile");
    }

    #[test]
    fn test_category_summary_splits_deductibility() {
        let sheet = category_summary_sheet(&sample());
        // Medical appears twice: once deductible, once not.
        let medical: Vec<&Vec<String>> = sheet
            .rows
            .iter()
            .filter(|r| r[0] == "Medical Expense")
            .collect();
        assert_eq!(medical.len(), 2);
        let not_deductible = medical.iter().find(|r| r[1] == "No").unwrap();
        assert_eq!(not_deductible[2], "0.05");
        assert_eq!(not_deductible[3], "1");
        let deductible = medical.iter().find(|r| r[1] == "Yes").unwrap();
        assert_eq!(deductible[2], "120.00");
    }

    #[test]
    fn test_member_summary_counts_and_totals() {
        let sheet = member_summary_sheet(&sample());
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0], vec!["Dana", "3", "160.05"]);
        assert_eq!(sheet.rows[1], vec!["Jamie", "1", "12.5"]);
    }

    #[test]
    fn test_workbook_has_three_sheets() {
        let sheets = workbook(&sample());
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Transactions", "Category Summary", "Members"]);
    }

    #[test]
    fn test_write_csv_round_trips_through_reader() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();

        let mut rdr = csv::Reader::from_reader(buf.as_slice());
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(&headers[0], "Date");
        assert_eq!(&headers[4], "Amount");
        let records: Vec<csv::StringRecord> =
            rdr.records().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(&records[2][3], "doctor visit");
    }

    #[test]
    fn test_write_workbook_creates_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("wb");
        let paths = write_workbook(&sample(), &out).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(out.join("transactions.csv").exists());
        assert!(out.join("category-summary.csv").exists());
        assert!(out.join("members.csv").exists());
    }

    #[test]
    fn test_empty_rows_still_write_headers() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Date,Member,Type,Description,Amount"));
        assert_eq!(text.lines().count(), 1);
    }
}
