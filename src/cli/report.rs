use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::default_year;
use crate::db::{self, open_ledger, TxnFilter};
use crate::error::Result;
use crate::fmt::money;
use crate::models::TxnKind;
use crate::reports::build_tax_report;
use crate::settings::load_settings;

pub fn run(year: Option<i32>, member: Option<String>) -> Result<()> {
    let conn = open_ledger()?;
    let y = default_year(year);
    let member_id = match &member {
        Some(key) => Some(db::find_member(&conn, key)?.id),
        None => None,
    };

    // Mile and hour records stay out of the tax aggregation; they only show
    // up in exports.
    let expenses = db::query_txns(
        &conn,
        &TxnFilter { member_id, kind: Some(TxnKind::Expense), year: Some(y) },
    )?;
    let report = build_tax_report(&expenses, y);

    let family = load_settings().family_name;
    let title = if family.is_empty() {
        format!("Tax Report {y}")
    } else {
        format!("{family} Tax Report {y}")
    };

    if report.categories.is_empty() {
        println!("{title}\n\nNo expense records for {y}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Total", "Count", "Deductible", "Confidence"]);
    for (category, summary) in &report.categories {
        table.add_row(vec![
            Cell::new(category.as_str()),
            Cell::new(money(summary.total)),
            Cell::new(summary.count),
            Cell::new(money(summary.deductible)),
            Cell::new(format!("{:.0}%", summary.confidence * 100.0)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total Deductible".bold()),
        Cell::new(""),
        Cell::new(""),
        Cell::new(money(report.total_deductible).green().bold().to_string()),
        Cell::new(""),
    ]);
    println!("{title}\n{table}");

    if !report.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &report.recommendations {
            println!("  - {rec}");
        }
    }
    if !report.forms_needed.is_empty() {
        let forms: Vec<&str> = report.forms_needed.iter().copied().collect();
        println!("\nForms needed: {}", forms.join(", "));
    }
    Ok(())
}
