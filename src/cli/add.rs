use colored::Colorize;

use crate::classifier::classify;
use crate::db::{self, open_ledger};
use crate::error::{FamLedgerError, Result};
use crate::fmt::{money, qty};
use crate::importer::{parse_amount, parse_created_at};
use crate::models::TxnKind;

pub fn run(
    kind: String,
    description: String,
    amount: String,
    member: String,
    date: Option<String>,
) -> Result<()> {
    let kind = TxnKind::parse(&kind).ok_or_else(|| FamLedgerError::UnknownKind(kind.clone()))?;
    let value = parse_amount(&amount)
        .ok_or_else(|| FamLedgerError::Other(format!("Invalid amount: '{amount}'")))?;
    let created_at = match &date {
        Some(d) => Some(parse_created_at(d).ok_or_else(|| {
            FamLedgerError::Other(format!("Invalid date '{d}' (expected YYYY-MM-DD)"))
        })?),
        None => None,
    };

    let conn = open_ledger()?;
    let m = db::find_member(&conn, &member)?;
    db::insert_txn(&conn, m.id, kind, &description, value, created_at.as_deref())?;

    let shown = match kind {
        TxnKind::Expense => money(value),
        TxnKind::Mile => format!("{} mi", qty(value)),
        TxnKind::Hour => format!("{} hr", qty(value)),
    };
    println!("Recorded {} for {}: {} ({})", kind.as_str(), m.name, description, shown);

    // Expenses get an immediate classification preview so typos in the
    // description surface now, not at tax time.
    if kind == TxnKind::Expense {
        let c = classify(&description, value);
        let deductible = if c.deductible {
            "deductible".green().to_string()
        } else {
            "not deductible".to_string()
        };
        println!(
            "  {} ({:.0}% confidence, {deductible})",
            c.category.as_str().bold(),
            c.confidence * 100.0
        );
    }
    Ok(())
}
