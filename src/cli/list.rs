use std::collections::HashMap;

use comfy_table::Table;

use crate::aggregate;
use crate::db::{self, open_ledger, TxnFilter};
use crate::error::{FamLedgerError, Result};
use crate::fmt::{money, qty};
use crate::models::TxnKind;

pub fn run(member: Option<String>, kind: Option<String>, year: Option<i32>) -> Result<()> {
    let conn = open_ledger()?;

    let member_id = match &member {
        Some(key) => Some(db::find_member(&conn, key)?.id),
        None => None,
    };
    let kind = match &kind {
        Some(k) => {
            Some(TxnKind::parse(k).ok_or_else(|| FamLedgerError::UnknownKind(k.clone()))?)
        }
        None => None,
    };

    let txns = db::query_txns(&conn, &TxnFilter { member_id, kind, year })?;
    if txns.is_empty() {
        println!("No records found.");
        return Ok(());
    }

    let names: HashMap<i64, String> = db::list_members(&conn)?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Member", "Type", "Description", "Amount"]);
    for t in &txns {
        let amount = match t.kind {
            TxnKind::Expense => money(t.amount),
            TxnKind::Mile => format!("{} mi", qty(t.amount)),
            TxnKind::Hour => format!("{} hr", qty(t.amount)),
        };
        table.add_row(vec![
            t.id.to_string(),
            t.date().to_string(),
            names.get(&t.member_id).cloned().unwrap_or_default(),
            t.kind.label().to_string(),
            t.description.clone(),
            amount,
        ]);
    }
    println!("Records ({})\n{table}", txns.len());

    let totals = aggregate::by_kind(&txns);
    println!(
        "\nTotals: {} in expenses, {} miles, {} hours",
        money(totals.expense_total),
        qty(totals.mile_total),
        qty(totals.hour_total)
    );
    Ok(())
}
