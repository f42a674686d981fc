use comfy_table::Table;

use crate::aggregate;
use crate::db::{self, open_ledger, TxnFilter};
use crate::error::Result;
use crate::fmt::{money, qty};

pub fn run(member: String, year: Option<i32>) -> Result<()> {
    let conn = open_ledger()?;
    let m = db::find_member(&conn, &member)?;

    let txns = db::query_txns(
        &conn,
        &TxnFilter { member_id: Some(m.id), kind: None, year },
    )?;
    let totals = aggregate::by_kind(&txns);

    let scope = match year {
        Some(y) => y.to_string(),
        None => "all time".to_string(),
    };

    let mut table = Table::new();
    table.set_header(vec!["Kind", "Total", "Count"]);
    table.add_row(vec![
        "Expenses".to_string(),
        money(totals.expense_total),
        totals.expense_count.to_string(),
    ]);
    table.add_row(vec![
        "Miles".to_string(),
        qty(totals.mile_total),
        totals.mile_count.to_string(),
    ]);
    table.add_row(vec![
        "Hours".to_string(),
        qty(totals.hour_total),
        totals.hour_count.to_string(),
    ]);

    println!("Stats for {} ({scope})\n{table}", m.name);
    println!("\n{} records total", totals.count());
    Ok(())
}
