use std::path::PathBuf;

use rusqlite::Connection;

use crate::cli::default_year;
use crate::db::{self, TxnFilter};
use crate::error::Result;
use crate::export::{write_csv, write_workbook};
use crate::reports::{build_export_rows, ExportRow};
use crate::settings::get_data_dir;

fn gather_rows(conn: &Connection, year: i32, member: Option<String>) -> Result<Vec<ExportRow>> {
    let member_id = match &member {
        Some(key) => Some(db::find_member(conn, key)?.id),
        None => None,
    };
    let txns = db::query_txns(
        conn,
        &TxnFilter { member_id, kind: None, year: Some(year) },
    )?;
    let members = db::list_members(conn)?;
    build_export_rows(&members, &txns)
}

pub fn csv(year: Option<i32>, member: Option<String>, output: Option<String>) -> Result<()> {
    let conn = db::open_ledger()?;
    let y = default_year(year);
    let rows = gather_rows(&conn, y, member)?;

    let path = match output {
        Some(p) => PathBuf::from(p),
        None => get_data_dir().join("exports").join(format!("famledger-{y}.csv")),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(&path)?;
    write_csv(&rows, file)?;

    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn workbook(year: Option<i32>, member: Option<String>, output_dir: Option<String>) -> Result<()> {
    let conn = db::open_ledger()?;
    let y = default_year(year);
    let rows = gather_rows(&conn, y, member)?;

    let dir = match output_dir {
        Some(d) => PathBuf::from(d),
        None => get_data_dir().join("exports").join(format!("workbook-{y}")),
    };
    let written = write_workbook(&rows, &dir)?;

    for path in &written {
        println!("Wrote {}", path.display());
    }
    println!("{} rows across {} sheets", rows.len(), written.len());
    Ok(())
}
