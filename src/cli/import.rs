use std::path::PathBuf;

use colored::Colorize;

use crate::db::{self, open_ledger};
use crate::error::Result;
use crate::importer::import_file;

pub fn run(file: &str, member: &str) -> Result<()> {
    let conn = open_ledger()?;
    let m = db::find_member(&conn, member)?;

    let report = import_file(&conn, &PathBuf::from(file), m.id)?;

    if report.failed == 0 {
        println!("{} imported for {}", report.imported, m.name);
        return Ok(());
    }

    println!(
        "{} imported, {} for {}",
        report.imported,
        format!("{} failed", report.failed).red(),
        m.name
    );
    for error in &report.errors {
        println!("  {error}");
    }
    if report.failed > report.errors.len() {
        println!("  (showing first {} of {} errors)", report.errors.len(), report.failed);
    }
    Ok(())
}
