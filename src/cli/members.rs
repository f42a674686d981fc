use comfy_table::Table;

use crate::db::{self, open_ledger};
use crate::error::{FamLedgerError, Result};
use crate::models::Relation;

pub fn add(name: String, relation: String, email: Option<String>) -> Result<()> {
    let relation = Relation::parse(&relation)
        .ok_or_else(|| FamLedgerError::UnknownRelation(relation.clone()))?;
    let conn = open_ledger()?;
    db::add_member(&conn, &name, relation, email.as_deref())?;
    println!("Added member: {name} ({})", relation.as_str());
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = open_ledger()?;
    let members = db::list_members(&conn)?;

    if members.is_empty() {
        println!("No members yet. Add one with `famledger member add <name>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Relation", "Email"]);
    for m in &members {
        table.add_row(vec![
            m.id.to_string(),
            m.name.clone(),
            m.relation.as_str().to_string(),
            m.email.clone().unwrap_or_default(),
        ]);
    }
    println!("Members\n{table}");
    Ok(())
}

pub fn remove(member: String) -> Result<()> {
    let conn = open_ledger()?;
    let m = db::find_member(&conn, &member)?;
    let removed = db::delete_member(&conn, m.id)?;
    match removed {
        0 => println!("Removed member: {}", m.name),
        1 => println!("Removed member: {} (and 1 record)", m.name),
        n => println!("Removed member: {} (and {n} records)", m.name),
    }
    Ok(())
}
