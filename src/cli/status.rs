use crate::db::{self, get_connection};
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::models::TxnKind;
use crate::settings::{get_data_dir, load_settings};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = get_data_dir();
    let db_path = data_dir.join("famledger.db");

    let family = &settings.family_name;
    println!("Family:     {}", if family.is_empty() { "(not set)" } else { family });
    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let conn = get_connection(&db_path)?;
        let members = db::list_members(&conn)?.len();
        let expenses = db::count_txns(&conn, TxnKind::Expense)?;
        let miles = db::count_txns(&conn, TxnKind::Mile)?;
        let hours = db::count_txns(&conn, TxnKind::Hour)?;

        println!();
        println!("Members:   {members}");
        println!("Expenses:  {expenses}");
        println!("Miles:     {miles}");
        println!("Hours:     {hours}");
    } else {
        println!();
        println!("Database not found. Run `famledger init` to set up.");
    }

    Ok(())
}
