use std::path::PathBuf;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{get_data_dir, load_settings, save_settings, shellexpand_path};

/// Set up the data directory and create an empty ledger database.
/// Safe to re-run: existing data is left alone.
pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();

    let resolved = match data_dir {
        Some(dir) => {
            let expanded = shellexpand_path(&dir);
            settings.data_dir = expanded.clone();
            PathBuf::from(expanded)
        }
        None => get_data_dir(),
    };
    save_settings(&settings)?;

    std::fs::create_dir_all(&resolved)?;
    std::fs::create_dir_all(resolved.join("imports"))?;
    std::fs::create_dir_all(resolved.join("exports"))?;

    let conn = get_connection(&resolved.join("famledger.db"))?;
    init_db(&conn)?;

    println!("Initialized famledger at {}", resolved.display());
    println!();
    println!("Try these next:");
    println!("  famledger member add \"Your Name\" --relation self");
    println!("  famledger add expense \"Office supplies\" 42.50 --member \"Your Name\"");
    println!("  famledger report");
    Ok(())
}
