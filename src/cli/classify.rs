use colored::Colorize;

use crate::classifier::classify;
use crate::error::{FamLedgerError, Result};
use crate::importer::parse_amount;

/// Dry-run the tax classifier. Nothing is written.
pub fn run(description: String, amount: String) -> Result<()> {
    let value = parse_amount(&amount)
        .ok_or_else(|| FamLedgerError::Other(format!("Invalid amount: '{amount}'")))?;
    let c = classify(&description, value);

    let deductible = if c.deductible {
        "Yes".green().to_string()
    } else {
        "No".red().to_string()
    };
    println!("Category:   {}", c.category.as_str().bold());
    println!("Deductible: {deductible}");
    println!("Confidence: {:.0}%", c.confidence * 100.0);
    println!("Form:       {}", c.form);
    Ok(())
}
