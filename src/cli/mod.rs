pub mod add;
pub mod classify;
pub mod demo;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod members;
pub mod report;
pub mod stats;
pub mod status;

use clap::{Parser, Subcommand};

/// Year to report on when none is given.
pub(crate) fn default_year(year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| chrono::Datelike::year(&chrono::Local::now()))
}

#[derive(Parser)]
#[command(
    name = "famledger",
    about = "Family bookkeeping CLI for shared expenses, mileage, and hours."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up famledger: choose a data directory and initialize the database.
    Init {
        /// Path for famledger data (default: ~/Documents/famledger)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage family members.
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },
    /// Record an expense, mileage, or hours entry for a member.
    Add {
        /// Record type: expense, mile, hour
        kind: String,
        /// Free-text description (expenses are tax-classified from it)
        description: String,
        /// Dollars, miles, or hours depending on the record type
        amount: String,
        /// Member the record belongs to (name or ID)
        #[arg(long)]
        member: String,
        /// Backdate the record: YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
    },
    /// List records, optionally filtered by member, type, or year.
    List {
        /// Filter by member (name or ID)
        #[arg(long)]
        member: Option<String>,
        /// Filter by record type: expense, mile, hour
        #[arg(long = "type")]
        kind: Option<String>,
        /// Filter by year: YYYY
        #[arg(long)]
        year: Option<i32>,
    },
    /// Totals for one member: expenses, miles, and hours.
    Stats {
        /// Member name or ID
        member: String,
        /// Restrict to a year (default: all time)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Preview the tax classification for a description and amount.
    Classify {
        /// Description to classify
        description: String,
        /// Amount in dollars
        amount: String,
    },
    /// Yearly tax report across the family.
    Report {
        /// Year: YYYY (default: current year)
        #[arg(long)]
        year: Option<i32>,
        /// Limit to one member (name or ID)
        #[arg(long)]
        member: Option<String>,
    },
    /// Export records with their tax classifications.
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Import records from a CSV or XLSX file.
    Import {
        /// Path to the file to import
        file: String,
        /// Member the imported records belong to (name or ID)
        #[arg(long)]
        member: String,
    },
    /// Load a sample family with a year of records to explore famledger.
    Demo,
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum MemberCommands {
    /// Add a family member.
    Add {
        /// Member name, e.g. 'Dana'
        name: String,
        /// Relation: self, spouse, child, parent, sibling, other
        #[arg(long, default_value = "other")]
        relation: String,
        /// Email address for report delivery
        #[arg(long)]
        email: Option<String>,
    },
    /// List all family members.
    List,
    /// Remove a member and every record they own.
    Remove {
        /// Member name or ID
        member: String,
    },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Flat CSV: one row per record with its classification.
    Csv {
        /// Year: YYYY (default: current year)
        #[arg(long)]
        year: Option<i32>,
        /// Limit to one member (name or ID)
        #[arg(long)]
        member: Option<String>,
        /// Output file path
        #[arg(long)]
        output: Option<String>,
    },
    /// Workbook: transactions plus category and member summary sheets.
    Workbook {
        /// Year: YYYY (default: current year)
        #[arg(long)]
        year: Option<i32>,
        /// Limit to one member (name or ID)
        #[arg(long)]
        member: Option<String>,
        /// Output directory
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
    },
}
