use thiserror::Error;

#[derive(Error, Debug)]
pub enum FamLedgerError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Family member not found: {0}")]
    MemberNotFound(String),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Unknown record type: {0} (expected expense, mile, or hour)")]
    UnknownKind(String),

    #[error("Unknown relation: {0} (expected self, spouse, child, parent, sibling, or other)")]
    UnknownRelation(String),

    #[error("Unsupported import format: {0}")]
    UnsupportedFormat(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FamLedgerError>;
