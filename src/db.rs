use std::path::Path;

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::error::{FamLedgerError, Result};
use crate::models::{FamilyMember, Relation, Transaction, TxnKind};

// Amounts are decimal strings, not REAL: sums must stay exact to the cent.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS members (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    relation TEXT NOT NULL,
    email TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    member_id INTEGER NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('expense', 'mile', 'hour')),
    description TEXT NOT NULL,
    amount TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_transactions_member ON transactions(member_id);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Open the ledger database in the configured data directory, creating the
/// directory and the tables on first use.
pub fn open_ledger() -> Result<Connection> {
    let dir = crate::settings::get_data_dir();
    std::fs::create_dir_all(&dir)?;
    let conn = get_connection(&dir.join("famledger.db"))?;
    init_db(&conn)?;
    Ok(conn)
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

pub fn add_member(
    conn: &Connection,
    name: &str,
    relation: Relation,
    email: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO members (name, relation, email) VALUES (?1, ?2, ?3)",
        rusqlite::params![name, relation.as_str(), email],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_members(conn: &Connection) -> Result<Vec<FamilyMember>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, relation, email, created_at FROM members ORDER BY id",
    )?;
    let members = stmt
        .query_map([], member_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(members)
}

pub fn get_member(conn: &Connection, id: i64) -> Result<FamilyMember> {
    conn.query_row(
        "SELECT id, name, relation, email, created_at FROM members WHERE id = ?1",
        [id],
        member_from_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => FamLedgerError::MemberNotFound(id.to_string()),
        other => other.into(),
    })
}

/// Resolve a member from CLI input: a numeric id, or an exact name
/// (case-insensitive).
pub fn find_member(conn: &Connection, key: &str) -> Result<FamilyMember> {
    if let Ok(id) = key.trim().parse::<i64>() {
        return get_member(conn, id);
    }
    conn.query_row(
        "SELECT id, name, relation, email, created_at FROM members \
         WHERE name = ?1 COLLATE NOCASE",
        [key.trim()],
        member_from_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => FamLedgerError::MemberNotFound(key.to_string()),
        other => other.into(),
    })
}

/// Delete a member and, via the cascade, every record they own. Returns the
/// number of records that went with them.
pub fn delete_member(conn: &Connection, id: i64) -> Result<usize> {
    let owned: i64 = conn.query_row(
        "SELECT count(*) FROM transactions WHERE member_id = ?1",
        [id],
        |r| r.get(0),
    )?;
    let deleted = conn.execute("DELETE FROM members WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(FamLedgerError::MemberNotFound(id.to_string()));
    }
    Ok(owned as usize)
}

fn member_from_row(row: &rusqlite::Row) -> rusqlite::Result<FamilyMember> {
    let relation_raw: String = row.get(2)?;
    let relation = Relation::parse(&relation_raw)
        .ok_or_else(|| invalid_column(2, format!("unknown relation: {relation_raw}")))?;
    Ok(FamilyMember {
        id: row.get(0)?,
        name: row.get(1)?,
        relation,
        email: row.get(3)?,
        created_at: row.get(4)?,
    })
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// Optional filters for transaction retrieval. `None` means no constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxnFilter {
    pub member_id: Option<i64>,
    pub kind: Option<TxnKind>,
    pub year: Option<i32>,
}

pub fn insert_txn(
    conn: &Connection,
    member_id: i64,
    kind: TxnKind,
    description: &str,
    amount: Decimal,
    created_at: Option<&str>,
) -> Result<i64> {
    match created_at {
        Some(ts) => conn.execute(
            "INSERT INTO transactions (member_id, kind, description, amount, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![member_id, kind.as_str(), description, amount.to_string(), ts],
        )?,
        None => conn.execute(
            "INSERT INTO transactions (member_id, kind, description, amount) \
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![member_id, kind.as_str(), description, amount.to_string()],
        )?,
    };
    Ok(conn.last_insert_rowid())
}

/// Fetch transactions matching the filter, oldest first. The fixed ORDER BY
/// keeps report and export output reproducible.
pub fn query_txns(conn: &Connection, filter: &TxnFilter) -> Result<Vec<Transaction>> {
    let mut sql = String::from(
        "SELECT id, member_id, kind, description, amount, created_at \
         FROM transactions WHERE 1=1",
    );
    let mut params: Vec<rusqlite::types::Value> = Vec::new();

    if let Some(member_id) = filter.member_id {
        sql.push_str(&format!(" AND member_id = ?{}", params.len() + 1));
        params.push(rusqlite::types::Value::Integer(member_id));
    }
    if let Some(kind) = filter.kind {
        sql.push_str(&format!(" AND kind = ?{}", params.len() + 1));
        params.push(rusqlite::types::Value::Text(kind.as_str().to_string()));
    }
    if let Some(year) = filter.year {
        sql.push_str(&format!(" AND created_at LIKE ?{}", params.len() + 1));
        params.push(rusqlite::types::Value::Text(format!("{year}-%")));
    }
    sql.push_str(" ORDER BY created_at, id");

    let mut stmt = conn.prepare(&sql)?;
    let txns = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), txn_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(txns)
}

pub fn count_txns(conn: &Connection, kind: TxnKind) -> Result<i64> {
    let count = conn.query_row(
        "SELECT count(*) FROM transactions WHERE kind = ?1",
        [kind.as_str()],
        |r| r.get(0),
    )?;
    Ok(count)
}

fn txn_from_row(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let kind_raw: String = row.get(2)?;
    let kind = TxnKind::parse(&kind_raw)
        .ok_or_else(|| invalid_column(2, format!("unknown record kind: {kind_raw}")))?;
    let amount_raw: String = row.get(4)?;
    let amount = amount_raw
        .parse::<Decimal>()
        .map_err(|e| invalid_column(4, e.to_string()))?;
    Ok(Transaction {
        id: row.get(0)?,
        member_id: row.get(1)?,
        kind,
        description: row.get(3)?,
        amount,
        created_at: row.get(5)?,
    })
}

fn invalid_column(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, msg.into())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
