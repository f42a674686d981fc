use chrono::{Datelike, Local};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::db::{self, open_ledger};
use crate::error::Result;
use crate::models::{Relation, TxnKind};

const DEMO_MEMBERS: &[(&str, Relation, Option<&str>)] = &[
    ("Alex", Relation::Myself, Some("alex@example.com")),
    ("Jamie", Relation::Spouse, Some("jamie@example.com")),
    ("Riley", Relation::Child, None),
];

/// Expenses generated every month. `member` indexes into DEMO_MEMBERS.
struct MonthlyExpense {
    member: usize,
    day: u32,
    description: &'static str,
    cents: i64,
}

const MONTHLY_EXPENSES: &[MonthlyExpense] = &[
    MonthlyExpense { member: 0, day: 3, description: "Internet service", cents: 7999 },
    MonthlyExpense { member: 0, day: 5, description: "Accounting software subscription", cents: 2400 },
    MonthlyExpense { member: 1, day: 10, description: "Pharmacy refill", cents: 1850 },
    MonthlyExpense { member: 0, day: 15, description: "Grocery run", cents: 21567 },
    MonthlyExpense { member: 1, day: 20, description: "Church donation", cents: 5000 },
];

/// One-off expenses. Each month picks two, rotating through the pool.
struct RotatingExpense {
    member: usize,
    day: u32,
    description: &'static str,
    cents: i64,
}

const ROTATING_EXPENSES: &[RotatingExpense] = &[
    RotatingExpense { member: 0, day: 7, description: "Client dinner", cents: 8420 },
    RotatingExpense { member: 1, day: 9, description: "Dental cleaning", cents: 14500 },
    RotatingExpense { member: 2, day: 12, description: "School textbook order", cents: 6230 },
    RotatingExpense { member: 0, day: 17, description: "Printer supplies", cents: 3189 },
    RotatingExpense { member: 1, day: 19, description: "Utilities bill", cents: 11240 },
    RotatingExpense { member: 2, day: 22, description: "Soccer league fee", cents: 4500 },
    RotatingExpense { member: 0, day: 24, description: "Conference registration", cents: 19900 },
    RotatingExpense { member: 1, day: 26, description: "Nonprofit fundraiser", cents: 7500 },
    RotatingExpense { member: 0, day: 27, description: "Streaming subscription", cents: 1599 },
    RotatingExpense { member: 1, day: 28, description: "Therapy session", cents: 12000 },
];

/// Mileage logged every month, in tenths of a mile.
struct MonthlyMiles {
    member: usize,
    day: u32,
    description: &'static str,
    tenths: i64,
}

const MONTHLY_MILES: &[MonthlyMiles] = &[
    MonthlyMiles { member: 0, day: 8, description: "Client site round trip", tenths: 246 },
    MonthlyMiles { member: 1, day: 16, description: "Hospital volunteer shift", tenths: 125 },
];

/// Hours logged every month, in tenths of an hour.
struct MonthlyHours {
    member: usize,
    day: u32,
    description: &'static str,
    tenths: i64,
}

const MONTHLY_HOURS: &[MonthlyHours] = &[
    MonthlyHours { member: 0, day: 14, description: "Freelance design work", tenths: 65 },
    MonthlyHours { member: 2, day: 21, description: "Library tutoring", tenths: 20 },
];

struct DemoRow {
    member: usize,
    kind: TxnKind,
    created_at: String,
    description: &'static str,
    amount: Decimal,
}

fn make_timestamp(year: i32, month: u32, day: u32) -> String {
    format!("{year:04}-{month:02}-{day:02} 09:00:00")
}

/// Build records covering all of last year plus the current year to date.
/// Deterministic apart from the clock. Seed days never pass the 28th, so no
/// month-length clamping is needed.
fn generate_records() -> Vec<DemoRow> {
    let today = Local::now().date_naive();
    let start_year = today.year() - 1;
    let months = 12 + today.month() as usize;

    let mut rows = Vec::new();
    for i in 0..months {
        let year = start_year + (i / 12) as i32;
        let month = (i % 12) as u32 + 1;

        for e in MONTHLY_EXPENSES {
            // Groceries drift a little from month to month
            let cents = if e.description == "Grocery run" {
                e.cents + ((i % 7) as i64 - 3) * 460
            } else {
                e.cents
            };
            rows.push(DemoRow {
                member: e.member,
                kind: TxnKind::Expense,
                created_at: make_timestamp(year, month, e.day),
                description: e.description,
                amount: Decimal::new(cents, 2),
            });
        }

        for j in 0..2usize {
            let pick = &ROTATING_EXPENSES[(i * 2 + j) % ROTATING_EXPENSES.len()];
            rows.push(DemoRow {
                member: pick.member,
                kind: TxnKind::Expense,
                created_at: make_timestamp(year, month, pick.day),
                description: pick.description,
                amount: Decimal::new(pick.cents, 2),
            });
        }

        for m in MONTHLY_MILES {
            rows.push(DemoRow {
                member: m.member,
                kind: TxnKind::Mile,
                created_at: make_timestamp(year, month, m.day),
                description: m.description,
                amount: Decimal::new(m.tenths, 1),
            });
        }

        for h in MONTHLY_HOURS {
            rows.push(DemoRow {
                member: h.member,
                kind: TxnKind::Hour,
                created_at: make_timestamp(year, month, h.day),
                description: h.description,
                amount: Decimal::new(h.tenths, 1),
            });
        }
    }
    rows
}

fn insert_demo_data(conn: &Connection) -> Result<usize> {
    let mut member_ids = Vec::with_capacity(DEMO_MEMBERS.len());
    for (name, relation, email) in DEMO_MEMBERS {
        member_ids.push(db::add_member(conn, name, *relation, *email)?);
    }

    let rows = generate_records();
    for row in &rows {
        db::insert_txn(
            conn,
            member_ids[row.member],
            row.kind,
            row.description,
            row.amount,
            Some(&row.created_at),
        )?;
    }
    Ok(rows.len())
}

pub fn run() -> Result<()> {
    let conn = open_ledger()?;

    // Idempotency guard
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM members WHERE name = ?1)",
        [DEMO_MEMBERS[0].0],
        |r| r.get(0),
    )?;
    if exists {
        println!("Demo data already loaded (member '{}' exists).", DEMO_MEMBERS[0].0);
        return Ok(());
    }

    let record_count = insert_demo_data(&conn)?;
    let last_year = Local::now().date_naive().year() - 1;

    println!("Demo family loaded!");
    println!("  Members: {}", DEMO_MEMBERS.len());
    println!("  Records: {record_count}");
    println!();
    println!("Try these next:");
    println!("  famledger member list");
    println!("  famledger list --member Alex --type expense");
    println!("  famledger stats Alex");
    println!("  famledger report --year {last_year}");
    println!("  famledger export csv --year {last_year}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db, TxnFilter};
    use crate::models::TxnKind;
    use crate::reports::build_tax_report;
    use chrono::NaiveDateTime;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_generate_records_count() {
        let months = 12 + Local::now().date_naive().month() as usize;
        // 5 monthly expenses + 2 rotating + 2 mile + 2 hour records per month
        assert_eq!(generate_records().len(), months * 11);
    }

    #[test]
    fn test_generate_records_cover_last_year() {
        let rows = generate_records();
        let last_year = Local::now().date_naive().year() - 1;
        for month in 1..=12u32 {
            let prefix = format!("{last_year}-{month:02}-");
            assert!(
                rows.iter().any(|r| r.created_at.starts_with(&prefix)),
                "no records in {prefix}"
            );
        }
    }

    #[test]
    fn test_generate_timestamps_are_valid() {
        for row in generate_records() {
            let parsed = NaiveDateTime::parse_from_str(&row.created_at, "%Y-%m-%d %H:%M:%S");
            assert!(parsed.is_ok(), "invalid timestamp: {}", row.created_at);
        }
    }

    #[test]
    fn test_demo_creates_data() {
        let (_dir, conn) = test_db();
        let record_count = insert_demo_data(&conn).unwrap();

        let members = db::list_members(&conn).unwrap();
        assert_eq!(members.len(), 3);

        let txns = db::query_txns(&conn, &TxnFilter::default()).unwrap();
        assert_eq!(txns.len(), record_count);

        for kind in [TxnKind::Expense, TxnKind::Mile, TxnKind::Hour] {
            assert!(db::count_txns(&conn, kind).unwrap() > 0, "no {} records", kind.as_str());
        }
    }

    #[test]
    fn test_demo_idempotency_guard() {
        let (_dir, conn) = test_db();
        insert_demo_data(&conn).unwrap();

        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM members WHERE name = ?1)",
                [DEMO_MEMBERS[0].0],
                |r| r.get(0),
            )
            .unwrap();
        assert!(exists, "guard member should exist after seeding");
    }

    #[test]
    fn test_demo_prior_year_report_has_deductions() {
        let (_dir, conn) = test_db();
        insert_demo_data(&conn).unwrap();

        let last_year = Local::now().date_naive().year() - 1;
        let expenses = db::query_txns(
            &conn,
            &TxnFilter {
                member_id: None,
                kind: Some(TxnKind::Expense),
                year: Some(last_year),
            },
        )
        .unwrap();
        let report = build_tax_report(&expenses, last_year);

        assert!(report.total_deductible > Decimal::ZERO);
        assert!(!report.forms_needed.is_empty());
        assert!(!report.recommendations.is_empty());
    }
}
