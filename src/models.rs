use rust_decimal::Decimal;

/// Relationship of a family member to the account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Myself,
    Spouse,
    Child,
    Parent,
    Sibling,
    Other,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Myself => "Self",
            Relation::Spouse => "Spouse",
            Relation::Child => "Child",
            Relation::Parent => "Parent",
            Relation::Sibling => "Sibling",
            Relation::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Relation> {
        match s.trim().to_lowercase().as_str() {
            "self" | "myself" => Some(Relation::Myself),
            "spouse" => Some(Relation::Spouse),
            "child" => Some(Relation::Child),
            "parent" => Some(Relation::Parent),
            "sibling" => Some(Relation::Sibling),
            "other" => Some(Relation::Other),
            _ => None,
        }
    }
}

/// The three record kinds a family member can log. `amount` means dollars
/// for an expense, miles driven for a mile record, hours worked for an
/// hour record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TxnKind {
    Expense,
    Mile,
    Hour,
}

impl TxnKind {
    /// Lowercase tag as stored in the database and accepted on import.
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnKind::Expense => "expense",
            TxnKind::Mile => "mile",
            TxnKind::Hour => "hour",
        }
    }

    /// Capitalized tag for tables and export rows.
    pub fn label(&self) -> &'static str {
        match self {
            TxnKind::Expense => "Expense",
            TxnKind::Mile => "Mile",
            TxnKind::Hour => "Hour",
        }
    }

    pub fn parse(s: &str) -> Option<TxnKind> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" => Some(TxnKind::Expense),
            "mile" | "miles" | "mileage" => Some(TxnKind::Mile),
            "hour" | "hours" => Some(TxnKind::Hour),
            _ => None,
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct FamilyMember {
    pub id: i64,
    pub name: String,
    pub relation: Relation,
    pub email: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub member_id: i64,
    pub kind: TxnKind,
    pub description: String,
    pub amount: Decimal,
    /// `YYYY-MM-DD HH:MM:SS`, set at insert unless an import supplies one.
    pub created_at: String,
}

impl Transaction {
    /// Date portion (`YYYY-MM-DD`) of the creation timestamp.
    pub fn date(&self) -> &str {
        self.created_at
            .split_whitespace()
            .next()
            .unwrap_or(&self.created_at)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
