use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;

use crate::aggregate;
use crate::classifier::{classify, TaxCategory};
use crate::error::{FamLedgerError, Result};
use crate::fmt;
use crate::models::{FamilyMember, Transaction, TxnKind};

// ---------------------------------------------------------------------------
// Export table
// ---------------------------------------------------------------------------

/// One row of the export table, tagged with the owning member's name and a
/// tax classification. The same rows feed the flat CSV and every workbook
/// sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub date: String,
    pub member: String,
    pub kind: TxnKind,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub deductible: bool,
    pub confidence: f64,
    pub form: String,
}

// Mile and Hour rows never go through the keyword classifier; they carry
// these fixed labels no matter what their description says.
fn classification_for(txn: &Transaction) -> (String, bool, f64, String) {
    match txn.kind {
        TxnKind::Expense => {
            let c = classify(&txn.description, txn.amount);
            (
                c.category.as_str().to_string(),
                c.deductible,
                c.confidence,
                c.form.to_string(),
            )
        }
        TxnKind::Mile => (
            "Business Mileage".to_string(),
            true,
            0.90,
            "Schedule C".to_string(),
        ),
        TxnKind::Hour => (
            "Work Hours".to_string(),
            false,
            0.70,
            "Not applicable".to_string(),
        ),
    }
}

/// Build one export row per transaction. Fails if a transaction references
/// a member missing from the given set.
pub fn build_export_rows(
    members: &[FamilyMember],
    txns: &[Transaction],
) -> Result<Vec<ExportRow>> {
    let names: HashMap<i64, &str> = members.iter().map(|m| (m.id, m.name.as_str())).collect();
    let mut rows = Vec::with_capacity(txns.len());
    for txn in txns {
        let member = names
            .get(&txn.member_id)
            .ok_or_else(|| FamLedgerError::MemberNotFound(txn.member_id.to_string()))?;
        let (category, deductible, confidence, form) = classification_for(txn);
        rows.push(ExportRow {
            date: txn.date().to_string(),
            member: member.to_string(),
            kind: txn.kind,
            description: txn.description.clone(),
            amount: txn.amount,
            category,
            deductible,
            confidence,
            form,
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tax report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub total: Decimal,
    pub count: usize,
    pub deductible: Decimal,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct TaxReport {
    pub year: i32,
    pub total_deductible: Decimal,
    pub categories: BTreeMap<TaxCategory, CategorySummary>,
    pub recommendations: Vec<String>,
    pub forms_needed: BTreeSet<&'static str>,
}

/// Build the yearly tax report from Expense records only; mile and hour
/// records never enter the category aggregation. Empty input produces a
/// zeroed report, not an error.
pub fn build_tax_report(expenses: &[Transaction], year: i32) -> TaxReport {
    let grouped = aggregate::by_category(expenses);

    let mut categories = BTreeMap::new();
    let mut total_deductible = Decimal::ZERO;
    let mut forms_needed = BTreeSet::new();

    for (category, totals) in &grouped {
        categories.insert(
            *category,
            CategorySummary {
                total: totals.total,
                count: totals.count,
                deductible: totals.deductible,
                confidence: totals.mean_confidence(),
            },
        );
        total_deductible += totals.deductible;
        if totals.deductible > Decimal::ZERO {
            forms_needed.insert(category.form());
        }
    }

    // Fixed order: the overall line, then Medical, then Business. No other
    // category gets bespoke text.
    let mut recommendations = Vec::new();
    if total_deductible > Decimal::ZERO {
        recommendations.push(format!(
            "You have {} in potential deductions for {year}.",
            fmt::money(total_deductible)
        ));
    }
    if let Some(medical) = categories.get(&TaxCategory::Medical) {
        if medical.deductible > Decimal::ZERO {
            recommendations.push(
                "Medical expenses only count above 7.5% of adjusted gross income; \
                 check the Schedule A threshold before filing."
                    .to_string(),
            );
        }
    }
    if let Some(business) = categories.get(&TaxCategory::Business) {
        if business.deductible > Decimal::ZERO {
            recommendations.push(format!(
                "Report {} of business expenses on Schedule C.",
                fmt::money(business.deductible)
            ));
        }
    }

    TaxReport {
        year,
        total_deductible,
        categories,
        recommendations,
        forms_needed,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Relation;
    use rust_decimal_macros::dec;

    fn member(id: i64, name: &str) -> FamilyMember {
        FamilyMember {
            id,
            name: name.into(),
            relation: Relation::Myself,
            email: None,
            created_at: "2024-01-01 00:00:00".into(),
        }
    }

    fn txn(member_id: i64, kind: TxnKind, description: &str, amount: Decimal) -> Transaction {
        Transaction {
            id: 0,
            member_id,
            kind,
            description: description.into(),
            amount,
            created_at: "2025-04-02 10:30:00".into(),
        }
    }

    #[test]
    fn test_export_rows_cover_all_kinds() {
        let members = vec![member(1, "Dana"), member(2, "Jamie")];
        let txns = vec![
            txn(1, TxnKind::Expense, "doctor visit", dec!(120.00)),
            txn(1, TxnKind::Mile, "errand", dec!(8.4)),
            txn(2, TxnKind::Hour, "yard work", dec!(2.5)),
        ];
        let rows = build_export_rows(&members, &txns).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].date, "2025-04-02");
        assert_eq!(rows[0].member, "Dana");
        assert_eq!(rows[0].category, "Medical Expense");
        assert!(rows[0].deductible);

        // Synthetic labels ignore the description entirely.
        assert_eq!(rows[1].category, "Business Mileage");
        assert!(rows[1].deductible);
        assert_eq!(rows[1].confidence, 0.90);
        assert_eq!(rows[1].form, "Schedule C");

        assert_eq!(rows[2].member, "Jamie");
        assert_eq!(rows[2].category, "Work Hours");
        assert!(!rows[2].deductible);
        assert_eq!(rows[2].confidence, 0.70);
        assert_eq!(rows[2].form, "Not applicable");
    }

    #[test]
    fn test_export_rows_synthetic_even_with_keywords() {
        let members = vec![member(1, "Dana")];
        let txns = vec![txn(1, TxnKind::Mile, "doctor visit drive", dec!(10))];
        let rows = build_export_rows(&members, &txns).unwrap();
        assert_eq!(rows[0].category, "Business Mileage");
    }

    #[test]
    fn test_export_rows_unknown_member() {
        let members = vec![member(1, "Dana")];
        let txns = vec![txn(7, TxnKind::Expense, "supplies", dec!(5))];
        let err = build_export_rows(&members, &txns).unwrap_err();
        assert!(matches!(err, FamLedgerError::MemberNotFound(_)));
    }

    #[test]
    fn test_tax_report_totals_and_recommendations() {
        let expenses = vec![
            txn(1, TxnKind::Expense, "doctor visit", dec!(200.00)),
            txn(1, TxnKind::Expense, "office supplies", dec!(99.50)),
            txn(1, TxnKind::Expense, "grocery run", dec!(45.00)),
        ];
        let report = build_tax_report(&expenses, 2025);

        assert_eq!(report.year, 2025);
        assert_eq!(report.total_deductible, dec!(299.50));
        assert_eq!(report.categories[&TaxCategory::Medical].deductible, dec!(200.00));
        assert_eq!(report.categories[&TaxCategory::Personal].deductible, Decimal::ZERO);

        assert_eq!(report.recommendations.len(), 3);
        assert!(report.recommendations[0].contains("$299.50"));
        assert!(report.recommendations[0].contains("2025"));
        assert!(report.recommendations[1].contains("7.5%"));
        assert!(report.recommendations[2].contains("Schedule C"));
        assert!(report.recommendations[2].contains("$99.50"));
    }

    #[test]
    fn test_tax_report_forms_deduplicated() {
        // Medical and Charitable both point at Schedule A.
        let expenses = vec![
            txn(1, TxnKind::Expense, "doctor visit", dec!(200.00)),
            txn(1, TxnKind::Expense, "church donation", dec!(50.00)),
            txn(1, TxnKind::Expense, "client software", dec!(30.00)),
        ];
        let report = build_tax_report(&expenses, 2025);
        let forms: Vec<&str> = report.forms_needed.iter().copied().collect();
        assert_eq!(forms, vec!["Schedule A", "Schedule C"]);
    }

    #[test]
    fn test_tax_report_skips_medical_line_when_under_floor() {
        let expenses = vec![
            txn(1, TxnKind::Expense, "doctor copay", dec!(0.05)),
            txn(1, TxnKind::Expense, "office supplies", dec!(10.00)),
        ];
        let report = build_tax_report(&expenses, 2025);
        assert_eq!(report.recommendations.len(), 2);
        assert!(report.recommendations[1].contains("Schedule C"));
        assert!(!report.forms_needed.contains("Schedule A"));
    }

    #[test]
    fn test_tax_report_empty_input() {
        let report = build_tax_report(&[], 2025);
        assert_eq!(report.total_deductible, Decimal::ZERO);
        assert!(report.categories.is_empty());
        assert!(report.recommendations.is_empty());
        assert!(report.forms_needed.is_empty());
    }

    #[test]
    fn test_tax_report_personal_only_has_no_recommendations() {
        let expenses = vec![txn(1, TxnKind::Expense, "grocery run", dec!(45.00))];
        let report = build_tax_report(&expenses, 2025);
        assert_eq!(report.total_deductible, Decimal::ZERO);
        assert!(report.recommendations.is_empty());
        assert!(report.forms_needed.is_empty());
    }
}
