use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::classifier::{classify, TaxCategory};
use crate::models::{Transaction, TxnKind};

/// Running totals for one tax category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    pub total: Decimal,
    pub count: usize,
    pub deductible: Decimal,
    pub confidence_sum: f64,
}

impl CategoryTotals {
    /// Mean classifier confidence across the category's records. Returns
    /// 0.0 for an empty bucket rather than dividing by zero.
    pub fn mean_confidence(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.confidence_sum / self.count as f64
        }
    }
}

/// Group a transaction slice by classified tax category. The caller decides
/// what goes in (the tax report feeds expenses only); everything given is
/// classified. BTreeMap keys keep iteration order deterministic.
pub fn by_category(txns: &[Transaction]) -> BTreeMap<TaxCategory, CategoryTotals> {
    let mut map: BTreeMap<TaxCategory, CategoryTotals> = BTreeMap::new();
    for txn in txns {
        let c = classify(&txn.description, txn.amount);
        let entry = map.entry(c.category).or_default();
        entry.total += txn.amount;
        entry.count += 1;
        if c.deductible {
            entry.deductible += txn.amount;
        }
        entry.confidence_sum += c.confidence;
    }
    map
}

/// Flat per-kind sums: dollars spent, miles driven, hours worked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KindTotals {
    pub expense_total: Decimal,
    pub expense_count: usize,
    pub mile_total: Decimal,
    pub mile_count: usize,
    pub hour_total: Decimal,
    pub hour_count: usize,
}

impl KindTotals {
    pub fn count(&self) -> usize {
        self.expense_count + self.mile_count + self.hour_count
    }
}

pub fn by_kind(txns: &[Transaction]) -> KindTotals {
    let mut totals = KindTotals::default();
    for txn in txns {
        match txn.kind {
            TxnKind::Expense => {
                totals.expense_total += txn.amount;
                totals.expense_count += 1;
            }
            TxnKind::Mile => {
                totals.mile_total += txn.amount;
                totals.mile_count += 1;
            }
            TxnKind::Hour => {
                totals.hour_total += txn.amount;
                totals.hour_count += 1;
            }
        }
    }
    totals
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
