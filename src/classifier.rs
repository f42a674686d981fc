use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Coarse tax buckets an expense description can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaxCategory {
    Business,
    Medical,
    Education,
    Charitable,
    HomeOffice,
    Personal,
}

impl TaxCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxCategory::Business => "Business Expense",
            TaxCategory::Medical => "Medical Expense",
            TaxCategory::Education => "Education",
            TaxCategory::Charitable => "Charitable Donation",
            TaxCategory::HomeOffice => "Home Office",
            TaxCategory::Personal => "Personal Expense",
        }
    }

    /// Fixed heuristic confidence for a match in this category.
    pub fn confidence(&self) -> f64 {
        match self {
            TaxCategory::Business => 0.85,
            TaxCategory::Medical => 0.90,
            TaxCategory::Education => 0.80,
            TaxCategory::Charitable => 0.85,
            TaxCategory::HomeOffice => 0.75,
            TaxCategory::Personal => 0.50,
        }
    }

    /// Tax form the category points the user at. Guidance only.
    pub fn form(&self) -> &'static str {
        match self {
            TaxCategory::Business => "Schedule C",
            TaxCategory::Medical => "Schedule A",
            TaxCategory::Education => "Form 8863",
            TaxCategory::Charitable => "Schedule A",
            TaxCategory::HomeOffice => "Form 8829",
            TaxCategory::Personal => "Not applicable",
        }
    }
}

impl std::fmt::Display for TaxCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: TaxCategory,
    pub deductible: bool,
    pub confidence: f64,
    pub form: &'static str,
}

// Evaluated top to bottom; the first keyword hit wins, so Business outranks
// Medical outranks Education and so on.
const RULES: &[(TaxCategory, &[&str])] = &[
    (
        TaxCategory::Business,
        &["business", "client", "invoice", "supplies", "software", "equipment", "advertising", "conference"],
    ),
    (
        TaxCategory::Medical,
        &["doctor", "medical", "pharmacy", "hospital", "dental", "prescription", "clinic", "therapy"],
    ),
    (
        TaxCategory::Education,
        &["tuition", "school", "education", "course", "textbook", "training"],
    ),
    (
        TaxCategory::Charitable,
        &["donation", "charity", "church", "nonprofit", "tithe"],
    ),
    (
        TaxCategory::HomeOffice,
        &["internet", "utilities", "rent", "home office", "phone"],
    ),
];

// Compares the raw transaction amount to the constant 0.075, not to 7.5%
// of AGI. Preserved as-is so reports stay consistent with the prior system.
const MEDICAL_DEDUCTIBLE_FLOOR: Decimal = dec!(0.075);

/// Classify a free-text description into a tax category.
///
/// Total function: every input yields exactly one result, unmatched
/// descriptions fall through to Personal Expense at 0.50 confidence.
pub fn classify(description: &str, amount: Decimal) -> Classification {
    let desc = description.to_lowercase();
    for (category, keywords) in RULES {
        if keywords.iter().any(|k| desc.contains(k)) {
            let deductible = match category {
                TaxCategory::Medical => amount > MEDICAL_DEDUCTIBLE_FLOOR,
                _ => true,
            };
            return Classification {
                category: *category,
                deductible,
                confidence: category.confidence(),
                form: category.form(),
            };
        }
    }
    Classification {
        category: TaxCategory::Personal,
        deductible: false,
        confidence: TaxCategory::Personal.confidence(),
        form: TaxCategory::Personal.form(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_keyword() {
        let c = classify("office supplies for the shop", dec!(42.00));
        assert_eq!(c.category, TaxCategory::Business);
        assert!(c.deductible);
        assert_eq!(c.confidence, 0.85);
        assert_eq!(c.form, "Schedule C");
    }

    #[test]
    fn test_priority_business_beats_medical() {
        let c = classify("business trip to the doctor", dec!(80));
        assert_eq!(c.category, TaxCategory::Business);
    }

    #[test]
    fn test_medical_deductible_above_floor() {
        let c = classify("doctor visit", dec!(100));
        assert_eq!(c.category, TaxCategory::Medical);
        assert!(c.deductible);
        assert_eq!(c.confidence, 0.90);
        assert_eq!(c.form, "Schedule A");
    }

    #[test]
    fn test_medical_not_deductible_below_floor() {
        let c = classify("doctor visit", dec!(0.01));
        assert_eq!(c.category, TaxCategory::Medical);
        assert!(!c.deductible);
    }

    #[test]
    fn test_medical_floor_is_strict() {
        assert!(!classify("pharmacy", dec!(0.075)).deductible);
        assert!(classify("pharmacy", dec!(0.076)).deductible);
    }

    #[test]
    fn test_default_is_personal() {
        let c = classify("grocery run", dec!(50));
        assert_eq!(c.category, TaxCategory::Personal);
        assert!(!c.deductible);
        assert_eq!(c.confidence, 0.50);
        assert_eq!(c.form, "Not applicable");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("DOCTOR VISIT", dec!(50)).category, TaxCategory::Medical);
        assert_eq!(classify("Church Tithe", dec!(50)).category, TaxCategory::Charitable);
    }

    #[test]
    fn test_remaining_categories() {
        let edu = classify("spring tuition payment", dec!(2500));
        assert_eq!(edu.category, TaxCategory::Education);
        assert!(edu.deductible);
        assert_eq!(edu.confidence, 0.80);
        assert_eq!(edu.form, "Form 8863");

        let charity = classify("food bank donation", dec!(75));
        assert_eq!(charity.category, TaxCategory::Charitable);
        assert_eq!(charity.confidence, 0.85);
        assert_eq!(charity.form, "Schedule A");

        let home = classify("monthly internet bill", dec!(60));
        assert_eq!(home.category, TaxCategory::HomeOffice);
        assert_eq!(home.confidence, 0.75);
        assert_eq!(home.form, "Form 8829");
    }

    #[test]
    fn test_negative_amounts_pass_through() {
        // A refund keeps its keyword category; medical lands under the floor.
        let biz = classify("client refund", dec!(-25));
        assert_eq!(biz.category, TaxCategory::Business);
        assert!(biz.deductible);

        let med = classify("pharmacy refund", dec!(-25));
        assert_eq!(med.category, TaxCategory::Medical);
        assert!(!med.deductible);
    }
}
