// 🏷️ Account Categories - the closed set of eight ledger accounts
// Every node at every level carries exactly one bucket per category.

use serde::{Deserialize, Serialize};

// ============================================================================
// ACCOUNT CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountCategory {
    SalariesAndWages,
    EmployeeBenefits,
    TransportationAndCommunication,
    Services,
    SuppliesAndEquipment,
    TransferPayments,
    /// Usually negative amounts
    Recoveries,
    OtherTransactions,
}

impl AccountCategory {
    /// All categories in output order
    pub const ALL: [AccountCategory; 8] = [
        AccountCategory::SalariesAndWages,
        AccountCategory::EmployeeBenefits,
        AccountCategory::TransportationAndCommunication,
        AccountCategory::Services,
        AccountCategory::SuppliesAndEquipment,
        AccountCategory::TransferPayments,
        AccountCategory::Recoveries,
        AccountCategory::OtherTransactions,
    ];

    /// JSON key for this category
    pub fn key(&self) -> &'static str {
        match self {
            AccountCategory::SalariesAndWages => "salaries_and_wages",
            AccountCategory::EmployeeBenefits => "employee_benefits",
            AccountCategory::TransportationAndCommunication => "transportation_and_communication",
            AccountCategory::Services => "services",
            AccountCategory::SuppliesAndEquipment => "supplies_and_equipment",
            AccountCategory::TransferPayments => "transfer_payments",
            AccountCategory::Recoveries => "recoveries",
            AccountCategory::OtherTransactions => "other_transactions",
        }
    }

    /// Position in `ALL` (and in the node's bucket array)
    pub fn index(&self) -> usize {
        match self {
            AccountCategory::SalariesAndWages => 0,
            AccountCategory::EmployeeBenefits => 1,
            AccountCategory::TransportationAndCommunication => 2,
            AccountCategory::Services => 3,
            AccountCategory::SuppliesAndEquipment => 4,
            AccountCategory::TransferPayments => 5,
            AccountCategory::Recoveries => 6,
            AccountCategory::OtherTransactions => 7,
        }
    }

    /// Look up a category by its already-derived key
    pub fn from_key(key: &str) -> Option<AccountCategory> {
        AccountCategory::ALL.iter().copied().find(|c| c.key() == key)
    }

    /// Map a free-text account label to a category
    ///
    /// "Salaries and Wages" → salaries_and_wages → SalariesAndWages.
    /// Labels outside the fixed set return None and the caller drops the amount.
    pub fn from_label(label: &str) -> Option<AccountCategory> {
        AccountCategory::from_key(&derive_key(label))
    }
}

/// Lower-case the label and turn spaces into underscores.
/// Padding is kept, so "Services " becomes `services_` and matches nothing.
pub fn derive_key(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_all_categories() {
        let labels = [
            "Salaries and Wages",
            "Employee Benefits",
            "Transportation and Communication",
            "Services",
            "Supplies and Equipment",
            "Transfer Payments",
            "Recoveries",
            "Other Transactions",
        ];

        for (label, expected) in labels.iter().zip(AccountCategory::ALL.iter()) {
            assert_eq!(AccountCategory::from_label(label), Some(*expected));
        }
    }

    #[test]
    fn test_from_label_case_insensitive() {
        assert_eq!(
            AccountCategory::from_label("SALARIES AND WAGES"),
            Some(AccountCategory::SalariesAndWages)
        );
        assert_eq!(
            AccountCategory::from_label("services"),
            Some(AccountCategory::Services)
        );
    }

    #[test]
    fn test_padded_label_matches_nothing() {
        assert_eq!(derive_key("Services "), "services_");
        assert_eq!(AccountCategory::from_label("Services "), None);
        assert_eq!(AccountCategory::from_label(" Recoveries"), None);
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(AccountCategory::from_label("Capital Assets"), None);
        assert_eq!(AccountCategory::from_label(""), None);
        // Only spaces are replaced, hyphens stay
        assert_eq!(AccountCategory::from_label("Salaries-and-Wages"), None);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, category) in AccountCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_serde_uses_keys() {
        let json = serde_json::to_string(&AccountCategory::TransportationAndCommunication).unwrap();
        assert_eq!(json, "\"transportation_and_communication\"");
    }
}
