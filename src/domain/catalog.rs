use serde::{Deserialize, Serialize};

use super::TransactionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Expense => "EXPENSE",
            CategoryKind::Income => "INCOME",
        }
    }

    pub fn accepts(&self, kind: TransactionKind) -> bool {
        matches!(
            (self, kind),
            (CategoryKind::Expense, TransactionKind::Expense)
                | (CategoryKind::Income, TransactionKind::Income)
        )
    }
}

impl std::str::FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXPENSE" => Ok(CategoryKind::Expense),
            "INCOME" => Ok(CategoryKind::Income),
            _ => Err(format!("Invalid category kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: CategoryKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub kind: String,
}

/// Read-only household catalog used to bias extraction. Fetched once per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionCatalog {
    pub categories: Vec<Category>,
    pub accounts: Vec<Account>,
}

impl ExtractionCatalog {
    pub fn new(categories: Vec<Category>, accounts: Vec<Account>) -> Self {
        Self {
            categories,
            accounts,
        }
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn has_account(&self, id: &str) -> bool {
        self.accounts.iter().any(|a| a.id == id)
    }
}
