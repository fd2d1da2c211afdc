//! Sales domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single sale line, already scoped to one seller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub date: DateTime<Utc>,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub quantity: i64,
    pub sku: String,
    pub category: String,
}

impl SaleRecord {
    pub fn profit(&self) -> Decimal {
        self.revenue - self.cost
    }
}

/// The subset of sale records a goal applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordScope {
    All,
    Category(String),
    Sku(String),
}

impl RecordScope {
    /// Exact, case-sensitive match against the record's category or SKU.
    pub fn matches(&self, record: &SaleRecord) -> bool {
        match self {
            RecordScope::All => true,
            RecordScope::Category(category) => record.category == *category,
            RecordScope::Sku(sku) => record.sku == *sku,
        }
    }
}
