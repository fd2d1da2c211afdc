use chrono::{DateTime, Utc};

use super::sales_model::{RecordScope, SaleRecord};
use crate::errors::Result;

/// Trait for the sales data source consumed by goal evaluation.
///
/// Implementations own tenant isolation: every record returned must belong
/// to `owner_id`. Results should be a consistent snapshot of the window.
pub trait SalesRepositoryTrait: Send + Sync {
    fn fetch_records_for_goal(
        &self,
        owner_id: &str,
        scope: &RecordScope,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<SaleRecord>>;
}
