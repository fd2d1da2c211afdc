//! Sales module - sale records and the repository contract that supplies them.

mod sales_model;
mod sales_traits;

pub use sales_model::{RecordScope, SaleRecord};
pub use sales_traits::SalesRepositoryTrait;
