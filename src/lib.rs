pub mod commands;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;

pub use db::Database;
pub use models::{Invoice, InvoiceStatus, NewInvoice, SummaryStats};
pub use services::state::AppState;
pub use services::store::{InvoiceStore, StoreError};
