pub mod dashboard;
pub mod export;
pub mod invoices;
pub mod settings;
