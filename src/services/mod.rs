pub mod export;
pub mod listing;
pub mod sample;
pub mod state;
pub mod status;
pub mod store;
pub mod validation;
