use anyhow::{Context, Result};
use std::path::Path;

use crate::db::Database;
use crate::models::Settings;
use crate::services::store::InvoiceStore;

/// Everything a command handler needs, owned by `main` and lent out per
/// command.
pub struct AppState {
    pub store: InvoiceStore,
    pub settings: Settings,
}

impl AppState {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Create data dir {}", parent.display()))?;
        }
        let db = Database::new(db_path).with_context(|| format!("Open database {}", db_path.display()))?;
        Self::new(db)
    }

    pub fn new(db: Database) -> Result<Self> {
        let settings = db.load_settings().context("Load settings")?;
        let store = InvoiceStore::open(db).context("Load invoices")?;
        Ok(AppState { store, settings })
    }

    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        self.store.db().save_settings(&settings).context("Save settings")?;
        self.settings = settings;
        tracing::info!(
            currency_symbol = %self.settings.currency_symbol,
            page_size = self.settings.page_size,
            default_payment_terms = self.settings.default_payment_terms,
            "settings updated"
        );
        Ok(())
    }
}
