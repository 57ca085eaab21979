use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};
use std::path::Path;

use crate::models::Settings;

pub const INVOICES_SLOT: &str = "invoices";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(db_path: impl AsRef<Path>) -> SqlResult<Self> {
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> SqlResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> SqlResult<Self> {
        let mut db = Database { conn };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&mut self) -> SqlResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL
            );",
        )?;

        let migrations = [
            (
                "001_create_storage.sql",
                include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations/001_create_storage.sql")),
            ),
            (
                "002_create_settings.sql",
                include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations/002_create_settings.sql")),
            ),
        ];

        for (name, sql) in migrations {
            let applied: Option<String> = self
                .conn
                .query_row(
                    "SELECT name FROM schema_migrations WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;

            if applied.is_none() {
                let tx = self.conn.transaction()?;
                tx.execute_batch(sql)?;
                tx.execute(
                    "INSERT INTO schema_migrations (name, applied_at) VALUES (?1, datetime('now'))",
                    params![name],
                )?;
                tx.commit()?;
                tracing::debug!(migration = name, "applied migration");
            }
        }

        Ok(())
    }

    /// Reads one storage slot verbatim.
    pub fn get_slot(&self, key: &str) -> SqlResult<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM storage WHERE key = ?1")?;
        stmt.query_row(params![key], |row| row.get(0)).optional()
    }

    /// Replaces the whole content of a storage slot.
    pub fn set_slot(&self, key: &str, value: &str) -> SqlResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO storage (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn set_setting(&self, key: &str, value: &str) -> SqlResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> SqlResult<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
        stmt.query_row(params![key], |row| row.get(0)).optional()
    }

    pub fn load_settings(&self) -> SqlResult<Settings> {
        let defaults = Settings::default();
        let currency_symbol = self
            .get_setting("currency_symbol")?
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.currency_symbol);
        let page_size = self
            .get_setting("page_size")?
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(defaults.page_size);
        let default_payment_terms = self
            .get_setting("default_payment_terms")?
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(defaults.default_payment_terms);

        Ok(Settings {
            currency_symbol,
            page_size,
            default_payment_terms,
        })
    }

    pub fn save_settings(&self, settings: &Settings) -> SqlResult<()> {
        self.set_setting("currency_symbol", &settings.currency_symbol)?;
        self.set_setting("page_size", &settings.page_size.to_string())?;
        self.set_setting(
            "default_payment_terms",
            &settings.default_payment_terms.to_string(),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_roundtrip_replaces_previous_value() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_slot(INVOICES_SLOT).unwrap(), None);

        db.set_slot(INVOICES_SLOT, "[]").unwrap();
        db.set_slot(INVOICES_SLOT, "[1]").unwrap();
        assert_eq!(db.get_slot(INVOICES_SLOT).unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn settings_fall_back_to_defaults() {
        let db = Database::open_in_memory().unwrap();
        db.set_setting("page_size", "zero").unwrap();

        let settings = db.load_settings().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn settings_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        let settings = Settings {
            currency_symbol: "EUR".to_string(),
            page_size: 10,
            default_payment_terms: 45,
        };
        db.save_settings(&settings).unwrap();
        assert_eq!(db.load_settings().unwrap(), settings);
    }

    #[test]
    fn migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.sqlite");
        {
            let db = Database::new(&path).unwrap();
            db.set_slot(INVOICES_SLOT, "[]").unwrap();
        }
        let db = Database::new(&path).unwrap();
        assert_eq!(db.get_slot(INVOICES_SLOT).unwrap().as_deref(), Some("[]"));
    }
}
