use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::services::export::{export_csv, export_file_name};
use crate::services::state::AppState;
use crate::utils::today;

pub enum ExportTarget {
    Stdout,
    File(PathBuf),
}

impl ExportTarget {
    /// `-` selects stdout; no path selects `invoices_<date>.csv` in the
    /// working directory.
    pub fn from_arg(output: Option<&Path>) -> Self {
        match output {
            Some(path) if path.as_os_str() == "-" => ExportTarget::Stdout,
            Some(path) => ExportTarget::File(path.to_path_buf()),
            None => ExportTarget::File(PathBuf::from(export_file_name(today()))),
        }
    }
}

/// Writes the CSV and returns the text that should be printed.
pub fn export_invoices(state: &AppState, target: &ExportTarget) -> Result<String> {
    let csv = export_csv(state.store.invoices(), today());
    match target {
        ExportTarget::Stdout => Ok(csv),
        ExportTarget::File(path) => {
            std::fs::write(path, csv.as_bytes())
                .with_context(|| format!("Write CSV to {}", path.display()))?;
            tracing::info!(path = %path.display(), rows = state.store.len(), "exported invoices");
            Ok(format!("Exported {} invoices to {}", state.store.len(), path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn export_writes_header_and_rows() {
        let state = AppState::new(Database::open_in_memory().unwrap()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let message = export_invoices(&state, &ExportTarget::File(path.clone())).unwrap();
        assert!(message.contains("Exported 10 invoices"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 11);
        assert!(written.starts_with("Invoice Number,Customer Name,"));
    }

    #[test]
    fn dash_selects_stdout() {
        assert!(matches!(
            ExportTarget::from_arg(Some(Path::new("-"))),
            ExportTarget::Stdout
        ));
        match ExportTarget::from_arg(None) {
            ExportTarget::File(path) => assert!(path.to_string_lossy().starts_with("invoices_")),
            ExportTarget::Stdout => panic!("expected a file target"),
        }
    }
}
