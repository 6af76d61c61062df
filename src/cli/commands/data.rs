//! Export, import and clear.

use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use colored::Colorize;
use serde_json::json;

use crate::cli::args::{ExportFormat, OutputFormat};
use crate::error::DeepWorkError;
use crate::features::session::SessionStore;
use crate::features::transfer::{
    default_backup_name, default_csv_name, import_into, sessions_to_csv, Backup,
};
use crate::output::to_json;
use crate::storage::KeyValueStore;

fn with_path(path: &Path, e: &std::io::Error) -> DeepWorkError {
    DeepWorkError::Io(std::io::Error::new(
        e.kind(),
        format!("{}: {e}", path.display()),
    ))
}

/// Write the history to a file.
///
/// Without `file`, a dated default name inside `directory` is used. An empty
/// history writes nothing.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn export<K: KeyValueStore>(
    store: &SessionStore<K>,
    kind: ExportFormat,
    file: Option<PathBuf>,
    directory: &Path,
    format: OutputFormat,
) -> Result<String, DeepWorkError> {
    if store.is_empty() {
        return match format {
            OutputFormat::Pretty => Ok("No sessions to export".to_string()),
            OutputFormat::Json => to_json(&json!({ "exported": 0, "path": null })),
        };
    }

    let today = Local::now().date_naive();
    let (contents, default_name) = match kind {
        ExportFormat::Csv => (sessions_to_csv(store.sessions()), default_csv_name(today)),
        ExportFormat::Json => (
            Backup::new(store.sessions(), Utc::now()).to_json()?,
            default_backup_name(today),
        ),
    };

    let path = file.unwrap_or_else(|| directory.join(default_name));
    std::fs::write(&path, contents).map_err(|e| with_path(&path, &e))?;
    tracing::info!(path = %path.display(), count = store.len(), "exported history");

    match format {
        OutputFormat::Pretty => Ok(format!(
            "{} Exported {} sessions to {}",
            "✓".green(),
            store.len(),
            path.display()
        )),
        OutputFormat::Json => to_json(&json!({ "exported": store.len(), "path": path })),
    }
}

/// Replace the history with the sessions in a backup file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, fails validation, or the new
/// history cannot be saved. The history is unchanged in every case.
pub fn import<K: KeyValueStore>(
    store: &mut SessionStore<K>,
    file: &Path,
    format: OutputFormat,
) -> Result<String, DeepWorkError> {
    let contents = std::fs::read_to_string(file).map_err(|e| with_path(file, &e))?;
    let count = import_into(store, &contents)?;

    match format {
        OutputFormat::Pretty => Ok(format!(
            "{} Imported {count} sessions from {}",
            "✓".green(),
            file.display()
        )),
        OutputFormat::Json => to_json(&json!({ "imported": count, "path": file })),
    }
}

/// Delete all history.
///
/// # Errors
///
/// Returns an error without `force`, or if the history cannot be removed.
pub fn clear<K: KeyValueStore>(
    store: &mut SessionStore<K>,
    force: bool,
    format: OutputFormat,
) -> Result<String, DeepWorkError> {
    if !force {
        return Err(DeepWorkError::Validation(format!(
            "This will delete all {} sessions.\nUse --force to confirm.",
            store.len()
        )));
    }

    let removed = store.len();
    store.clear()?;

    match format {
        OutputFormat::Pretty => Ok(format!("Session history cleared ({removed} removed).")),
        OutputFormat::Json => to_json(&json!({ "cleared": removed })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::session::{Session, DEFAULT_STORAGE_KEY};
    use crate::storage::MemoryKv;
    use tempfile::TempDir;

    fn session(id: i64) -> Session {
        Session {
            id,
            duration_seconds: 90,
            distractions: vec![],
            ended_at: "2024-03-01T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_export_empty_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let kv = MemoryKv::new();
        let store = SessionStore::load(&kv, DEFAULT_STORAGE_KEY);

        let out = export(&store, ExportFormat::Csv, None, dir.path(), OutputFormat::Pretty).unwrap();
        assert_eq!(out, "No sessions to export");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_csv_default_name() {
        let dir = TempDir::new().unwrap();
        let kv = MemoryKv::new();
        let mut store = SessionStore::load(&kv, DEFAULT_STORAGE_KEY);
        store.record_session(session(1)).unwrap();

        export(&store, ExportFormat::Csv, None, dir.path(), OutputFormat::Json).unwrap();

        let expected = dir.path().join(default_csv_name(Local::now().date_naive()));
        let csv = std::fs::read_to_string(expected).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("\"1.5\",\"01:30\""));
    }

    #[test]
    fn test_export_then_import_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup.json");

        let source = MemoryKv::new();
        let mut store = SessionStore::load(&source, DEFAULT_STORAGE_KEY);
        store.record_session(session(1)).unwrap();
        store.record_session(session(2)).unwrap();
        export(&store, ExportFormat::Json, Some(path.clone()), dir.path(), OutputFormat::Pretty)
            .unwrap();

        let target = MemoryKv::new();
        let mut restored = SessionStore::load(&target, DEFAULT_STORAGE_KEY);
        let out = import(&mut restored, &path, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["imported"], 2);
        assert_eq!(restored.sessions(), store.sessions());
    }

    #[test]
    fn test_import_missing_file() {
        let kv = MemoryKv::new();
        let mut store = SessionStore::load(&kv, DEFAULT_STORAGE_KEY);
        let err = import(&mut store, Path::new("/nonexistent/backup.json"), OutputFormat::Pretty)
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/backup.json"));
    }

    #[test]
    fn test_clear_requires_force() {
        let kv = MemoryKv::new();
        let mut store = SessionStore::load(&kv, DEFAULT_STORAGE_KEY);
        store.record_session(session(1)).unwrap();

        assert!(matches!(
            clear(&mut store, false, OutputFormat::Pretty),
            Err(DeepWorkError::Validation(_))
        ));
        assert_eq!(store.len(), 1);

        clear(&mut store, true, OutputFormat::Pretty).unwrap();
        assert!(store.is_empty());
    }
}
