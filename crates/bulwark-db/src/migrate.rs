use std::path::{Path, PathBuf};

use crate::{DataStore, DbError};

/// Apply every `*.sql` file in `dir`, in lexical file-name order
///
/// Files are applied one at a time; the first failure stops the run.
/// Returns the names of the files that were applied.
///
/// # Errors
///
/// Returns [`DbError::MigrationDir`] if the directory cannot be listed and
/// [`DbError::Migration`] naming the file that failed to read or apply
pub async fn run_migrations(store: &dyn DataStore, dir: &Path) -> Result<Vec<String>, DbError> {
    tracing::info!(dir = %dir.display(), "looking for migrations");

    let files = migration_files(dir)?;
    if files.is_empty() {
        tracing::info!("no migrations found");
        return Ok(Vec::new());
    }

    let mut applied = Vec::with_capacity(files.len());
    for path in files {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let sql = std::fs::read_to_string(&path).map_err(|source| DbError::Migration {
            file: file.clone(),
            source: Box::new(DbError::MigrationFile {
                path: path.clone(),
                source,
            }),
        })?;

        tracing::info!(%file, "running migration");
        store.execute_script(&sql).await.map_err(|e| DbError::Migration {
            file: file.clone(),
            source: Box::new(e),
        })?;
        tracing::info!(%file, "finished migration");

        applied.push(file);
    }

    tracing::info!(count = applied.len(), "all migrations applied");
    Ok(applied)
}

fn migration_files(dir: &Path) -> Result<Vec<PathBuf>, DbError> {
    let entries = std::fs::read_dir(dir).map_err(|source| DbError::MigrationDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "sql"))
        .collect();
    files.sort();

    Ok(files)
}
