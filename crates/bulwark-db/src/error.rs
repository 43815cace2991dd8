use std::path::PathBuf;

/// Errors from the data store and migration runner
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Connection or query failure reported by the driver
    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// Migration directory could not be read
    #[error("failed to read migrations from {}: {source}", path.display())]
    MigrationDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single migration file failed to load or apply
    #[error("migration {file} failed: {source}")]
    Migration {
        file: String,
        #[source]
        source: Box<DbError>,
    },

    /// Migration file could not be read
    #[error("failed to read {}: {source}", path.display())]
    MigrationFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
