use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// Reading or writing a file outside the database (saves dir, JSON, config).
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A save that decodes but describes an impossible game.
    InvalidData(String),
    Config(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "SQLite error: {e}"),
            StoreError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            StoreError::InvalidData(msg) => write!(f, "invalid save data: {msg}"),
            StoreError::Config(msg) => write!(f, "bad config: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlite(e) => Some(e),
            StoreError::Io { source, .. } => Some(source),
            StoreError::InvalidData(_) | StoreError::Config(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
