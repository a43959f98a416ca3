use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("import directory does not exist: {}", .0.display())]
    ImportDirNotFound(PathBuf),

    #[error("album database schema v{db} is newer than this build (v{code})")]
    SchemaTooNew { db: u32, code: u32 },
}

/// Failures of user-directory operations. The `Display` text is meant to be
/// shown to the user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid Master Key")]
    InvalidMasterKey,

    #[error("Admin privileges required")]
    AdminRequired,
}

/// Returned when a string does not name a known photo size, theme or grid
/// density.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} `{value}` (expected one of: {expected})")]
pub struct ParseValueError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

pub type Result<T> = std::result::Result<T, Error>;
