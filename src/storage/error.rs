use std::path::PathBuf;

use sqlx::Error as SqlxError;
use thiserror::Error;

pub type DatabaseResult<T> = Result<T, DatabaseError>;
pub type StoragePathsResult<T> = Result<T, StoragePathsError>;
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] SqlxError),
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Database internal error: {0}")]
    Internal(String),
}

impl DatabaseError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        DatabaseError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DatabaseError::Internal(message.into())
    }
}

#[derive(Debug, Error)]
pub enum StoragePathsError {
    #[error("App directory is missing")]
    AppDirectoryMissing,
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to access directory {path}: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoragePathsError {
    pub fn directory_create(path: PathBuf, source: std::io::Error) -> Self {
        StoragePathsError::DirectoryCreate { path, source }
    }

    pub fn directory_access(path: PathBuf, source: std::io::Error) -> Self {
        StoragePathsError::DirectoryAccess { path, source }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// 复合主键冲突（guild_id + name 已存在）
    #[error("Duplicate key: {key}")]
    DuplicateKey { key: String },
    /// 持久层不可达或超时
    #[error("Store unavailable: {0}")]
    Unavailable(#[source] SqlxError),
}

impl RepositoryError {
    pub fn duplicate_key(guild_id: &str, name: &str) -> Self {
        RepositoryError::DuplicateKey {
            key: format!("{} {}", guild_id, name),
        }
    }

    /// 将插入失败映射为 Repository 错误，识别唯一约束冲突
    pub fn from_insert(error: SqlxError, guild_id: &str, name: &str) -> Self {
        if let SqlxError::Database(ref db) = error {
            if db.is_unique_violation() {
                return Self::duplicate_key(guild_id, name);
            }
        }
        RepositoryError::Unavailable(error)
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, RepositoryError::DuplicateKey { .. })
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(error: SqlxError) -> Self {
        RepositoryError::Unavailable(error)
    }
}
