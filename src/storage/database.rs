use crate::storage::error::{DatabaseError, DatabaseResult};
use crate::storage::paths::StoragePaths;
use crate::storage::schema;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{ConnectOptions, Executor};
use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum PoolSize {
    Fixed(NonZeroU32),
    Adaptive { min: NonZeroU32, max: NonZeroU32 },
}

impl PoolSize {
    fn resolve(&self) -> (NonZeroU32, NonZeroU32) {
        match self {
            PoolSize::Fixed(size) => (*size, *size),
            PoolSize::Adaptive { min, max } => {
                let cpu = std::thread::available_parallelism()
                    .map(|n| n.get() as u32)
                    .unwrap_or(4);
                let suggested = (cpu * 2).clamp(min.get(), max.get());
                (*min, NonZeroU32::new(suggested).unwrap())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub pool_size: PoolSize,
    pub connection_timeout: Duration,
    pub statement_timeout: Duration,
    pub wal: bool,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            pool_size: PoolSize::Adaptive {
                min: NonZeroU32::new(4).unwrap(),
                max: NonZeroU32::new(32).unwrap(),
            },
            connection_timeout: Duration::from_secs(10),
            statement_timeout: Duration::from_secs(30),
            wal: true,
        }
    }
}

pub struct DatabaseManager {
    pool: SqlitePool,
    paths: StoragePaths,
    options: DatabaseOptions,
}

impl fmt::Debug for DatabaseManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseManager")
            .field("paths", &self.paths)
            .field("options", &self.options)
            .finish()
    }
}

impl DatabaseManager {
    pub async fn new(paths: StoragePaths, options: DatabaseOptions) -> DatabaseResult<Self> {
        let db_path = paths.database_file();
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DatabaseError::io(format!("创建数据库目录 {}", parent.display()), e)
            })?;
        }

        let (min_conn, max_conn) = options.pool_size.resolve();

        let connect_options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(if options.wal {
                SqliteJournalMode::Wal
            } else {
                SqliteJournalMode::Delete
            })
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(options.statement_timeout)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .min_connections(min_conn.get())
            .max_connections(max_conn.get())
            .acquire_timeout(options.connection_timeout)
            .idle_timeout(Some(Duration::from_secs(30)))
            .max_lifetime(Some(Duration::from_secs(60 * 15)))
            .connect_with(connect_options)
            .await?;

        debug!("SQLite连接池已建立: {}", db_path.display());

        Ok(Self {
            pool,
            paths,
            options,
        })
    }

    /// 初始化数据库：开启外键并执行内嵌建表脚本
    pub async fn initialize(&self) -> DatabaseResult<()> {
        self.pool.execute("PRAGMA foreign_keys = ON").await?;

        for script in schema::SCRIPTS {
            debug!("执行SQL脚本: {}", script.name);
            for statement in script.statements {
                sqlx::query(statement).execute(&self.pool).await?;
            }
        }

        info!("数据库初始化完成: {}", self.paths.database_file().display());
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn options(&self) -> &DatabaseOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::paths::StoragePathsBuilder;
    use tempfile::TempDir;

    async fn create_manager(temp_dir: &TempDir) -> DatabaseManager {
        let paths = StoragePathsBuilder::new()
            .app_dir(temp_dir.path().to_path_buf())
            .build()
            .unwrap();

        DatabaseManager::new(paths, DatabaseOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn initialize_creates_schema() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_manager(&temp_dir).await;
        manager.initialize().await.unwrap();

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'custom_commands'",
        )
        .fetch_one(manager.pool())
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_manager(&temp_dir).await;
        manager.initialize().await.unwrap();
        manager.initialize().await.unwrap();
    }
}
