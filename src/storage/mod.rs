/*!
 * 统一存储系统模块
 *
 * 基于 SQLite 的持久层：数据库管理器、内嵌建表脚本和命令 Repository
 * 提供统一的存储访问接口
 */

pub mod database;
pub mod error;
pub mod paths;
pub mod repositories;
pub mod schema;

// 重新导出核心类型和函数
pub use database::{DatabaseManager, DatabaseOptions, PoolSize};
pub use error::{DatabaseError, RepositoryError, StoragePathsError};
pub use paths::{StoragePaths, StoragePathsBuilder};
pub use repositories::{CustomCommandRecord, CustomCommands};

/// 存储目录名称
pub const DATA_DIR_NAME: &str = "data";

/// 数据库文件名称
pub const DATABASE_FILE_NAME: &str = "guild_commands.db";
