//! 公会自定义命令注册中心
//!
//! 基于 SQLite 的公会（guild）级自定义命令存储与内存缓存实现。
//! 主要功能包括：
//! - 自定义命令的增删改查（add/edit/remove/list/lookup）
//! - 内存缓存与持久层的一致性维护
//! - 内置命令名保护与全量缓存重建（reload）

// 模块声明
pub mod registry; // 命令注册与缓存模块
pub mod storage; // 统一存储系统模块
pub mod utils; // 工具和日志模块

pub use registry::{
    AddOutcome, CacheStats, CommandCache, CommandError, CommandReply, CommandResult,
    CommandService, EditOutcome, ReloadSummary, ReservedNames,
};
pub use storage::{
    CustomCommandRecord, CustomCommands, DatabaseManager, DatabaseOptions, StoragePaths,
    StoragePathsBuilder,
};
