/*!
 * 命令注册模块
 *
 * 自定义命令的内存缓存、内置命令名保护和服务编排
 */

pub mod cache;
pub mod reserved;
pub mod service;

// 重新导出核心类型
pub use cache::{CacheStats, CommandCache, CommandReply};
pub use reserved::ReservedNames;
pub use service::{
    AddOutcome, CommandError, CommandResult, CommandService, EditOutcome, ReloadSummary,
};
