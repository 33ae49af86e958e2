/*!
 * 命令服务模块
 *
 * 编排自定义命令的全部操作，维护缓存与持久层的一致性：
 * 写操作先写库再更新缓存（remove 除外，见 remove 的说明），读操作只走缓存。
 *
 * 一致性说明：写库和写缓存不是跨两个存储的原子操作，允许的陈旧窗口
 * 以单次请求为界。库中已有记录而缓存未同步时，add/edit 通过读回库中
 * 记录完成对账，不向调用方暴露 DuplicateKey
 */

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::registry::cache::{CommandCache, CommandReply};
use crate::registry::reserved::ReservedNames;
use crate::storage::database::DatabaseManager;
use crate::storage::error::RepositoryError;
use crate::storage::repositories::{CustomCommandRecord, CustomCommands};

pub type CommandResult<T> = Result<T, CommandError>;

/// 命令服务错误
#[derive(Debug, Error)]
pub enum CommandError {
    /// 命令名与内置命令冲突
    #[error("Command `{name}` is a built-in command")]
    ReservedName { name: String },
    /// 命令已存在；携带当前返回值，便于调用方提示改用 edit
    #[error("Command `{name}` already exists with value `{existing}`")]
    AlreadyExists { name: String, existing: String },
    /// 命令不存在
    #[error("Command `{name}` does not exist")]
    NotFound { name: String },
    /// 持久层不可用
    #[error("Store unavailable: {0}")]
    Store(#[from] RepositoryError),
    /// 全量重建中途失败，completed 为已完成的公会
    #[error("Cache reload incomplete, {} guild(s) completed", .completed.len())]
    ReloadIncomplete {
        completed: Vec<String>,
        #[source]
        source: RepositoryError,
    },
}

/// add 操作结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// 新建命令
    Created(CommandReply),
    /// 库中已有记录，采用库中的值（缓存此前未同步）
    Adopted(CommandReply),
}

impl AddOutcome {
    pub fn reply(&self) -> &CommandReply {
        match self {
            AddOutcome::Created(reply) | AddOutcome::Adopted(reply) => reply,
        }
    }
}

/// edit 操作结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// 更新已有命令
    Updated(CommandReply),
    /// 命令此前不存在，作为新命令创建
    Created(CommandReply),
}

impl EditOutcome {
    pub fn reply(&self) -> &CommandReply {
        match self {
            EditOutcome::Updated(reply) | EditOutcome::Created(reply) => reply,
        }
    }
}

/// reload 操作统计
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReloadSummary {
    pub guilds: usize,
    pub commands: usize,
}

/// 命令服务
///
/// 持有数据库管理器、命令缓存和内置命令名集合。
/// 调用方的权限校验由外部协作方在调用前完成
pub struct CommandService {
    db: Arc<DatabaseManager>,
    cache: CommandCache,
    reserved: Arc<ReservedNames>,
}

impl CommandService {
    /// 创建命令服务；数据库应已完成 initialize
    pub fn new(db: Arc<DatabaseManager>, reserved: Arc<ReservedNames>) -> Self {
        Self {
            db,
            cache: CommandCache::new(),
            reserved,
        }
    }

    fn repo(&self) -> CustomCommands<'_> {
        CustomCommands::new(&self.db)
    }

    /// 添加自定义命令
    ///
    /// 库中已有同名记录而缓存未同步时，采用库中的值而不报错（AddOutcome::Adopted）
    pub async fn add(
        &self,
        guild_id: &str,
        guild_name: &str,
        name: &str,
        return_value: &str,
        is_text_mode: bool,
    ) -> CommandResult<AddOutcome> {
        let name = name.to_lowercase();

        if self.reserved.is_reserved(&name) {
            return Err(CommandError::ReservedName { name });
        }

        if let Some(existing) = self.cache.get(guild_id, &name).await {
            return Err(CommandError::AlreadyExists {
                name,
                existing: existing.return_value,
            });
        }

        let record =
            CustomCommandRecord::new(guild_id, guild_name, &name, return_value, is_text_mode);
        let outcome = match self.repo().insert(&record).await {
            Ok(()) => AddOutcome::Created(CommandReply::new(return_value, is_text_mode)),
            Err(e) if e.is_duplicate_key() => match self.repo().find(guild_id, &name).await? {
                Some(existing) => {
                    debug!("命令已存在于库中，采用库中的值: {} {}", guild_id, name);
                    AddOutcome::Adopted(CommandReply::new(
                        existing.return_value,
                        existing.is_text_mode,
                    ))
                }
                None => {
                    warn!("插入冲突后记录已消失，保留请求值: {} {}", guild_id, name);
                    AddOutcome::Created(CommandReply::new(return_value, is_text_mode))
                }
            },
            Err(e) => return Err(e.into()),
        };

        self.cache.put(guild_id, &name, outcome.reply().clone()).await;
        info!("已添加自定义命令: {} {}", guild_id, name);
        Ok(outcome)
    }

    /// 编辑命令的返回值；命令不存在时等同于新建（is_text_mode 默认为 false）
    ///
    /// 更新保留原有的展示模式
    pub async fn edit(
        &self,
        guild_id: &str,
        guild_name: &str,
        name: &str,
        new_return_value: &str,
    ) -> CommandResult<EditOutcome> {
        let name = name.to_lowercase();

        if let Some(existing) = self.cache.get(guild_id, &name).await {
            let affected = self
                .repo()
                .update_return_value(guild_id, &name, new_return_value)
                .await?;
            if affected == 0 {
                warn!("编辑时库中无对应记录: {} {}", guild_id, name);
            }

            let reply = CommandReply::new(new_return_value, existing.is_text_mode);
            self.cache.put(guild_id, &name, reply.clone()).await;
            info!("已编辑自定义命令: {} {}", guild_id, name);
            return Ok(EditOutcome::Updated(reply));
        }

        let record = CustomCommandRecord::new(guild_id, guild_name, &name, new_return_value, false);
        let outcome = match self.repo().insert(&record).await {
            Ok(()) => EditOutcome::Created(CommandReply::new(new_return_value, false)),
            Err(e) if e.is_duplicate_key() => {
                // 缓存未同步但库中已有记录：改为更新，并沿用库中的展示模式
                self.repo()
                    .update_return_value(guild_id, &name, new_return_value)
                    .await?;
                let mode = self
                    .repo()
                    .find(guild_id, &name)
                    .await?
                    .map(|r| r.is_text_mode)
                    .unwrap_or(false);
                EditOutcome::Updated(CommandReply::new(new_return_value, mode))
            }
            Err(e) => return Err(e.into()),
        };

        self.cache.put(guild_id, &name, outcome.reply().clone()).await;
        info!("已通过 edit 新建自定义命令: {} {}", guild_id, name);
        Ok(outcome)
    }

    /// 移除命令
    ///
    /// 刻意先删缓存再删库：调用方得到成功答复后，本进程不会再命中该命令。
    /// 若随后的持久删除失败，只记录日志交由外部对账，不回滚缓存——
    /// 让刚被删除的命令重新出现是更坏的结果
    pub async fn remove(&self, guild_id: &str, name: &str) -> CommandResult<()> {
        let name = name.to_lowercase();

        if self.cache.get(guild_id, &name).await.is_none() {
            return Err(CommandError::NotFound { name });
        }

        self.cache.remove(guild_id, &name).await;

        match self.repo().delete(guild_id, &name).await {
            Ok(0) => warn!("移除时库中无对应记录: {} {}", guild_id, name),
            Ok(_) => debug!("已从库中删除自定义命令: {} {}", guild_id, name),
            Err(e) => error!(
                "缓存已移除但持久删除失败，待外部对账: {} {}: {}",
                guild_id, name, e
            ),
        }

        info!("已移除自定义命令: {} {}", guild_id, name);
        Ok(())
    }

    /// 按添加顺序列出公会的全部命令名
    pub async fn list(&self, guild_id: &str) -> Vec<String> {
        self.cache.list_names(guild_id).await
    }

    /// 查找命令，供消息分发路径判断是否命中自定义命令
    pub async fn lookup(&self, guild_id: &str, name: &str) -> Option<CommandReply> {
        self.cache.get(guild_id, &name.to_lowercase()).await
    }

    /// 全量重建缓存
    ///
    /// 先清空再逐公会回填；中途持久层失败时缓存处于部分回填状态，
    /// 返回 ReloadIncomplete 并列出已完成的公会
    pub async fn reload<I, S>(&self, guild_ids: I) -> CommandResult<ReloadSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cache.reset_all().await;

        let mut completed = Vec::new();
        let mut commands = 0usize;

        for guild_id in guild_ids {
            let guild_id = guild_id.as_ref();
            let records = match self.repo().list_for_guild(guild_id).await {
                Ok(records) => records,
                Err(source) => {
                    error!("全量重建中途失败: {}: {}", guild_id, source);
                    return Err(CommandError::ReloadIncomplete { completed, source });
                }
            };

            for record in records {
                self.cache
                    .put(
                        guild_id,
                        &record.name.to_lowercase(),
                        CommandReply::new(record.return_value, record.is_text_mode),
                    )
                    .await;
                commands += 1;
            }
            completed.push(guild_id.to_string());
        }

        let summary = ReloadSummary {
            guilds: completed.len(),
            commands,
        };
        info!(
            "命令缓存重建完成: {} 个公会, {} 条命令",
            summary.guilds, summary.commands
        );
        Ok(summary)
    }

    /// 获取命令缓存的引用
    pub fn cache(&self) -> &CommandCache {
        &self.cache
    }

    /// 获取数据库管理器的引用
    pub fn database(&self) -> Arc<DatabaseManager> {
        self.db.clone()
    }

    /// 获取内置命令名集合的引用
    pub fn reserved(&self) -> &ReservedNames {
        &self.reserved
    }
}
