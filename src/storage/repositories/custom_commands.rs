/*!
 * 自定义命令Repository
 *
 * 处理公会自定义命令的持久化，复合主键为 (guild_id, name)
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use tracing::debug;

use crate::storage::database::DatabaseManager;
use crate::storage::error::{RepositoryError, RepositoryResult};

/// 自定义命令记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCommandRecord {
    /// 所属公会ID（复合主键之一）
    pub guild_id: String,
    /// 公会显示名称（冗余字段，仅用于审计和调试）
    pub guild_name: String,
    /// 命令名（小写，复合主键之一）
    pub name: String,
    /// 命令返回值，不做任何模板解析
    pub return_value: String,
    /// true 表示纯文本回复（适合图片链接和提及），false 表示嵌入式回复
    pub is_text_mode: bool,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl CustomCommandRecord {
    pub fn new(
        guild_id: impl Into<String>,
        guild_name: impl Into<String>,
        name: impl Into<String>,
        return_value: impl Into<String>,
        is_text_mode: bool,
    ) -> Self {
        Self {
            guild_id: guild_id.into(),
            guild_name: guild_name.into(),
            name: name.into(),
            return_value: return_value.into(),
            is_text_mode,
            created_at: Utc::now(),
        }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> RepositoryResult<Self> {
        Ok(Self {
            guild_id: row.try_get("guild_id")?,
            guild_name: row.try_get("guild_name")?,
            name: row.try_get("name")?,
            return_value: row.try_get("return_value")?,
            is_text_mode: row.try_get("is_text_mode")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// 自定义命令Repository
pub struct CustomCommands<'a> {
    db: &'a DatabaseManager,
}

impl<'a> CustomCommands<'a> {
    pub fn new(db: &'a DatabaseManager) -> Self {
        Self { db }
    }

    fn pool(&self) -> &sqlx::SqlitePool {
        self.db.pool()
    }

    /// 按复合主键查找命令记录
    pub async fn find(
        &self,
        guild_id: &str,
        name: &str,
    ) -> RepositoryResult<Option<CustomCommandRecord>> {
        let row = sqlx::query(
            "SELECT guild_id, guild_name, name, return_value, is_text_mode, created_at \
             FROM custom_commands WHERE guild_id = ? AND name = ? LIMIT 1",
        )
        .bind(guild_id)
        .bind(name)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(CustomCommandRecord::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// 插入新记录；复合主键冲突时返回 DuplicateKey
    pub async fn insert(&self, record: &CustomCommandRecord) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO custom_commands
                (guild_id, guild_name, name, return_value, is_text_mode, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.guild_id)
        .bind(&record.guild_name)
        .bind(&record.name)
        .bind(&record.return_value)
        .bind(record.is_text_mode)
        .bind(record.created_at)
        .bind(record.created_at)
        .execute(self.pool())
        .await
        .map_err(|e| RepositoryError::from_insert(e, &record.guild_id, &record.name))?;

        debug!("已插入自定义命令: {} {}", record.guild_id, record.name);
        Ok(())
    }

    /// 更新返回值；返回受影响的行数（记录不存在时为 0）
    pub async fn update_return_value(
        &self,
        guild_id: &str,
        name: &str,
        new_value: &str,
    ) -> RepositoryResult<u64> {
        let result = sqlx::query(
            "UPDATE custom_commands SET return_value = ?, updated_at = ? \
             WHERE guild_id = ? AND name = ?",
        )
        .bind(new_value)
        .bind(Utc::now())
        .bind(guild_id)
        .bind(name)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected())
    }

    /// 删除记录；返回受影响的行数（记录不存在时为 0）
    pub async fn delete(&self, guild_id: &str, name: &str) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM custom_commands WHERE guild_id = ? AND name = ?")
            .bind(guild_id)
            .bind(name)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }

    /// 列出公会的全部命令，按创建顺序排列
    pub async fn list_for_guild(
        &self,
        guild_id: &str,
    ) -> RepositoryResult<Vec<CustomCommandRecord>> {
        let rows = sqlx::query(
            "SELECT guild_id, guild_name, name, return_value, is_text_mode, created_at \
             FROM custom_commands WHERE guild_id = ? ORDER BY created_at, rowid",
        )
        .bind(guild_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(CustomCommandRecord::from_row).collect()
    }
}
