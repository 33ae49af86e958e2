/*!
 * 命令缓存模块
 *
 * 读多写少的内存缓存：外层按公会分组，内层为命令名到回复内容的映射。
 * 写入顺序被保留，list_names 按添加顺序返回命令名
 */

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 命令回复内容
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReply {
    pub return_value: String,
    /// true 表示纯文本回复，false 表示嵌入式回复
    pub is_text_mode: bool,
}

impl CommandReply {
    pub fn new(return_value: impl Into<String>, is_text_mode: bool) -> Self {
        Self {
            return_value: return_value.into(),
            is_text_mode,
        }
    }
}

/// 单个公会的命令表
///
/// entries 提供查找，order 记录插入顺序供列表展示
#[derive(Debug, Default)]
struct GuildCommands {
    entries: HashMap<String, CommandReply>,
    order: Vec<String>,
}

impl GuildCommands {
    fn put(&mut self, name: String, reply: CommandReply) {
        if !self.entries.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.entries.insert(name, reply);
    }

    fn remove(&mut self, name: &str) -> bool {
        if self.entries.remove(name).is_some() {
            self.order.retain(|n| n != name);
            true
        } else {
            false
        }
    }
}

/// 命令缓存
#[derive(Clone)]
pub struct CommandCache {
    data: Arc<RwLock<HashMap<String, GuildCommands>>>,
}

impl CommandCache {
    /// 创建新的缓存实例
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 查找命令
    pub async fn get(&self, guild_id: &str, name: &str) -> Option<CommandReply> {
        self.data
            .read()
            .await
            .get(guild_id)
            .and_then(|guild| guild.entries.get(name))
            .cloned()
    }

    /// 写入命令（幂等更新，公会条目不存在时自动创建）
    pub async fn put(&self, guild_id: &str, name: &str, reply: CommandReply) {
        let mut data = self.data.write().await;
        data.entry(guild_id.to_string())
            .or_default()
            .put(name.to_string(), reply);
    }

    /// 移除命令；命令不存在时为空操作
    pub async fn remove(&self, guild_id: &str, name: &str) -> bool {
        let mut data = self.data.write().await;
        data.get_mut(guild_id)
            .map(|guild| guild.remove(name))
            .unwrap_or(false)
    }

    /// 按添加顺序列出公会的全部命令名
    pub async fn list_names(&self, guild_id: &str) -> Vec<String> {
        self.data
            .read()
            .await
            .get(guild_id)
            .map(|guild| guild.order.clone())
            .unwrap_or_default()
    }

    /// 清空全部公会条目（仅作为全量重建的第一步使用）
    pub async fn reset_all(&self) {
        self.data.write().await.clear();
    }

    /// 获取缓存统计信息
    pub async fn stats(&self) -> CacheStats {
        let data = self.data.read().await;
        CacheStats {
            guild_count: data.len(),
            command_count: data.values().map(|guild| guild.entries.len()).sum(),
        }
    }
}

impl Default for CommandCache {
    fn default() -> Self {
        Self::new()
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub guild_count: usize,
    pub command_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get() {
        let cache = CommandCache::new();
        cache.put("g1", "potato", CommandReply::new("hi", false)).await;

        assert_eq!(
            cache.get("g1", "potato").await,
            Some(CommandReply::new("hi", false))
        );
        assert_eq!(cache.get("g2", "potato").await, None);
    }

    #[tokio::test]
    async fn overwrite_keeps_insertion_order() {
        let cache = CommandCache::new();
        cache.put("g1", "a", CommandReply::new("1", false)).await;
        cache.put("g1", "b", CommandReply::new("2", false)).await;
        cache.put("g1", "a", CommandReply::new("3", true)).await;

        assert_eq!(cache.list_names("g1").await, vec!["a", "b"]);
        assert_eq!(
            cache.get("g1", "a").await,
            Some(CommandReply::new("3", true))
        );
    }

    #[tokio::test]
    async fn remove_updates_order() {
        let cache = CommandCache::new();
        cache.put("g1", "a", CommandReply::new("1", false)).await;
        cache.put("g1", "b", CommandReply::new("2", false)).await;

        assert!(cache.remove("g1", "a").await);
        assert!(!cache.remove("g1", "a").await);
        assert_eq!(cache.list_names("g1").await, vec!["b"]);
    }

    #[tokio::test]
    async fn reset_all_clears_every_guild() {
        let cache = CommandCache::new();
        cache.put("g1", "a", CommandReply::new("1", false)).await;
        cache.put("g2", "b", CommandReply::new("2", false)).await;

        cache.reset_all().await;

        let stats = cache.stats().await;
        assert_eq!(stats.guild_count, 0);
        assert_eq!(stats.command_count, 0);
    }
}
