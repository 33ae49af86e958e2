/*!
 * 内置命令名保护模块
 *
 * 进程级固定集合，启动时由宿主运行时注册的内置命令名填充。
 * 自定义命令永远不允许遮蔽内置命令
 */

use std::collections::HashSet;

/// 内置命令名集合（大小写不敏感）
#[derive(Debug, Clone, Default)]
pub struct ReservedNames {
    names: HashSet<String>,
}

impl ReservedNames {
    /// 从宿主运行时的内置命令名构建集合，名称统一转为小写
    pub fn new<I, S>(builtins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: builtins
                .into_iter()
                .map(|name| name.into().to_lowercase())
                .collect(),
        }
    }

    /// 判断命令名是否为内置命令（大小写不敏感）
    pub fn is_reserved(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_case_insensitive() {
        let reserved = ReservedNames::new(["Help", "about"]);

        assert!(reserved.is_reserved("help"));
        assert!(reserved.is_reserved("HELP"));
        assert!(reserved.is_reserved("About"));
        assert!(!reserved.is_reserved("potato"));
    }

    #[test]
    fn empty_set_reserves_nothing() {
        let reserved = ReservedNames::default();

        assert!(reserved.is_empty());
        assert!(!reserved.is_reserved("help"));
    }
}
