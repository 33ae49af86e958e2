/*!
 * 内嵌SQL脚本模块
 *
 * 建表语句直接内嵌在代码中，按顺序执行，不依赖运行时的外部SQL文件
 */

/// 单个SQL脚本：名称 + 按顺序执行的语句
#[derive(Debug, Clone, Copy)]
pub struct SqlScript {
    pub name: &'static str,
    pub statements: &'static [&'static str],
}

/// 自定义命令表，复合主键为 (guild_id, name)
const CREATE_CUSTOM_COMMANDS: &str = r#"
CREATE TABLE IF NOT EXISTS custom_commands (
    guild_id     TEXT NOT NULL,
    guild_name   TEXT NOT NULL,
    name         TEXT NOT NULL,
    return_value TEXT NOT NULL,
    is_text_mode INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    PRIMARY KEY (guild_id, name)
)
"#;

const CREATE_GUILD_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_custom_commands_guild ON custom_commands (guild_id)";

/// 按执行顺序排列的全部脚本
pub const SCRIPTS: &[SqlScript] = &[SqlScript {
    name: "01_custom_commands",
    statements: &[CREATE_CUSTOM_COMMANDS, CREATE_GUILD_INDEX],
}];
