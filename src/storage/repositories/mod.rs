/*!
 * 数据访问模块 - 每个表一个简单的结构体，直接使用 sqlx
 *
 * 设计原则：
 * - 无抽象层：直接使用 sqlx，没有 Repository trait
 * - 单一职责：每个结构体对应一张表
 * - 借用优先：使用 &DatabaseManager 而非 Arc
 */

pub mod custom_commands;

pub use custom_commands::{CustomCommandRecord, CustomCommands};
