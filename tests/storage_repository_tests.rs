/*!
 * 自定义命令Repository集成测试
 *
 * 测试数据库管理器与 custom_commands 表的数据访问逻辑
 */

use tempfile::TempDir;

use guild_commands::storage::{
    database::{DatabaseManager, DatabaseOptions},
    paths::StoragePathsBuilder,
    repositories::{CustomCommandRecord, CustomCommands},
};

/// 创建测试用的数据库管理器
async fn create_test_database() -> (DatabaseManager, TempDir) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let paths = StoragePathsBuilder::new()
        .app_dir(temp_dir.path().to_path_buf())
        .build()
        .expect("创建存储路径失败");

    let manager = DatabaseManager::new(paths, DatabaseOptions::default())
        .await
        .expect("创建数据库管理器失败");

    manager.initialize().await.expect("初始化数据库失败");

    (manager, temp_dir)
}

fn potato_record() -> CustomCommandRecord {
    CustomCommandRecord::new("g1", "Guild1", "potato", "I am a potato", false)
}

#[tokio::test]
async fn insert_then_find_roundtrip() {
    let (db, _temp_dir) = create_test_database().await;
    let repo = CustomCommands::new(&db);

    repo.insert(&potato_record()).await.expect("插入记录失败");

    let found = repo
        .find("g1", "potato")
        .await
        .expect("查找记录失败")
        .expect("记录应当存在");
    assert_eq!(found.guild_name, "Guild1");
    assert_eq!(found.return_value, "I am a potato");
    assert!(!found.is_text_mode);

    assert!(repo
        .find("g1", "carrot")
        .await
        .expect("查找记录失败")
        .is_none());
}

#[tokio::test]
async fn duplicate_insert_reports_duplicate_key() {
    let (db, _temp_dir) = create_test_database().await;
    let repo = CustomCommands::new(&db);

    repo.insert(&potato_record()).await.expect("插入记录失败");

    let err = repo
        .insert(&potato_record())
        .await
        .expect_err("重复插入应当失败");
    assert!(err.is_duplicate_key());

    // 同名命令在不同公会下互不冲突
    let other_guild = CustomCommandRecord::new("g2", "Guild2", "potato", "other", true);
    repo.insert(&other_guild).await.expect("插入记录失败");
}

#[tokio::test]
async fn update_return_value_reports_affected_rows() {
    let (db, _temp_dir) = create_test_database().await;
    let repo = CustomCommands::new(&db);

    repo.insert(&potato_record()).await.expect("插入记录失败");

    let affected = repo
        .update_return_value("g1", "potato", "new value")
        .await
        .expect("更新记录失败");
    assert_eq!(affected, 1);

    let found = repo
        .find("g1", "potato")
        .await
        .expect("查找记录失败")
        .expect("记录应当存在");
    assert_eq!(found.return_value, "new value");

    // 不存在的记录更新 0 行
    let affected = repo
        .update_return_value("g1", "carrot", "nothing")
        .await
        .expect("更新记录失败");
    assert_eq!(affected, 0);
}

#[tokio::test]
async fn delete_reports_affected_rows() {
    let (db, _temp_dir) = create_test_database().await;
    let repo = CustomCommands::new(&db);

    repo.insert(&potato_record()).await.expect("插入记录失败");

    assert_eq!(repo.delete("g1", "potato").await.expect("删除记录失败"), 1);
    assert_eq!(repo.delete("g1", "potato").await.expect("删除记录失败"), 0);
    assert!(repo
        .find("g1", "potato")
        .await
        .expect("查找记录失败")
        .is_none());
}

#[tokio::test]
async fn list_for_guild_is_scoped_and_ordered() {
    let (db, _temp_dir) = create_test_database().await;
    let repo = CustomCommands::new(&db);

    for (name, value) in [("zebra", "1"), ("apple", "2")] {
        repo.insert(&CustomCommandRecord::new("g1", "Guild1", name, value, false))
            .await
            .expect("插入记录失败");
    }
    repo.insert(&CustomCommandRecord::new("g2", "Guild2", "mango", "3", true))
        .await
        .expect("插入记录失败");

    let records = repo.list_for_guild("g1").await.expect("列出记录失败");
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["zebra", "apple"]);

    assert!(repo
        .list_for_guild("g3")
        .await
        .expect("列出记录失败")
        .is_empty());
}
