/*!
 * 存储路径管理模块
 *
 * 提供统一的路径管理功能，包括应用目录和数据目录
 * 支持跨平台路径处理和路径验证
 */

use crate::storage::error::{StoragePathsError, StoragePathsResult};
use std::fs;
use std::path::PathBuf;

/// 存储路径管理器
#[derive(Debug, Clone)]
pub struct StoragePaths {
    /// 应用根目录
    pub app_dir: PathBuf,
    /// 数据目录
    pub data_dir: PathBuf,
}

impl StoragePaths {
    /// 创建新的路径管理器
    pub fn new(app_dir: PathBuf) -> StoragePathsResult<Self> {
        let data_dir = app_dir.join(super::DATA_DIR_NAME);

        let paths = Self { app_dir, data_dir };

        // 验证路径
        paths.validate()?;

        Ok(paths)
    }

    /// 获取数据库文件路径
    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join(super::DATABASE_FILE_NAME)
    }

    /// 确保所有目录存在
    pub fn ensure_directories(&self) -> StoragePathsResult<()> {
        let directories = [&self.app_dir, &self.data_dir];

        for dir in &directories {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .map_err(|e| StoragePathsError::directory_create(dir.to_path_buf(), e))?;
            }
        }

        Ok(())
    }

    /// 验证路径的有效性
    pub fn validate(&self) -> StoragePathsResult<()> {
        if !self.app_dir.exists() {
            fs::create_dir_all(&self.app_dir)
                .map_err(|e| StoragePathsError::directory_create(self.app_dir.clone(), e))?;
        }

        if let Err(e) = fs::metadata(&self.app_dir) {
            return Err(StoragePathsError::directory_access(self.app_dir.clone(), e));
        }

        Ok(())
    }
}

/// 存储路径构建器
pub struct StoragePathsBuilder {
    app_dir: Option<PathBuf>,
    custom_data_dir: Option<PathBuf>,
}

impl StoragePathsBuilder {
    pub fn new() -> Self {
        Self {
            app_dir: None,
            custom_data_dir: None,
        }
    }

    pub fn app_dir(mut self, dir: PathBuf) -> Self {
        self.app_dir = Some(dir);
        self
    }

    pub fn data_dir(mut self, dir: PathBuf) -> Self {
        self.custom_data_dir = Some(dir);
        self
    }

    pub fn build(self) -> StoragePathsResult<StoragePaths> {
        let Some(app_dir) = self.app_dir else {
            return Err(StoragePathsError::AppDirectoryMissing);
        };

        let data_dir = self
            .custom_data_dir
            .unwrap_or_else(|| app_dir.join(super::DATA_DIR_NAME));

        let paths = StoragePaths { app_dir, data_dir };

        paths.validate()?;
        Ok(paths)
    }
}

impl Default for StoragePathsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
