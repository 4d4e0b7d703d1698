// ==========================================
// 分级作用域配置存储 - 配置层
// ==========================================
// 职责: 三级作用域 (Node / Workflow / Project) 配置读写与级联解析
// 存储: 由 repository 层的键值存储提供
// ==========================================

pub mod error;
pub mod scoped_config_trait;
pub mod scoped_store;
pub mod settings;

// 重导出核心类型
pub use error::{ConfigError, ConfigResult, Operation};
pub use scoped_config_trait::ScopedConfig;
pub use scoped_store::ScopedConfigStore;
pub use settings::{default_db_path, SettingsError, StoreSettings};
