// ==========================================
// 分级作用域配置存储 - 核心库
// ==========================================
// 职责: 工作流节点在 Node / Workflow / Project 三级作用域读写字符串配置
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 作用域
pub mod domain;

// 数据仓储层 - 键值存储后端
pub mod repository;

// 配置层 - 作用域路由与级联解析
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigError, ConfigResult, ScopedConfig, ScopedConfigStore, StoreSettings};
pub use domain::Scope;
pub use repository::{
    KeyValueStore, KvError, KvResult, MemoryStoreProvider, SqliteStoreProvider, StoreProvider,
};

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
