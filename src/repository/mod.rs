// ==========================================
// 分级作用域配置存储 - 键值仓储层
// ==========================================
// 红线: Repository 不含作用域解析逻辑
// ==========================================
// 职责: 提供命名键值存储，屏蔽后端细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod kv_store;
pub mod memory_kv_repo;
pub mod sqlite_kv_repo;

// 重导出核心仓储
pub use error::{KvError, KvResult};
pub use kv_store::{KeyValueStore, StoreProvider};
pub use memory_kv_repo::{MemoryKvStore, MemoryStoreProvider};
pub use sqlite_kv_repo::{SqliteKvStore, SqliteStoreProvider};
