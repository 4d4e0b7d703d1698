// ==========================================
// 分级作用域配置存储 - 键值存储接口
// ==========================================
// 职责: 定义配置层所需的后端协作接口（不包含实现）
// 实现者: MemoryStoreProvider / SqliteStoreProvider
// ==========================================

use crate::repository::error::KvResult;
use std::sync::Arc;

// ==========================================
// KeyValueStore Trait
// ==========================================
// 一个实例对应一个命名存储（即一个作用域）
// 并发安全由实现者保证
pub trait KeyValueStore: Send + Sync {
    /// 写入键值（存在则覆盖）
    fn put(&self, key: &str, value: &str) -> KvResult<()>;

    /// 读取键值
    ///
    /// # 返回
    /// - Ok(String): 配置值
    /// - Err(KvError::KeyNotFound): 键不存在
    /// - Err(其他): 后端故障
    fn get(&self, key: &str) -> KvResult<String>;

    /// 删除键
    fn delete(&self, key: &str) -> KvResult<()>;
}

// ==========================================
// StoreProvider Trait
// ==========================================
// 按存储名提供键值存储句柄
pub trait StoreProvider {
    /// 获取命名存储句柄
    ///
    /// # 返回
    /// - Err(KvError::StoreNotFound): 存储不存在
    fn key_value(&self, store_name: &str) -> KvResult<Arc<dyn KeyValueStore>>;
}
