// ==========================================
// 分级作用域配置存储 - 内存键值仓储
// ==========================================
// 用途: 嵌入式使用/测试
// 并发: RwLock 保护，读多写少
// ==========================================

use crate::repository::error::{KvError, KvResult};
use crate::repository::kv_store::{KeyValueStore, StoreProvider};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

// ==========================================
// MemoryKvStore - 单个内存存储
// ==========================================
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn put(&self, key: &str, value: &str) -> KvResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| KvError::LockError(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> KvResult<String> {
        let entries = self
            .entries
            .read()
            .map_err(|e| KvError::LockError(e.to_string()))?;
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| KvError::KeyNotFound {
                key: key.to_string(),
            })
    }

    // 删除不存在的键视为成功（幂等）
    fn delete(&self, key: &str) -> KvResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| KvError::LockError(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

// ==========================================
// MemoryStoreProvider - 内存存储提供者
// ==========================================
#[derive(Debug, Default)]
pub struct MemoryStoreProvider {
    stores: RwLock<HashMap<String, Arc<MemoryKvStore>>>,
}

impl MemoryStoreProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预先创建一组命名存储
    pub fn with_stores<I, S>(names: I) -> KvResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let provider = Self::new();
        for name in names {
            provider.create_store(name.as_ref())?;
        }
        Ok(provider)
    }

    /// 创建命名存储（已存在则返回已有实例）
    pub fn create_store(&self, store_name: &str) -> KvResult<Arc<MemoryKvStore>> {
        let mut stores = self
            .stores
            .write()
            .map_err(|e| KvError::LockError(e.to_string()))?;
        let store = stores
            .entry(store_name.to_string())
            .or_insert_with(|| Arc::new(MemoryKvStore::new()));
        Ok(Arc::clone(store))
    }
}

impl StoreProvider for MemoryStoreProvider {
    fn key_value(&self, store_name: &str) -> KvResult<Arc<dyn KeyValueStore>> {
        let stores = self
            .stores
            .read()
            .map_err(|e| KvError::LockError(e.to_string()))?;
        match stores.get(store_name) {
            Some(store) => Ok(Arc::clone(store) as Arc<dyn KeyValueStore>),
            None => Err(KvError::StoreNotFound {
                store_name: store_name.to_string(),
            }),
        }
    }
}
