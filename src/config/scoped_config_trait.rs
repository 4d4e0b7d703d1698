// ==========================================
// 分级作用域配置存储 - 调用方配置接口
// ==========================================
// 用途: 工作流节点通过此接口读写配置，便于替换/模拟
// 实现者: ScopedConfigStore
// ==========================================

use crate::config::error::ConfigResult;
use crate::config::scoped_store::ScopedConfigStore;
use crate::domain::scope::Scope;

// ==========================================
// ScopedConfig Trait
// ==========================================
pub trait ScopedConfig: Send + Sync {
    /// 写入配置，scope 为 None 时写入 Node
    fn set(&self, key: &str, value: &str, scope: Option<Scope>) -> ConfigResult<()>;

    /// 读取配置，scope 为 None 时按 Node → Workflow → Project 级联查找
    fn get(&self, key: &str, scope: Option<Scope>) -> ConfigResult<String>;

    /// 删除配置，scope 为 None 时删除 Node
    fn delete(&self, key: &str, scope: Option<Scope>) -> ConfigResult<()>;
}

impl ScopedConfig for ScopedConfigStore {
    fn set(&self, key: &str, value: &str, scope: Option<Scope>) -> ConfigResult<()> {
        ScopedConfigStore::set(self, key, value, scope)
    }

    fn get(&self, key: &str, scope: Option<Scope>) -> ConfigResult<String> {
        ScopedConfigStore::get(self, key, scope)
    }

    fn delete(&self, key: &str, scope: Option<Scope>) -> ConfigResult<()> {
        ScopedConfigStore::delete(self, key, scope)
    }
}
