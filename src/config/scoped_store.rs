// ==========================================
// 分级作用域配置存储 - 作用域配置存储
// ==========================================
// 职责: 按作用域路由 set / get / delete 到对应键值存储
// 读取: 未指定作用域时按 Node → Workflow → Project 级联
// 红线: 不缓存、不批量、不重试；后端故障不得当作"不存在"
// ==========================================

use crate::config::error::{ConfigError, ConfigResult, Operation};
use crate::config::settings::StoreSettings;
use crate::domain::scope::{resolve_scope, Scope};
use crate::repository::kv_store::{KeyValueStore, StoreProvider};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ==========================================
// ScopedConfigStore - 作用域配置存储
// ==========================================
pub struct ScopedConfigStore {
    kv_stores: HashMap<Scope, Arc<dyn KeyValueStore>>,
}

impl ScopedConfigStore {
    /// 创建作用域配置存储
    ///
    /// # 参数
    /// - settings: 各作用域对应的存储名
    /// - provider: 键值存储提供者
    ///
    /// # 说明
    /// 按 Project → Workflow → Node 顺序获取句柄，任一失败即返回，不会返回部分初始化的实例。
    pub fn new(settings: &StoreSettings, provider: &dyn StoreProvider) -> ConfigResult<Self> {
        let mut kv_stores: HashMap<Scope, Arc<dyn KeyValueStore>> =
            HashMap::with_capacity(Scope::INIT_ORDER.len());

        for scope in Scope::INIT_ORDER {
            let store_name = settings.store_name(scope);
            let store = provider
                .key_value(store_name)
                .map_err(|source| ConfigError::Initialization {
                    scope,
                    store_name: store_name.to_string(),
                    source,
                })?;
            kv_stores.insert(scope, store);
        }

        tracing::info!(
            project = settings.store_name(Scope::Project),
            workflow = settings.store_name(Scope::Workflow),
            node = settings.store_name(Scope::Node),
            "作用域配置存储初始化完成"
        );

        Ok(Self { kv_stores })
    }

    /// 写入配置（默认作用域 Node）
    pub fn set(&self, key: &str, value: &str, scope: impl Into<Option<Scope>>) -> ConfigResult<()> {
        let scope = resolve_scope(scope.into());
        let kv_store = self.kv_store(Operation::Set, key, scope)?;

        kv_store
            .put(key, value)
            .map_err(|source| ConfigError::BackendWrite {
                key: key.to_string(),
                scope,
                source,
            })?;

        tracing::debug!(key, %scope, "配置已写入");
        Ok(())
    }

    /// 读取配置
    ///
    /// - 指定作用域: 只查该作用域，不回退
    /// - 未指定: 按 Node → Workflow → Project 级联，命中即返回
    pub fn get(&self, key: &str, scope: impl Into<Option<Scope>>) -> ConfigResult<String> {
        match scope.into() {
            Some(scope) => self.get_from_scope(key, scope),
            None => self.get_cascading(key),
        }
    }

    /// 删除配置（默认作用域 Node）
    ///
    /// 删除不存在的键的行为由后端决定，此处原样透传。
    pub fn delete(&self, key: &str, scope: impl Into<Option<Scope>>) -> ConfigResult<()> {
        let scope = resolve_scope(scope.into());
        let kv_store = self.kv_store(Operation::Delete, key, scope)?;

        kv_store
            .delete(key)
            .map_err(|source| ConfigError::BackendDelete {
                key: key.to_string(),
                scope,
                source,
            })?;

        tracing::debug!(key, %scope, "配置已删除");
        Ok(())
    }

    fn get_from_scope(&self, key: &str, scope: Scope) -> ConfigResult<String> {
        let kv_store = self.kv_store(Operation::Get, key, scope)?;

        kv_store.get(key).map_err(|source| {
            if source.is_not_found() {
                ConfigError::NotFound {
                    key: key.to_string(),
                    scope: Some(scope),
                }
            } else {
                ConfigError::BackendRead {
                    key: key.to_string(),
                    scope,
                    source,
                }
            }
        })
    }

    fn get_cascading(&self, key: &str) -> ConfigResult<String> {
        for scope in Scope::CASCADE_ORDER {
            match self.get_from_scope(key, scope) {
                Ok(value) => {
                    tracing::debug!(key, %scope, "级联读取命中");
                    return Ok(value);
                }
                Err(ConfigError::NotFound { .. }) => continue,
                Err(e) => {
                    // 作用域状态未知，不能越过它继续回退
                    tracing::warn!(key, %scope, error = %e, "级联读取中止");
                    return Err(e);
                }
            }
        }

        Err(ConfigError::NotFound {
            key: key.to_string(),
            scope: None,
        })
    }

    fn kv_store(
        &self,
        operation: Operation,
        key: &str,
        scope: Scope,
    ) -> ConfigResult<&dyn KeyValueStore> {
        self.kv_stores
            .get(&scope)
            .map(|store| store.as_ref())
            .ok_or_else(|| ConfigError::ScopeNotFound {
                operation,
                key: key.to_string(),
                scope,
            })
    }
}

impl fmt::Debug for ScopedConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scopes: Vec<Scope> = self.kv_stores.keys().copied().collect();
        scopes.sort();
        f.debug_struct("ScopedConfigStore")
            .field("scopes", &scopes)
            .finish()
    }
}
