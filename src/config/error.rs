// ==========================================
// 分级作用域配置存储 - 配置层错误类型
// ==========================================
// 职责: 区分"键不存在"与"后端故障"
// 约束: 每个错误都携带操作名、键、作用域
// ==========================================

use crate::domain::scope::Scope;
use crate::repository::error::KvError;
use std::fmt;
use thiserror::Error;

/// 配置操作名（用于错误定位）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Set,
    Get,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Set => write!(f, "set"),
            Operation::Get => write!(f, "get"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

fn describe_scope(scope: &Option<Scope>) -> String {
    match scope {
        Some(scope) => format!("作用域 {} 中", scope),
        None => "任何作用域中都".to_string(),
    }
}

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 构造错误 (致命) =====
    #[error("configuration init: 无法获取作用域 {scope} 的键值存储 {store_name:?}: {source}")]
    Initialization {
        scope: Scope,
        store_name: String,
        #[source]
        source: KvError,
    },

    // ===== 内部不变量违反 =====
    #[error("configuration {operation}: 找不到作用域 {scope} 对应的键值存储 (key={key:?})")]
    ScopeNotFound {
        operation: Operation,
        key: String,
        scope: Scope,
    },

    // ===== 键不存在 (可恢复) =====
    #[error("configuration get: 配置 key={key:?} 在{}不存在", describe_scope(.scope))]
    NotFound { key: String, scope: Option<Scope> },

    // ===== 后端故障 =====
    #[error("configuration get: 从作用域 {scope} 读取 key={key:?} 失败: {source}")]
    BackendRead {
        key: String,
        scope: Scope,
        #[source]
        source: KvError,
    },

    #[error("configuration set: 向作用域 {scope} 写入 key={key:?} 失败: {source}")]
    BackendWrite {
        key: String,
        scope: Scope,
        #[source]
        source: KvError,
    },

    #[error("configuration delete: 从作用域 {scope} 删除 key={key:?} 失败: {source}")]
    BackendDelete {
        key: String,
        scope: Scope,
        #[source]
        source: KvError,
    },
}

impl ConfigError {
    /// 是否为"键不存在"（调用方据此区分缺省与故障）
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }

    /// 关联的后端错误（若有）
    pub fn backend_error(&self) -> Option<&KvError> {
        match self {
            ConfigError::Initialization { source, .. }
            | ConfigError::BackendRead { source, .. }
            | ConfigError::BackendWrite { source, .. }
            | ConfigError::BackendDelete { source, .. } => Some(source),
            ConfigError::ScopeNotFound { .. } | ConfigError::NotFound { .. } => None,
        }
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
