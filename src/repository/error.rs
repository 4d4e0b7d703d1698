// ==========================================
// 分级作用域配置存储 - 键值仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约束: KeyNotFound 必须与其他后端故障可区分
// ==========================================

use thiserror::Error;

/// 键值仓储层错误类型
#[derive(Error, Debug)]
pub enum KvError {
    // ===== 键不存在 (唯一允许级联回退的结果) =====
    #[error("键不存在: {key}")]
    KeyNotFound { key: String },

    // ===== 存储句柄错误 =====
    #[error("键值存储不存在: {store_name}")]
    StoreNotFound { store_name: String },

    // ===== 数据库错误 =====
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    // ===== 通用错误 =====
    #[error("后端错误: {0}")]
    Backend(String),
}

impl KvError {
    /// 是否为"键不存在"
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvError::KeyNotFound { .. })
    }
}

/// Result 类型别名
pub type KvResult<T> = Result<T, KvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_key_not_found_is_not_found() {
        assert!(KvError::KeyNotFound { key: "k".into() }.is_not_found());
        assert!(!KvError::Backend("timeout".into()).is_not_found());
        assert!(!KvError::StoreNotFound { store_name: "kv_node".into() }.is_not_found());
        assert!(!KvError::Database(rusqlite::Error::QueryReturnedNoRows).is_not_found());
    }
}
