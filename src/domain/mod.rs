// ==========================================
// 分级作用域配置存储 - 领域模型层
// ==========================================
// 红线: 不含数据访问逻辑
// ==========================================

pub mod scope;

// 重导出核心类型
pub use scope::{resolve_scope, ParseScopeError, Scope};
