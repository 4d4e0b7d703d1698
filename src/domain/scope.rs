// ==========================================
// 分级作用域配置存储 - 配置作用域
// ==========================================
// 职责: 定义三级作用域及其解析顺序
// 序列化格式: 小写 (与存储名/命令行参数一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Scope - 配置作用域
// ==========================================
// 范围由窄到宽: Node < Workflow < Project
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Node,     // 节点
    Workflow, // 工作流
    Project,  // 项目
}

impl Scope {
    /// 未指定作用域时的读取顺序（由窄到宽）
    pub const CASCADE_ORDER: [Scope; 3] = [Scope::Node, Scope::Workflow, Scope::Project];

    /// 构造时获取存储句柄的顺序（固定，保证错误报告可复现）
    pub const INIT_ORDER: [Scope; 3] = [Scope::Project, Scope::Workflow, Scope::Node];

    /// 转换为小写字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Node => "node",
            Scope::Workflow => "workflow",
            Scope::Project => "project",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 作用域解析失败
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("未知的作用域: {0:?} (可选: node / workflow / project)")]
pub struct ParseScopeError(pub String);

impl FromStr for Scope {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "node" => Ok(Scope::Node),
            "workflow" => Ok(Scope::Workflow),
            "project" => Ok(Scope::Project),
            _ => Err(ParseScopeError(s.to_string())),
        }
    }
}

/// 作用域缺省规则: 给定则使用给定值，否则为 Node
///
/// set / get / delete 统一复用此规则，新增操作同样必须复用，避免各操作缺省值漂移。
pub fn resolve_scope(scope: Option<Scope>) -> Scope {
    scope.unwrap_or_default()
}
