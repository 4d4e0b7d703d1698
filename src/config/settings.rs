// ==========================================
// 分级作用域配置存储 - 存储设置
// ==========================================
// 职责: 每个作用域对应的存储名 + SQLite 路径
// 来源: 默认值 → JSON 文件 → 环境变量覆写
// ==========================================

use crate::domain::scope::Scope;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 环境变量名
pub mod env_keys {
    pub const DB_PATH: &str = "SCOPED_CONFIG_DB_PATH";
    pub const KV_PROJECT: &str = "SCOPED_CONFIG_KV_PROJECT";
    pub const KV_WORKFLOW: &str = "SCOPED_CONFIG_KV_WORKFLOW";
    pub const KV_NODE: &str = "SCOPED_CONFIG_KV_NODE";
}

/// 设置加载错误
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("读取设置文件失败: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("设置文件格式错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("作用域 {0} 的存储名不能为空")]
    EmptyStoreName(Scope),

    #[error("作用域 {first} 与 {second} 使用了同一个存储 {store_name:?}")]
    SharedStoreName {
        first: Scope,
        second: Scope,
        store_name: String,
    },
}

/// 存储设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// SQLite 数据库路径（None 时使用默认路径）
    pub db_path: Option<String>,
    pub project_store: String,
    pub workflow_store: String,
    pub node_store: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            db_path: None,
            project_store: "kv_project".to_string(),
            workflow_store: "kv_workflow".to_string(),
            node_store: "kv_node".to_string(),
        }
    }
}

impl StoreSettings {
    /// 作用域对应的存储名
    pub fn store_name(&self, scope: Scope) -> &str {
        match scope {
            Scope::Project => &self.project_store,
            Scope::Workflow => &self.workflow_store,
            Scope::Node => &self.node_store,
        }
    }

    /// 默认值 + 环境变量覆写
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_defaults_with(env_var)
    }

    /// JSON 文件 + 环境变量覆写
    ///
    /// 文件中缺失的字段使用默认值
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::from_json_file_with(path, env_var)
    }

    fn from_defaults_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        settings.apply_overrides(lookup);
        settings.validate()?;
        Ok(settings)
    }

    fn from_json_file_with(
        path: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut settings: StoreSettings = serde_json::from_str(&raw)?;
        settings.apply_overrides(lookup);
        settings.validate()?;
        Ok(settings)
    }

    /// 按 env_keys 覆写，空白值忽略
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = read(env_keys::DB_PATH) {
            self.db_path = Some(v);
        }
        if let Some(v) = read(env_keys::KV_PROJECT) {
            self.project_store = v;
        }
        if let Some(v) = read(env_keys::KV_WORKFLOW) {
            self.workflow_store = v;
        }
        if let Some(v) = read(env_keys::KV_NODE) {
            self.node_store = v;
        }
    }

    /// 校验: 存储名非空且三个作用域互不相同
    pub fn validate(&self) -> Result<(), SettingsError> {
        for scope in Scope::INIT_ORDER {
            if self.store_name(scope).trim().is_empty() {
                return Err(SettingsError::EmptyStoreName(scope));
            }
        }

        for (i, first) in Scope::INIT_ORDER.iter().enumerate() {
            for second in &Scope::INIT_ORDER[i + 1..] {
                if self.store_name(*first) == self.store_name(*second) {
                    return Err(SettingsError::SharedStoreName {
                        first: *first,
                        second: *second,
                        store_name: self.store_name(*first).to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// 实际使用的数据库路径
    pub fn resolved_db_path(&self) -> String {
        self.db_path.clone().unwrap_or_else(default_db_path)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn read_env(key: &str) -> Option<String> {
    env_var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 默认数据库路径
///
/// 优先级: SCOPED_CONFIG_DB_PATH → 用户数据目录 → 当前目录
pub fn default_db_path() -> String {
    if let Some(path) = read_env(env_keys::DB_PATH) {
        return path;
    }

    let mut path = PathBuf::from("./scoped_config.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("scoped-config");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("scoped_config.db");
        } else {
            tracing::warn!("无法创建数据目录 {}，使用当前目录", dir.display());
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_store_names() {
        let settings = StoreSettings::default();
        assert_eq!(settings.store_name(Scope::Project), "kv_project");
        assert_eq!(settings.store_name(Scope::Workflow), "kv_workflow");
        assert_eq!(settings.store_name(Scope::Node), "kv_node");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_and_shared_names() {
        let settings = StoreSettings {
            workflow_store: "  ".to_string(),
            ..StoreSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::EmptyStoreName(Scope::Workflow))
        ));

        let settings = StoreSettings {
            node_store: "kv_project".to_string(),
            ..StoreSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::SharedStoreName {
                first: Scope::Project,
                second: Scope::Node,
                ..
            })
        ));
    }

    fn no_env(_key: &str) -> Option<String> {
        None
    }

    fn env_map(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn settings_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", json).unwrap();
        file
    }

    #[test]
    fn test_json_file_partial_fields() {
        let file = settings_file(r#"{"project_store": "acme_project", "db_path": "/tmp/acme.db"}"#);

        let settings = StoreSettings::from_json_file_with(file.path(), no_env).unwrap();
        assert_eq!(settings.project_store, "acme_project");
        assert_eq!(settings.workflow_store, "kv_workflow");
        assert_eq!(settings.node_store, "kv_node");
        assert_eq!(settings.resolved_db_path(), "/tmp/acme.db");
    }

    #[test]
    fn test_json_file_through_public_loader() {
        let file = settings_file(
            r#"{"project_store": "p_store", "workflow_store": "w_store", "node_store": "n_store"}"#,
        );

        let settings = StoreSettings::from_json_file(file.path()).unwrap();
        assert!(settings.validate().is_ok());
        for scope in Scope::INIT_ORDER {
            assert!(!settings.store_name(scope).is_empty());
        }
    }

    #[test]
    fn test_json_file_rejects_shared_store_names() {
        let file = settings_file(r#"{"project_store": "shared", "workflow_store": "shared"}"#);

        let err = StoreSettings::from_json_file_with(file.path(), no_env).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::SharedStoreName {
                first: Scope::Project,
                second: Scope::Workflow,
                ref store_name,
            } if store_name == "shared"
        ));
    }

    #[test]
    fn test_json_file_malformed() {
        let file = settings_file("{ not json");
        let err = StoreSettings::from_json_file_with(file.path(), no_env).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let file = settings_file(r#"{"node_store": "file_node"}"#);
        let lookup = env_map(&[
            (env_keys::KV_NODE, " env_node "),
            (env_keys::KV_WORKFLOW, "   "),
            (env_keys::DB_PATH, "/var/lib/scoped.db"),
        ]);

        let settings = StoreSettings::from_json_file_with(file.path(), lookup).unwrap();
        assert_eq!(settings.node_store, "env_node");
        // 空白值不覆写
        assert_eq!(settings.workflow_store, "kv_workflow");
        assert_eq!(settings.db_path.as_deref(), Some("/var/lib/scoped.db"));
    }

    #[test]
    fn test_env_overrides_defaults() {
        let lookup = env_map(&[(env_keys::KV_PROJECT, "tenant_project")]);
        let settings = StoreSettings::from_defaults_with(lookup).unwrap();
        assert_eq!(settings.project_store, "tenant_project");
        assert_eq!(settings.node_store, "kv_node");
        assert_eq!(settings.db_path, None);

        // 覆写后仍需通过校验
        let lookup = env_map(&[(env_keys::KV_NODE, "kv_workflow")]);
        assert!(matches!(
            StoreSettings::from_defaults_with(lookup),
            Err(SettingsError::SharedStoreName { .. })
        ));
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        let settings = StoreSettings::from_env().unwrap();
        let expected = StoreSettings::from_defaults_with(env_var).unwrap();
        assert_eq!(settings, expected);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_json_file_missing() {
        let err = StoreSettings::from_json_file("/nonexistent/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
