// ==========================================
// 分级作用域配置存储 - SQLite 键值仓储
// ==========================================
// 存储: kv_entry 表 (store_name + key → value)
// 连接: 所有存储句柄共享同一个 Arc<Mutex<Connection>>
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::repository::error::{KvError, KvResult};
use crate::repository::kv_store::{KeyValueStore, StoreProvider};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

fn lock_conn(conn: &Mutex<Connection>) -> KvResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| KvError::LockError(e.to_string()))
}

// ==========================================
// SqliteKvStore - 单个命名存储
// ==========================================
pub struct SqliteKvStore {
    conn: Arc<Mutex<Connection>>,
    store_name: String,
}

impl SqliteKvStore {
    pub fn store_name(&self) -> &str {
        &self.store_name
    }
}

impl KeyValueStore for SqliteKvStore {
    fn put(&self, key: &str, value: &str) -> KvResult<()> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            "INSERT INTO kv_entry (store_name, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(store_name, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![self.store_name, key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> KvResult<String> {
        let conn = lock_conn(&self.conn)?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_entry WHERE store_name = ?1 AND key = ?2",
                params![self.store_name, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        value.ok_or_else(|| KvError::KeyNotFound {
            key: key.to_string(),
        })
    }

    // 删除不存在的键视为成功（幂等）
    fn delete(&self, key: &str) -> KvResult<()> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            "DELETE FROM kv_entry WHERE store_name = ?1 AND key = ?2",
            params![self.store_name, key],
        )?;
        Ok(())
    }
}

// ==========================================
// SqliteStoreProvider - SQLite 存储提供者
// ==========================================
pub struct SqliteStoreProvider {
    conn: Arc<Mutex<Connection>>,
    create_missing: bool,
}

impl SqliteStoreProvider {
    /// 打开数据库文件并初始化 schema
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> KvResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        tracing::debug!(db_path, "SQLite 键值存储已打开");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            create_missing: false,
        })
    }

    /// 从已有连接创建
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 与建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> KvResult<Self> {
        {
            let guard = lock_conn(&conn)?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }

        Ok(Self {
            conn,
            create_missing: false,
        })
    }

    /// 请求不存在的存储时是否自动创建
    pub fn create_missing(mut self, enabled: bool) -> Self {
        self.create_missing = enabled;
        self
    }

    /// 注册命名存储（幂等）
    pub fn create_store(&self, store_name: &str) -> KvResult<()> {
        let conn = lock_conn(&self.conn)?;
        conn.execute(
            "INSERT OR IGNORE INTO kv_store (store_name) VALUES (?1)",
            params![store_name],
        )?;
        Ok(())
    }

    fn store_exists(&self, store_name: &str) -> KvResult<bool> {
        let conn = lock_conn(&self.conn)?;
        let exists = conn
            .query_row(
                "SELECT 1 FROM kv_store WHERE store_name = ?1",
                params![store_name],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }
}

impl StoreProvider for SqliteStoreProvider {
    fn key_value(&self, store_name: &str) -> KvResult<Arc<dyn KeyValueStore>> {
        if !self.store_exists(store_name)? {
            if !self.create_missing {
                return Err(KvError::StoreNotFound {
                    store_name: store_name.to_string(),
                });
            }
            self.create_store(store_name)?;
            tracing::info!(store_name, "自动创建键值存储");
        }

        Ok(Arc::new(SqliteKvStore {
            conn: Arc::clone(&self.conn),
            store_name: store_name.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_provider() -> SqliteStoreProvider {
        let conn = Connection::open_in_memory().unwrap();
        SqliteStoreProvider::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_unknown_store_is_rejected() {
        let provider = memory_provider();
        let err = provider.key_value("kv_node").err().unwrap();
        assert!(matches!(err, KvError::StoreNotFound { .. }));
    }

    #[test]
    fn test_create_missing_registers_store() {
        let provider = memory_provider().create_missing(true);
        assert!(provider.key_value("kv_node").is_ok());
        assert!(provider.store_exists("kv_node").unwrap());
    }

    #[test]
    fn test_stores_are_isolated() {
        let provider = memory_provider();
        provider.create_store("kv_node").unwrap();
        provider.create_store("kv_project").unwrap();

        let node = provider.key_value("kv_node").unwrap();
        let project = provider.key_value("kv_project").unwrap();

        node.put("region", "us").unwrap();
        project.put("region", "eu").unwrap();
        assert_eq!(node.get("region").unwrap(), "us");
        assert_eq!(project.get("region").unwrap(), "eu");

        node.delete("region").unwrap();
        assert!(node.get("region").unwrap_err().is_not_found());
        assert_eq!(project.get("region").unwrap(), "eu");
    }

    #[test]
    fn test_put_overwrites_and_delete_is_idempotent() {
        let provider = memory_provider().create_missing(true);
        let store = provider.key_value("kv_workflow").unwrap();

        store.put("retries", "1").unwrap();
        store.put("retries", "3").unwrap();
        assert_eq!(store.get("retries").unwrap(), "3");

        store.delete("retries").unwrap();
        store.delete("retries").unwrap();
        assert!(store.get("retries").unwrap_err().is_not_found());
    }
}
