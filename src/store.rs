//! 会话持久化
//!
//! `SessionStore` 是对持久化键值存储的抽象（浏览器中对应 localStorage），
//! 以能力的形式注入两个控制器，而不是作为全局状态直接访问。

use crate::error::StoreError;
use portal_shared::keys;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// 同步的持久化键值存储
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;

    /// 作为一组写入
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    fn clear(&self, keys: &[&str]) -> Result<(), StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_all(&[(key, value)])
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Rc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        (**self).set_all(entries)
    }

    fn clear(&self, keys: &[&str]) -> Result<(), StoreError> {
        (**self).clear(keys)
    }
}

// =========================================================
// 会话模型
// =========================================================

/// 登录成功后持久化的会话
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub is_admin: bool,
}

impl Session {
    /// 写入 `token`、`username`、`isAdmin`
    pub fn persist<S: SessionStore + ?Sized>(&self, store: &S) -> Result<(), StoreError> {
        let is_admin = if self.is_admin { "true" } else { "false" };
        store.set_all(&[
            (keys::TOKEN, self.token.as_str()),
            (keys::USERNAME, self.username.as_str()),
            (keys::IS_ADMIN, is_admin),
        ])
    }

    /// 注销时只清除 `token` 与 `username`
    pub fn clear<S: SessionStore + ?Sized>(store: &S) -> Result<(), StoreError> {
        store.clear(&[keys::TOKEN, keys::USERNAME])
    }
}

/// 仪表盘入口读取到的会话片段；`isAdmin` 不在其中
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub token: String,
    pub username: String,
}

impl StoredSession {
    /// token 缺失或为空时返回 `None`
    pub fn load<S: SessionStore + ?Sized>(store: &S) -> Option<Self> {
        let token = store.get(keys::TOKEN).filter(|t| !t.is_empty())?;
        Some(Self {
            token,
            username: store.get(keys::USERNAME).unwrap_or_default(),
        })
    }
}

// =========================================================
// 内存实现
// =========================================================

/// 进程内存储；克隆得到的是同一份数据的句柄
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let mut map = self.entries.borrow_mut();
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn clear(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut map = self.entries.borrow_mut();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

// =========================================================
// 文件实现 (Native)
// =========================================================

/// 以 JSON 对象保存在单个文件中的持久化存储
///
/// 每次读写都直接访问文件；写入先落到临时文件再 rename，保证一组键同时生效。
#[cfg(feature = "native")]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(feature = "native")]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn save(&self, map: &HashMap<String, String>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(map)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<(), StoreError> {
        let mut map = self.load()?;
        f(&mut map);
        self.save(&map)
    }
}

#[cfg(feature = "native")]
impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut map) => map.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read session file");
                None
            }
        }
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn clear(&self, keys: &[&str]) -> Result<(), StoreError> {
        self.update(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}
