//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 实现核心库的 `SessionStore`，值按原始字符串保存。

use portal::{SessionStore, StoreError};

/// 浏览器 localStorage
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("无法获取 window 对象".to_string()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage 已禁用".to_string()))
    }
}

impl SessionStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok()?
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        for (key, value) in entries {
            storage
                .set_item(key, value)
                .map_err(|e| StoreError::Unavailable(format!("写入 {} 失败: {:?}", key, e)))?;
        }
        Ok(())
    }

    fn clear(&self, keys: &[&str]) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        for key in keys {
            storage
                .remove_item(key)
                .map_err(|e| StoreError::Unavailable(format!("删除 {} 失败: {:?}", key, e)))?;
        }
        Ok(())
    }
}
