//! 持久化键值存储封装
//!
//! 会话上下文通过 `SessionStorage` 写入。浏览器后端为 `window.localStorage`；
//! localStorage 不可用时（隐私模式、沙箱 iframe）以及测试中使用 [`MemoryStorage`]。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 存储抽象
pub trait SessionStorage: Send + Sync {
    /// 读取字符串值，缺失或不可读时返回 `None`
    fn get(&self, key: &str) -> Option<String>;

    /// 写入，成功返回 `true`
    fn set(&self, key: &str, value: &str) -> bool;

    /// 删除，成功返回 `true`
    fn delete(&self, key: &str) -> bool;
}

/// `window.localStorage` backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// Browser storage if reachable, otherwise an in-memory fallback that
    /// lasts for this page load.
    pub fn open() -> Arc<dyn SessionStorage> {
        if Self::storage().is_some() {
            Arc::new(LocalStorage)
        } else {
            log::warn!("localStorage unavailable, session will not survive a reload");
            Arc::new(MemoryStorage::new())
        }
    }
}

impl SessionStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryStorage {
    pub fn len(&self) -> usize {
        self.map.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        match self.map.lock() {
            Ok(mut map) => {
                map.insert(key.to_string(), value.to_string());
                true
            }
            Err(_) => false,
        }
    }

    fn delete(&self, key: &str) -> bool {
        match self.map.lock() {
            Ok(mut map) => {
                map.remove(key);
                true
            }
            Err(_) => false,
        }
    }
}
