//! 本地收藏（爱心）状态
//!
//! 收藏只存在客户端，用一个持久化的键值存储保存，键固定为 `likedStores`，
//! 值是 JSON 编码的 id 数组。

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// 收藏列表在存储里的键
pub const LIKED_KEY: &str = "likedStores";

/// 持久化键值存储（类似浏览器的 localStorage）
pub trait LikedStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

/// 以 JSON 文件保存的键值存储
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = std::fs::read_to_string(&self.path)
            .context(format!("读取本地存储失败: {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).context("解析本地存储失败")
    }
}

impl LikedStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        // 文件坏了就从空表重建，原有的其他键会丢失
        let mut all = self.read_all().unwrap_or_else(|e| {
            warn!(
                "[Client] 本地存储损坏，重建 {}: {:#}",
                self.path.display(),
                e
            );
            BTreeMap::new()
        });
        all.insert(key.to_string(), value.to_string());
        let text = serde_json::to_string_pretty(&all)?;
        std::fs::write(&self.path, text)
            .context(format!("写入本地存储失败: {}", self.path.display()))
    }
}

/// 内存键值存储
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl LikedStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .items
            .lock()
            .map_err(|_| anyhow::anyhow!("MemoryStore lock poisoned"))?
            .get(key)
            .cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .lock()
            .map_err(|_| anyhow::anyhow!("MemoryStore lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 收藏集合，显式注入存储，不用全局变量
pub struct LikedSet<S: LikedStore> {
    store: S,
    /// 保持加入顺序
    ids: Vec<i64>,
}

impl<S: LikedStore> LikedSet<S> {
    /// 从存储加载；没有或内容损坏时视为空
    pub fn open(store: S) -> Self {
        let ids = match store.get_item(LIKED_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<i64>>(&raw).unwrap_or_else(|e| {
                warn!("[Client] 收藏数据损坏，按空处理: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("[Client] 读取收藏失败，按空处理: {:#}", e);
                Vec::new()
            }
        };
        debug!("[Client] 已加载收藏 {} 个", ids.len());
        Self { store, ids }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    /// 切换收藏状态并立即持久化，返回切换后是否已收藏
    pub fn toggle(&mut self, id: i64) -> Result<bool> {
        let liked = if self.contains(id) {
            self.ids.retain(|x| *x != id);
            false
        } else {
            self.ids.push(id);
            true
        };
        self.persist()?;
        Ok(liked)
    }

    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.ids)?;
        self.store.set_item(LIKED_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership_and_persists() -> Result<()> {
        let mut liked = LikedSet::open(MemoryStore::default());
        assert!(!liked.contains(2));

        assert!(liked.toggle(2)?);
        assert!(liked.toggle(5)?);
        assert!(!liked.toggle(2)?);
        assert_eq!(liked.ids(), &[5]);
        assert_eq!(liked.store.get_item(LIKED_KEY)?.as_deref(), Some("[5]"));
        Ok(())
    }

    #[test]
    fn corrupt_value_loads_as_empty() -> Result<()> {
        let store = MemoryStore::default();
        store.set_item(LIKED_KEY, "not json")?;
        let liked = LikedSet::open(store);
        assert!(liked.ids().is_empty());
        Ok(())
    }

    #[test]
    fn corrupt_file_is_rebuilt_on_write() -> Result<()> {
        let path = std::env::temp_dir().join(format!("liked_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{not json")?;

        let store = JsonFileStore::new(&path);
        assert!(store.get_item(LIKED_KEY).is_err());
        let mut liked = LikedSet::open(store);
        assert!(liked.ids().is_empty());
        assert!(liked.toggle(4)?);

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get_item(LIKED_KEY)?.as_deref(), Some("[4]"));

        std::fs::remove_file(&path).ok();
        Ok(())
    }

    #[test]
    fn file_store_survives_reopen() -> Result<()> {
        let path = std::env::temp_dir().join(format!("liked_{}.json", uuid::Uuid::new_v4()));

        let mut liked = LikedSet::open(JsonFileStore::new(&path));
        liked.toggle(7)?;
        liked.toggle(3)?;

        let reopened = LikedSet::open(JsonFileStore::new(&path));
        assert_eq!(reopened.ids(), &[7, 3]);

        std::fs::remove_file(&path).ok();
        Ok(())
    }
}
