//! 运行配置：全部来自环境变量，缺省值会打日志提示

use std::{env, fmt::Display, str::FromStr};

use anyhow::{anyhow, Result};
use tracing::{info, warn};

/// 中原大学坐标（小数）
pub const CYCU_LAT: f64 = 24.9581639;
pub const CYCU_LNG: f64 = 121.2417917;
pub const DEFAULT_RADIUS_METERS: u32 = 500;
pub const DEFAULT_PLACES_API_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// SQLite 连接串，例如 `sqlite://campus_food.db?mode=rwc`
    pub database_url: String,
    /// Query Service 监听端口
    pub port: u16,
    /// Places API key，只有批处理脚本需要
    pub google_maps_api_key: Option<String>,
    pub places_api_base_url: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub radius_meters: u32,
    /// 前端客户端访问的 Query Service 地址
    pub food_api_base_url: String,
    /// 客户端本地收藏文件
    pub liked_store_path: String,
    /// 客户端拼接照片 URL 用的 key，可不设
    pub photo_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: try_load("DATABASE_URL", "sqlite://campus_food.db?mode=rwc")?,
            port: try_load("PORT", "3001")?,
            google_maps_api_key: optional("GOOGLE_MAPS_API_KEY"),
            places_api_base_url: try_load("PLACES_API_BASE_URL", DEFAULT_PLACES_API_BASE_URL)?,
            center_lat: try_load("CENTER_LAT", &CYCU_LAT.to_string())?,
            center_lng: try_load("CENTER_LNG", &CYCU_LNG.to_string())?,
            radius_meters: try_load("SEARCH_RADIUS_METERS", &DEFAULT_RADIUS_METERS.to_string())?,
            food_api_base_url: try_load("FOOD_API_BASE_URL", "http://localhost:3001")?,
            liked_store_path: try_load("LIKED_STORE_PATH", "liked_stores.json")?,
            photo_api_key: optional("PHOTO_API_KEY"),
        })
    }

    /// 批处理脚本启动前调用，缺 key 直接报错退出
    pub fn require_api_key(&self) -> Result<&str> {
        self.google_maps_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("缺少环境变量 GOOGLE_MAPS_API_KEY"))
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow!("环境变量 {key} 无效: {e}")
    })
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        google_maps_api_key: None,
        places_api_base_url: DEFAULT_PLACES_API_BASE_URL.to_string(),
        center_lat: CYCU_LAT,
        center_lng: CYCU_LNG,
        radius_meters: DEFAULT_RADIUS_METERS,
        food_api_base_url: "http://localhost:3001".to_string(),
        liked_store_path: "liked_stores.json".to_string(),
        photo_api_key: None,
    }
}
