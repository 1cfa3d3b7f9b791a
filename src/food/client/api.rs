//! Query Service HTTP 客户端

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::food::restaurant::{Restaurant, RestaurantSummary, SortKey};

/// 首页默认拉取的数量
pub const DEFAULT_LOAD_LIMIT: i64 = 60;

/// 统一的 `{ok, data, error}` 响应包装
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

pub struct QueryClient {
    client: reqwest::Client,
    api_base_url: String,
}

impl QueryClient {
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 拉取餐厅列表，失败时返回错误
    pub async fn fetch_restaurants(
        &self,
        limit: i64,
        sort: SortKey,
    ) -> Result<Vec<RestaurantSummary>> {
        let url = format!("{}/api/restaurants", self.api_base_url);
        debug!("[Client]   请求URL: {}", url);

        let envelope: Envelope<Vec<RestaurantSummary>> = self
            .client
            .get(&url)
            .query(&[("limit", limit.to_string()), ("sort", sort.as_str().to_string())])
            .send()
            .await
            .context("请求失败")?
            .json()
            .await
            .context("解析响应失败")?;

        if !envelope.ok {
            return Err(anyhow::anyhow!(
                "服务器错误: {}",
                envelope.error.as_deref().unwrap_or("API_ERROR")
            ));
        }
        Ok(envelope.data.unwrap_or_default())
    }

    /// 拉取单个餐厅；`NOT_FOUND` 返回 `Ok(None)`，其余失败返回错误
    pub async fn try_fetch_restaurant(&self, id: i64) -> Result<Option<Restaurant>> {
        let url = format!("{}/api/restaurants/{}", self.api_base_url, id);
        debug!("[Client]   请求URL: {}", url);

        let envelope: Envelope<Restaurant> = self
            .client
            .get(&url)
            .send()
            .await
            .context("请求失败")?
            .json()
            .await
            .context("解析响应失败")?;

        match (envelope.ok, envelope.error.as_deref()) {
            (true, _) => Ok(envelope.data),
            (false, Some("NOT_FOUND")) => Ok(None),
            (false, error) => Err(anyhow::anyhow!(
                "服务器错误: {}",
                error.unwrap_or("API_ERROR")
            )),
        }
    }

    /// 打开单个餐厅；查无此店或请求失败都返回 None
    pub async fn fetch_restaurant(&self, id: i64) -> Option<Restaurant> {
        match self.try_fetch_restaurant(id).await {
            Ok(Some(restaurant)) => Some(restaurant),
            Ok(None) => {
                info!("[Client] 餐厅 {} 不存在", id);
                None
            }
            Err(e) => {
                error!("[Client] 后端连接失败: {:#}", e);
                None
            }
        }
    }

    /// 拉取餐厅列表；任何失败都降级为空列表
    pub async fn load_restaurants(&self, limit: i64, sort: SortKey) -> Vec<RestaurantSummary> {
        match self.fetch_restaurants(limit, sort).await {
            Ok(list) => {
                info!("[Client] 已加载餐厅 {} 家", list.len());
                list
            }
            Err(e) => {
                error!("[Client] 后端连接失败: {:#}", e);
                Vec::new()
            }
        }
    }
}
