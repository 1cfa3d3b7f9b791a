//! Places HTTP API 客户端
//!
//! 负责 Nearby Search 和 Place Details 两个请求。这里只处理传输层错误，
//! 响应里的 status 交给调用方判断（导入和补充详情对 status 的处理不同）。

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::food::places::types::{NearbyQuery, NearbySearchResp, PlaceDetailsResp, DETAILS_FIELDS};

/// 外部请求的固定超时
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// 地点数据来源
///
/// 生产环境是 [`PlacesApi`]，测试里用内存假实现替换。
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// 抓一页附近地点；`page_token` 为 None 时按坐标查询，否则只带 token
    async fn nearby_search(
        &self,
        query: &NearbyQuery,
        page_token: Option<&str>,
    ) -> Result<NearbySearchResp>;

    /// 抓单个地点的详情
    async fn place_details(&self, place_id: &str, language: &str) -> Result<PlaceDetailsResp>;
}

/// Places HTTP API 客户端
pub struct PlacesApi {
    client: reqwest::Client,
    api_base_url: String,
    api_key: String,
}

impl PlacesApi {
    /// 创建新的 Places API 客户端（带固定超时）
    pub fn new(api_base_url: String, api_key: String) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("创建 HTTP 客户端失败")?;
        Ok(Self::with_client(client, api_base_url, api_key))
    }

    pub fn with_client(client: reqwest::Client, api_base_url: String, api_key: String) -> Self {
        Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
        operation_name: &str,
    ) -> Result<T> {
        let operation_id = Uuid::new_v4().to_string();
        debug!("[PlacesAPI]   请求URL: {}, 操作ID: {}", url, operation_id);

        let response = self
            .client
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .context(format!("{}请求失败", operation_name))?;

        let status = response.status();
        let body_bytes = response.bytes().await.context("读取响应 body 失败")?;
        let body_str = String::from_utf8_lossy(&body_bytes);
        debug!("[PlacesAPI] {}响应 Body: {}", operation_name, body_str);

        if !status.is_success() {
            error!(
                "[PlacesAPI] {}请求失败，HTTP状态: {}, 响应: {}",
                operation_name, status, body_str
            );
            return Err(anyhow::anyhow!("HTTP 错误 {}: {}", status, body_str));
        }

        serde_json::from_slice(&body_bytes).map_err(|e| {
            error!(
                "[PlacesAPI] {}反序列化失败: {:?}\n原始响应: {}",
                operation_name, e, body_str
            );
            anyhow::anyhow!("反序列化响应失败: {:?}", e)
        })
    }
}

#[async_trait]
impl PlacesProvider for PlacesApi {
    async fn nearby_search(
        &self,
        query: &NearbyQuery,
        page_token: Option<&str>,
    ) -> Result<NearbySearchResp> {
        let url = format!("{}/nearbysearch/json", self.api_base_url);

        let params: Vec<(&str, String)> = match page_token {
            Some(token) => vec![("pagetoken", token.to_string())],
            None => vec![
                ("location", format!("{},{}", query.lat, query.lng)),
                ("radius", query.radius_meters.to_string()),
                ("type", query.place_type.clone()),
                ("language", query.language.clone()),
            ],
        };

        info!(
            "[PlacesAPI] 📡 请求附近地点{}",
            if page_token.is_some() { "（下一页）" } else { "" }
        );
        let resp: NearbySearchResp = self.get_json(&url, &params, "附近地点").await?;
        info!(
            "[PlacesAPI] 附近地点响应，status: {}, 条目数: {}, 有下一页: {}",
            resp.status,
            resp.results.len(),
            resp.next_page_token.is_some()
        );
        Ok(resp)
    }

    async fn place_details(&self, place_id: &str, language: &str) -> Result<PlaceDetailsResp> {
        let url = format!("{}/details/json", self.api_base_url);
        let params = vec![
            ("place_id", place_id.to_string()),
            ("fields", DETAILS_FIELDS.join(",")),
            ("language", language.to_string()),
        ];

        debug!("[PlacesAPI] 📡 请求地点详情: {}", place_id);
        let resp: PlaceDetailsResp = self.get_json(&url, &params, "地点详情").await?;
        debug!("[PlacesAPI] 地点详情响应，status: {}", resp.status);
        Ok(resp)
    }
}
