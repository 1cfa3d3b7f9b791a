use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State as AxumState,
    },
    Json,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::food::error::AppError;
use crate::food::restaurant::{ListOptions, ListParams, Restaurant, RestaurantSummary};

use super::state::State;

/// 成功响应 `{ok:true, data}`
#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub ok: bool,
    pub data: T,
}

impl<T> ApiOk<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self { ok: true, data })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResp {
    pub ok: bool,
    pub db_time: String,
}

/// GET /api/restaurants?q=&open=&limit=&sort=
pub async fn list_handler(
    AxumState(state): AxumState<Arc<State>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ApiOk<Vec<RestaurantSummary>>>, AppError> {
    // 查询串解析不了时按缺省条件查
    let params = match params {
        Ok(Query(params)) => params,
        Err(e) => {
            warn!("[Server] 查询参数无效，按缺省条件处理: {}", e.body_text());
            ListParams::default()
        }
    };
    let options = ListOptions::from(params);
    debug!("[Server] 列表查询: {:?}", options);

    let list = state.restaurants.list_restaurants(&options).await?;
    Ok(ApiOk::new(list))
}

/// GET /api/restaurants/{id}
pub async fn detail_handler(
    AxumState(state): AxumState<Arc<State>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiOk<Restaurant>>, AppError> {
    // 解码失败或非数字的 id 不可能命中任何一行
    let Ok(Path(id)) = id else {
        return Err(AppError::NotFound);
    };
    let id: i64 = id.trim().parse().map_err(|_| AppError::NotFound)?;

    state
        .restaurants
        .get_restaurant(id)
        .await?
        .map(ApiOk::new)
        .ok_or(AppError::NotFound)
}

/// GET /api/health
pub async fn health_handler(
    AxumState(state): AxumState<Arc<State>>,
) -> Result<Json<HealthResp>, AppError> {
    let db_time = state
        .restaurants
        .db_time()
        .await
        .map_err(AppError::DbNotConnected)?;

    Ok(Json(HealthResp { ok: true, db_time }))
}
