use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Query Service 的错误，统一转成 `{ok:false, error}` 响应
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Database not connected: {0}")]
    DbNotConnected(#[source] sqlx::Error),

    #[error("Internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: &'static str,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::DbNotConnected(_) => "DB_NOT_CONNECTED",
            AppError::Internal(_) => "SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            // 查无此店是正常结果，不算异常
            AppError::NotFound => StatusCode::OK,
            AppError::DbNotConnected(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if !matches!(self, AppError::NotFound) {
            error!("[Server] 请求处理失败: {}", self);
        }

        let body = ErrorBody {
            ok: false,
            error: self.code(),
        };
        (self.status(), Json(body)).into_response()
    }
}
