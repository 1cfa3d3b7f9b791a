//! SQLite 数据库工具：统一创建连接池并执行 sqlx 迁移
//!
//! 约定：crate 根目录下存在 `migrations/` 目录，存放所有迁移 SQL 文件。
//! 通过 `sqlx::migrate!()` 自动管理 schema 升级。

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use tracing::info;

/// 创建 SQLite 连接池并执行所有未执行的迁移
///
/// 批处理脚本传 `max_connections = 1`，整个运行期间只占用一条连接。
pub async fn create_sqlite_pool_with_migration(
    db_url: &str,
    max_connections: u32,
) -> Result<Pool<Sqlite>> {
    let mut options = SqlitePoolOptions::new().max_connections(max_connections);

    // 内存库的数据只存在于单条连接上，连接不能被回收
    if db_url.contains(":memory:") {
        options = options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = options
        .connect(db_url)
        .await
        .context(format!("连接SQLite数据库失败: {}", db_url))?;

    // 从 `migrations/` 目录读取迁移并执行
    sqlx::migrate!().run(&pool).await.context("执行数据库迁移失败")?;

    info!("[DB] 数据库已就绪: {}", db_url);
    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> Pool<Sqlite> {
    create_sqlite_pool_with_migration("sqlite::memory:", 1)
        .await
        .expect("创建内存数据库失败")
}
