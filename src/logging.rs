//! 日志初始化（tracing + EnvFilter）

use std::fs::OpenOptions;
use std::io;

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// 初始化日志：输出到 stdout，`log_file` 不为空时同时追加写入文件
///
/// 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数。
pub fn init_logger(log_level: &str, log_file: Option<&str>) -> Result<()> {
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    // 文件不需要颜色
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .context(format!("无法创建日志文件 {}", path))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("初始化日志失败")?;
    Ok(())
}

/// 测试用：日志走 test writer，只初始化一次
#[cfg(test)]
pub(crate) fn init_test_logger() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}
