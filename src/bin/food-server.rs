//! 餐厅查询服务
//!
//! 提供 /api/restaurants、/api/restaurants/{id}、/api/health 三个接口。

use anyhow::Result;
use campus_food::food::{config::AppConfig, server::start_server};
use campus_food::logging::init_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "food-server")]
#[command(about = "餐厅查询服务", long_about = None)]
struct Args {
    /// 日志级别
    #[arg(long, default_value = "info,campus_food=debug")]
    log_level: String,

    /// 日志文件（追加写入）
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level, args.log_file.as_deref())?;

    let config = AppConfig::from_env()?;
    start_server(config).await
}
