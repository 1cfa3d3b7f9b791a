//! 餐厅详情补充脚本
//!
//! 取出没补过或超过 14 天没补的餐厅，用 Place Details 更新餐厅和照片。
//! 需要环境变量 GOOGLE_MAPS_API_KEY，可选 DATABASE_URL。

use std::sync::Arc;

use anyhow::Result;
use campus_food::food::{
    config::AppConfig,
    db::create_sqlite_pool_with_migration,
    enricher::DetailsEnricher,
    places::PlacesApi,
    restaurant::RestaurantDao,
    schedule::{SystemClock, TokioPacer},
};
use campus_food::logging::init_logger;
use clap::Parser;
use tracing::info;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "enrich-details")]
#[command(about = "补充餐厅详情（电话、网站、营业时间、照片）", long_about = None)]
struct Args {
    /// 日志级别
    #[arg(long, default_value = "info,campus_food=debug")]
    log_level: String,

    /// 日志文件（追加写入），不填只输出到控制台
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level, args.log_file.as_deref())?;

    let config = AppConfig::from_env()?;
    let api_key = config.require_api_key()?.to_string();

    let run_id = Uuid::new_v4();
    info!("[Enricher] 🚀 run_id: {}", run_id);

    let db = create_sqlite_pool_with_migration(&config.database_url, 1).await?;
    let provider = PlacesApi::new(config.places_api_base_url.clone(), api_key)?;

    let enricher = DetailsEnricher::new(
        Arc::new(provider),
        RestaurantDao::new(db.clone()),
        Arc::new(TokioPacer),
        Arc::new(SystemClock),
        "zh-TW".to_string(),
    );

    let report = enricher.run().await;
    db.close().await;
    let report = report?;

    println!(
        "Done. Targets={}, OK={}, FAIL={}",
        report.targets, report.succeeded, report.failed
    );
    Ok(())
}
