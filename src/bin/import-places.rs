//! 附近餐厅导入脚本
//!
//! 用 Places Nearby Search 抓中心点附近的餐厅，基本字段 upsert 到 restaurants。
//! 需要环境变量 GOOGLE_MAPS_API_KEY，可选 DATABASE_URL。

use std::sync::Arc;

use anyhow::Result;
use campus_food::food::{
    config::AppConfig,
    db::create_sqlite_pool_with_migration,
    importer::PlacesImporter,
    places::{NearbyQuery, PlacesApi},
    restaurant::RestaurantDao,
    schedule::{SystemClock, TokioPacer},
};
use campus_food::logging::init_logger;
use clap::Parser;
use tracing::info;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "import-places")]
#[command(about = "抓取中心点附近的餐厅并写入数据库", long_about = None)]
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
    info!("[Importer] 🚀 run_id: {}", run_id);

    // 整个运行期间只用一条连接
    let db = create_sqlite_pool_with_migration(&config.database_url, 1).await?;
    let provider = PlacesApi::new(config.places_api_base_url.clone(), api_key)?;

    let importer = PlacesImporter::new(
        Arc::new(provider),
        RestaurantDao::new(db.clone()),
        Arc::new(TokioPacer),
        Arc::new(SystemClock),
        NearbyQuery {
            lat: config.center_lat,
            lng: config.center_lng,
            radius_meters: config.radius_meters,
            place_type: "restaurant".to_string(),
            language: "zh-TW".to_string(),
        },
    );

    let report = importer.run().await;
    db.close().await;
    let report = report?;

    println!(
        "Done. upserted {} restaurants (raw fetched: {}, skipped: {}, pages: {})",
        report.upserted, report.fetched, report.skipped, report.pages
    );
    Ok(())
}
