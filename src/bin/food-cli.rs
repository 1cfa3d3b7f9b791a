//! 餐厅卡片命令行客户端
//!
//! 示例:
//!   food-cli list --keyword 義大利麵 --limit 60 --sort rating
//!   food-cli show 12
//!   food-cli like 12

use anyhow::Result;
use campus_food::food::{
    client::{price_label, render, JsonFileStore, LikedSet, QueryClient, DEFAULT_LOAD_LIMIT},
    config::AppConfig,
    restaurant::SortKey,
};
use campus_food::logging::init_logger;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "food-cli")]
#[command(about = "中原大学附近餐厅查询", long_about = None)]
struct Args {
    /// 日志级别
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 列出餐厅卡片，收藏的排在前面
    List {
        /// 按店名或地址过滤
        #[arg(short, long, default_value = "")]
        keyword: String,

        #[arg(short, long, default_value_t = DEFAULT_LOAD_LIMIT)]
        limit: i64,

        /// rating / reviews / price
        #[arg(short, long, default_value = "rating")]
        sort: String,
    },
    /// 查看单家店的详情
    Show { id: i64 },
    /// 切换某家店的收藏状态
    Like { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level, None)?;

    let config = AppConfig::from_env()?;
    let mut liked = LikedSet::open(JsonFileStore::new(&config.liked_store_path));

    match args.command {
        Command::List {
            keyword,
            limit,
            sort,
        } => {
            let client = QueryClient::new(reqwest::Client::new(), config.food_api_base_url.clone());
            let stores = client
                .load_restaurants(limit, SortKey::parse(&sort))
                .await;

            let cards = render(&stores, &keyword, &liked, config.photo_api_key.as_deref());
            info!("[Client] 显示 {} / {} 家", cards.len(), stores.len());
            if cards.is_empty() {
                println!("沒有符合的餐廳");
            }
            for card in cards {
                println!("{} [{}] {}", card.heart(), card.id, card.name);
                if let Some(address) = &card.address {
                    println!("    📍 {}", address);
                }
                if let Some(line) = &card.rating_line {
                    println!("    {}", line);
                }
                if let Some(price) = &card.price_label {
                    println!("    💰 {}", price);
                }
                if let Some(open) = &card.open_now_label {
                    println!("    {}", open);
                }
                println!("    🖼  {}", card.image_url);
            }
        }
        Command::Show { id } => {
            let client =
                QueryClient::new(reqwest::Client::new(), config.food_api_base_url.clone());
            let Some(r) = client.fetch_restaurant(id).await else {
                println!("找不到餐廳 {}", id);
                return Ok(());
            };

            let heart = if liked.contains(r.id) { "❤️" } else { "🤍" };
            println!("{} [{}] {}", heart, r.id, r.name);
            let rating = r
                .rating
                .map(|v| format!("{} ({}人評分)", v, r.user_ratings_total.unwrap_or(0)));
            let fields = [
                ("📍 地址", r.address.clone()),
                ("⭐ 評分", rating),
                ("💰 價位", r.price_level.map(price_label)),
                ("📞 電話", r.phone.clone()),
                ("🌐 網站", r.website.clone()),
                ("🗺  地圖", r.google_maps_url.clone()),
                ("🕒 營業時間", r.opening_hours_json.as_ref().map(|v| v.to_string())),
            ];
            for (label, value) in fields {
                if let Some(value) = value {
                    println!("    {}: {}", label, value);
                }
            }
        }
        Command::Like { id } => {
            let now_liked = liked.toggle(id)?;
            let state = if now_liked { "❤️ 已收藏" } else { "🤍 已取消收藏" };
            println!("{} {}", state, id);
        }
    }
    Ok(())
}
