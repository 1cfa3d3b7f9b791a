pub mod food;
pub mod logging;

// 重新导出常用类型和函数，方便外部使用
pub use food::{
    config::AppConfig,
    enricher::{DetailsEnricher, EnrichReport},
    importer::{ImportReport, PlacesImporter},
    places::{PlacesApi, PlacesProvider},
    restaurant::{RestaurantDao, RestaurantSummary},
};
