pub mod client;
pub mod config;
pub mod db;
pub mod enricher;
pub mod error;
pub mod importer;
pub mod places;
pub mod restaurant;
pub mod schedule;
pub mod server;

// 重新导出批处理入口
pub use enricher::{DetailsEnricher, EnrichReport};
pub use importer::{ImportReport, PlacesImporter};
