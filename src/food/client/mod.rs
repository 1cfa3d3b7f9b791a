//! 展示客户端：拉取列表、渲染卡片、本地收藏

pub mod api;
pub mod liked;
pub mod view;

pub use api::{QueryClient, DEFAULT_LOAD_LIMIT};
pub use liked::{JsonFileStore, LikedSet, LikedStore, MemoryStore, LIKED_KEY};
pub use view::{price_label, render, CardView};
