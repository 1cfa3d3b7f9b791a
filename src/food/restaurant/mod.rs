//! 餐厅模块：模型、数据访问和列表查询条件

pub mod dao;
pub mod models;
pub mod query;

pub use dao::RestaurantDao;
pub use models::{
    DetailsUpdate, NewPhoto, NewRestaurant, Restaurant, RestaurantPhoto, RestaurantSummary,
};
pub use query::{ListOptions, ListParams, SortKey};
