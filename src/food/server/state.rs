use std::sync::Arc;

use sqlx::{Pool, Sqlite};

use crate::food::{config::AppConfig, restaurant::RestaurantDao};

pub struct State {
    pub config: AppConfig,
    pub restaurants: RestaurantDao,
}

impl State {
    pub fn new(config: AppConfig, db: Pool<Sqlite>) -> Arc<Self> {
        Arc::new(Self {
            config,
            restaurants: RestaurantDao::new(db),
        })
    }
}
