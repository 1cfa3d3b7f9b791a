//! 餐厅数据访问层（DAO）
//!
//! 负责 restaurants / restaurant_photos 两张表的全部读写，基于 sqlx。

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

use crate::food::restaurant::models::{
    DetailsUpdate, NewRestaurant, Restaurant, RestaurantPhoto, RestaurantSummary,
};
use crate::food::restaurant::query::{build_list_query, ListOptions};

/// 餐厅 DAO（基于 sqlx）
#[derive(Clone)]
pub struct RestaurantDao {
    db: Pool<Sqlite>,
}

impl RestaurantDao {
    /// 创建新的餐厅 DAO
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.db
    }

    /// 插入或更新餐厅基本信息（以 google_place_id 为冲突键，整行覆盖）
    ///
    /// 不会动补充详情写入的字段。
    pub async fn upsert_restaurant(&self, r: &NewRestaurant, now: DateTime<Utc>) -> Result<()> {
        let sql = r#"
            INSERT INTO restaurants (
                google_place_id, name, name_folded, address, lat, lng,
                rating, user_ratings_total, price_level,
                opening_now, business_status,
                updated_at
            ) VALUES (
                ?,?,?,?,?,?,
                ?,?,?,
                ?,?,
                ?
            )
            ON CONFLICT(google_place_id) DO UPDATE SET
                name = excluded.name,
                name_folded = excluded.name_folded,
                address = excluded.address,
                lat = excluded.lat,
                lng = excluded.lng,
                rating = excluded.rating,
                user_ratings_total = excluded.user_ratings_total,
                price_level = excluded.price_level,
                opening_now = excluded.opening_now,
                business_status = excluded.business_status,
                updated_at = excluded.updated_at
        "#;

        sqlx::query(sql)
            .bind(&r.google_place_id)
            .bind(&r.name)
            .bind(r.name.to_lowercase())
            .bind(&r.address)
            .bind(r.lat)
            .bind(r.lng)
            .bind(r.rating)
            .bind(r.user_ratings_total)
            .bind(r.price_level)
            .bind(r.opening_now)
            .bind(&r.business_status)
            .bind(now)
            .execute(&self.db)
            .await
            .context("插入或更新餐厅失败")?;
        Ok(())
    }

    /// 挑出需要补充详情的餐厅 place_id
    ///
    /// 从未补充过的排最前，其次是最久以前补充的；同一时间的按 updated_at 新到旧。
    pub async fn pick_enrich_targets(
        &self,
        stale_before: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT google_place_id
            FROM restaurants
            WHERE details_fetched_at IS NULL
               OR details_fetched_at < ?
            ORDER BY details_fetched_at ASC NULLS FIRST, updated_at DESC
            LIMIT ?
            "#,
        )
        .bind(stale_before)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("查询待补充详情的餐厅失败")?;

        let ids = rows
            .into_iter()
            .map(|m| m.try_get::<String, _>("google_place_id"))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("[RestaurantDAO] 待补充详情的餐厅共 {} 个", ids.len());
        Ok(ids)
    }

    /// 写入详情并整组替换照片（同一事务，失败整体回滚）
    ///
    /// 餐厅不存在时返回错误，事务随之回滚。
    pub async fn apply_details(
        &self,
        google_place_id: &str,
        update: &DetailsUpdate,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut tx = self.db.begin().await.context("开启事务失败")?;

        let restaurant_id: i64 = sqlx::query(
            r#"
            UPDATE restaurants
            SET
                phone = ?,
                website = ?,
                google_maps_url = ?,
                utc_offset_minutes = ?,
                delivery = ?,
                dine_in = ?,
                takeout = ?,
                reservable = ?,
                wheelchair_accessible_entrance = ?,
                opening_hours_json = ?,
                details_fetched_at = ?,
                updated_at = ?
            WHERE google_place_id = ?
            RETURNING id
            "#,
        )
        .bind(&update.phone)
        .bind(&update.website)
        .bind(&update.google_maps_url)
        .bind(update.utc_offset_minutes)
        .bind(update.delivery)
        .bind(update.dine_in)
        .bind(update.takeout)
        .bind(update.reservable)
        .bind(update.wheelchair_accessible_entrance)
        .bind(&update.opening_hours_json)
        .bind(now)
        .bind(now)
        .bind(google_place_id)
        .fetch_optional(&mut *tx)
        .await
        .context("更新餐厅详情失败")?
        .ok_or_else(|| anyhow::anyhow!("餐厅不存在: {}", google_place_id))?
        .try_get("id")?;

        // 先清空再重建，照片集合永远等于最近一次的响应
        sqlx::query("DELETE FROM restaurant_photos WHERE restaurant_id = ?")
            .bind(restaurant_id)
            .execute(&mut *tx)
            .await
            .context("清空餐厅照片失败")?;

        for p in &update.photos {
            sqlx::query(
                r#"
                INSERT INTO restaurant_photos (restaurant_id, photo_reference, width, height)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(restaurant_id, photo_reference) DO NOTHING
                "#,
            )
            .bind(restaurant_id)
            .bind(&p.photo_reference)
            .bind(p.width)
            .bind(p.height)
            .execute(&mut *tx)
            .await
            .context("写入餐厅照片失败")?;
        }

        tx.commit().await.context("提交事务失败")?;
        debug!(
            "[RestaurantDAO] 餐厅 {} 详情已更新，照片 {} 张",
            google_place_id,
            update.photos.len()
        );
        Ok(())
    }

    /// 列表查询
    pub async fn list_restaurants(&self, options: &ListOptions) -> Result<Vec<RestaurantSummary>> {
        let mut qb = build_list_query(options);
        let rows = qb
            .build()
            .fetch_all(&self.db)
            .await
            .context("查询餐厅列表失败")?;

        let list = rows
            .iter()
            .map(summary_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        debug!("[RestaurantDAO] 餐厅列表共 {} 条", list.len());
        Ok(list)
    }

    /// 按内部 id 取单个餐厅
    pub async fn get_restaurant(&self, id: i64) -> Result<Option<Restaurant>> {
        let row = sqlx::query("SELECT * FROM restaurants WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("查询餐厅失败")?;

        row.as_ref().map(restaurant_from_row).transpose()
    }

    /// 按 google_place_id 取单个餐厅
    pub async fn get_by_place_id(&self, google_place_id: &str) -> Result<Option<Restaurant>> {
        let row = sqlx::query("SELECT * FROM restaurants WHERE google_place_id = ?")
            .bind(google_place_id)
            .fetch_optional(&self.db)
            .await
            .context("查询餐厅失败")?;

        row.as_ref().map(restaurant_from_row).transpose()
    }

    /// 餐厅的全部照片，按 id 升序
    pub async fn get_photos(&self, restaurant_id: i64) -> Result<Vec<RestaurantPhoto>> {
        let rows = sqlx::query(
            r#"
            SELECT id, restaurant_id, photo_reference, width, height
            FROM restaurant_photos
            WHERE restaurant_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.db)
        .await
        .context("查询餐厅照片失败")?;

        rows.into_iter()
            .map(|m| {
                Ok(RestaurantPhoto {
                    id: m.try_get("id")?,
                    restaurant_id: m.try_get("restaurant_id")?,
                    photo_reference: m.try_get("photo_reference")?,
                    width: m.try_get("width")?,
                    height: m.try_get("height")?,
                })
            })
            .collect()
    }

    pub async fn count_restaurants(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM restaurants")
            .fetch_one(&self.db)
            .await
            .context("统计餐厅数量失败")?;
        Ok(count)
    }

    /// 数据库当前时间（健康检查用）
    pub async fn db_time(&self) -> Result<String, sqlx::Error> {
        sqlx::query_scalar("SELECT CURRENT_TIMESTAMP")
            .fetch_one(&self.db)
            .await
    }
}

fn summary_from_row(m: &SqliteRow) -> Result<RestaurantSummary, sqlx::Error> {
    Ok(RestaurantSummary {
        id: m.try_get("id")?,
        google_place_id: m.try_get("google_place_id")?,
        name: m.try_get("name")?,
        address: m.try_get("address")?,
        lat: m.try_get("lat")?,
        lng: m.try_get("lng")?,
        rating: m.try_get("rating")?,
        user_ratings_total: m.try_get("user_ratings_total")?,
        price_level: m.try_get("price_level")?,
        opening_now: m.try_get("opening_now")?,
        business_status: m.try_get("business_status")?,
        phone: m.try_get("phone")?,
        website: m.try_get("website")?,
        google_maps_url: m.try_get("google_maps_url")?,
        delivery: m.try_get("delivery")?,
        dine_in: m.try_get("dine_in")?,
        takeout: m.try_get("takeout")?,
        reservable: m.try_get("reservable")?,
        wheelchair_accessible_entrance: m.try_get("wheelchair_accessible_entrance")?,
        details_fetched_at: m.try_get("details_fetched_at")?,
        photo_reference: m.try_get("photo_reference")?,
    })
}

fn restaurant_from_row(m: &SqliteRow) -> Result<Restaurant> {
    let opening_hours_json: Option<String> = m.try_get("opening_hours_json")?;
    let opening_hours_json = opening_hours_json
        .map(|s| serde_json::from_str(&s))
        .transpose()
        .context("解析 opening_hours_json 失败")?;

    Ok(Restaurant {
        id: m.try_get("id")?,
        google_place_id: m.try_get("google_place_id")?,
        name: m.try_get("name")?,
        address: m.try_get("address")?,
        lat: m.try_get("lat")?,
        lng: m.try_get("lng")?,
        rating: m.try_get("rating")?,
        user_ratings_total: m.try_get("user_ratings_total")?,
        price_level: m.try_get("price_level")?,
        opening_now: m.try_get("opening_now")?,
        business_status: m.try_get("business_status")?,
        phone: m.try_get("phone")?,
        website: m.try_get("website")?,
        google_maps_url: m.try_get("google_maps_url")?,
        utc_offset_minutes: m.try_get("utc_offset_minutes")?,
        delivery: m.try_get("delivery")?,
        dine_in: m.try_get("dine_in")?,
        takeout: m.try_get("takeout")?,
        reservable: m.try_get("reservable")?,
        wheelchair_accessible_entrance: m.try_get("wheelchair_accessible_entrance")?,
        opening_hours_json,
        details_fetched_at: m.try_get("details_fetched_at")?,
        updated_at: m.try_get("updated_at")?,
    })
}
