//! 餐厅本地模型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::food::places::{NearbyPlace, PlaceDetails};

/// 导入候选（Nearby Search 回来就有的基本字段）
#[derive(Debug, Clone, PartialEq)]
pub struct NewRestaurant {
    pub google_place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i64>,
    pub price_level: Option<i64>,
    /// 导入当下的快照，不是实时营业状态
    pub opening_now: Option<bool>,
    pub business_status: Option<String>,
}

impl NewRestaurant {
    /// 映射一条 Nearby 结果；place_id / name / lat / lng 任一缺失返回 None
    pub fn from_nearby(place: &NearbyPlace) -> Option<Self> {
        let google_place_id = place.place_id.clone().filter(|s| !s.is_empty())?;
        let name = place.name.clone().filter(|s| !s.is_empty())?;
        let location = place.geometry.as_ref()?.location.as_ref()?;
        let (lat, lng) = (location.lat?, location.lng?);

        // 地址：Nearby Search 一般用 vicinity
        let address = place
            .vicinity
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| place.formatted_address.clone().filter(|s| !s.is_empty()));

        Some(Self {
            google_place_id,
            name,
            address,
            lat,
            lng,
            rating: place.rating,
            user_ratings_total: place.user_ratings_total,
            price_level: place.price_level,
            opening_now: place.opening_hours.as_ref().and_then(|o| o.open_now),
            business_status: place.business_status.clone(),
        })
    }
}

/// 补充详情写库的内容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsUpdate {
    pub phone: Option<String>,
    pub website: Option<String>,
    pub google_maps_url: Option<String>,
    pub utc_offset_minutes: Option<i64>,
    pub delivery: Option<bool>,
    pub dine_in: Option<bool>,
    pub takeout: Option<bool>,
    pub reservable: Option<bool>,
    pub wheelchair_accessible_entrance: Option<bool>,
    /// opening_hours 原样序列化
    pub opening_hours_json: Option<String>,
    pub photos: Vec<NewPhoto>,
}

impl DetailsUpdate {
    pub fn from_details(details: &PlaceDetails) -> Self {
        let photos = details
            .photos
            .iter()
            .filter_map(|p| {
                let photo_reference = p.photo_reference.clone().filter(|s| !s.is_empty())?;
                Some(NewPhoto {
                    photo_reference,
                    // 0 和缺失一样当成未知
                    width: p.width.filter(|w| *w != 0),
                    height: p.height.filter(|h| *h != 0),
                })
            })
            .collect();

        Self {
            phone: details.formatted_phone_number.clone().filter(|s| !s.is_empty()),
            website: details.website.clone().filter(|s| !s.is_empty()),
            google_maps_url: details.url.clone().filter(|s| !s.is_empty()),
            utc_offset_minutes: details.utc_offset_minutes,
            delivery: details.delivery,
            dine_in: details.dine_in,
            takeout: details.takeout,
            reservable: details.reservable,
            wheelchair_accessible_entrance: details.wheelchair_accessible_entrance,
            opening_hours_json: details.opening_hours.as_ref().map(|v| v.to_string()),
            photos,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPhoto {
    pub photo_reference: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// 列表接口的餐厅投影，只带一张照片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSummary {
    pub id: i64,
    pub google_place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i64>,
    pub price_level: Option<i64>,
    /// 截至最近一次导入的营业状态
    pub opening_now: Option<bool>,
    pub business_status: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub google_maps_url: Option<String>,
    pub delivery: Option<bool>,
    pub dine_in: Option<bool>,
    pub takeout: Option<bool>,
    pub reservable: Option<bool>,
    pub wheelchair_accessible_entrance: Option<bool>,
    pub details_fetched_at: Option<DateTime<Utc>>,
    /// 序号最小的那张照片
    pub photo_reference: Option<String>,
}

/// 单个餐厅的完整记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub google_place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i64>,
    pub price_level: Option<i64>,
    pub opening_now: Option<bool>,
    pub business_status: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub google_maps_url: Option<String>,
    pub utc_offset_minutes: Option<i64>,
    pub delivery: Option<bool>,
    pub dine_in: Option<bool>,
    pub takeout: Option<bool>,
    pub reservable: Option<bool>,
    pub wheelchair_accessible_entrance: Option<bool>,
    pub opening_hours_json: Option<serde_json::Value>,
    pub details_fetched_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// 照片引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantPhoto {
    pub id: i64,
    pub restaurant_id: i64,
    pub photo_reference: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
}
