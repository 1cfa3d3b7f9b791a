//! Places API DTO（请求和响应结构体）

use serde::{Deserialize, Deserializer, Serialize};

/// 反序列化数组字段，处理 null 值
pub(crate) fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Places API 的 status 字段
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PlacesStatus {
    Ok,
    ZeroResults,
    /// 常见于 next_page_token 刚签发还没生效
    InvalidRequest,
    /// NOT_FOUND / REQUEST_DENIED / OVER_QUERY_LIMIT 等
    Other(String),
}

impl From<String> for PlacesStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OK" => PlacesStatus::Ok,
            "ZERO_RESULTS" => PlacesStatus::ZeroResults,
            "INVALID_REQUEST" => PlacesStatus::InvalidRequest,
            _ => PlacesStatus::Other(s),
        }
    }
}

impl std::fmt::Display for PlacesStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacesStatus::Ok => f.write_str("OK"),
            PlacesStatus::ZeroResults => f.write_str("ZERO_RESULTS"),
            PlacesStatus::InvalidRequest => f.write_str("INVALID_REQUEST"),
            PlacesStatus::Other(s) => f.write_str(s),
        }
    }
}

/// Nearby Search 的固定查询条件
#[derive(Debug, Clone)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_meters: u32,
    /// 例如 `restaurant`
    pub place_type: String,
    /// 例如 `zh-TW`
    pub language: String,
}

/// Nearby Search 一页响应
#[derive(Debug, Clone, Deserialize)]
pub struct NearbySearchResp {
    pub status: PlacesStatus,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub results: Vec<NearbyPlace>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Nearby Search 单条结果，字段都可能缺失
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearbyPlace {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub vicinity: Option<String>,
    pub formatted_address: Option<String>,
    pub geometry: Option<Geometry>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i64>,
    pub price_level: Option<i64>,
    pub opening_hours: Option<OpenNow>,
    pub business_status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenNow {
    pub open_now: Option<bool>,
}

/// Place Details 响应
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetailsResp {
    pub status: PlacesStatus,
    #[serde(default)]
    pub result: Option<PlaceDetails>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Place Details 结果（只包含 [`DETAILS_FIELDS`] 请求的字段）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub website: Option<String>,
    pub url: Option<String>,
    /// 原样保存为 JSON
    pub opening_hours: Option<serde_json::Value>,
    pub utc_offset_minutes: Option<i64>,
    pub delivery: Option<bool>,
    pub dine_in: Option<bool>,
    pub takeout: Option<bool>,
    pub reservable: Option<bool>,
    pub wheelchair_accessible_entrance: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub photos: Vec<PlacePhoto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacePhoto {
    pub photo_reference: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// 只抓用得到的 fields（省配额、省时间）
pub const DETAILS_FIELDS: &[&str] = &[
    "place_id",
    "formatted_phone_number",
    "international_phone_number",
    "website",
    "url",
    "opening_hours",
    "utc_offset_minutes",
    "delivery",
    "dine_in",
    "takeout",
    "reservable",
    "wheelchair_accessible_entrance",
    "photos",
];
