//! 卡片视图：收藏置顶 + 关键字过滤

use crate::food::client::liked::{LikedSet, LikedStore};
use crate::food::restaurant::RestaurantSummary;

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/220x150";
const PHOTO_MAX_WIDTH: u32 = 800;
const PHOTO_URL: &str = "https://maps.googleapis.com/maps/api/place/photo";

/// 渲染后的一张卡片
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub liked: bool,
    pub image_url: String,
    pub rating_line: Option<String>,
    pub price_label: Option<String>,
    /// 营业状态是最近一次导入时的快照
    pub open_now_label: Option<String>,
}

impl CardView {
    pub fn heart(&self) -> &'static str {
        if self.liked {
            "❤️"
        } else {
            "🤍"
        }
    }
}

/// 价位对应的文字
pub fn price_label(level: i64) -> String {
    match level {
        1 => "NT$100~200".to_string(),
        2 => "NT$200~400".to_string(),
        3 => "NT$400~600".to_string(),
        4 => "NT$600以上".to_string(),
        other => other.to_string(),
    }
}

/// 照片地址；没配 key 或没有照片时返回 None
pub fn photo_url(photo_reference: Option<&str>, api_key: Option<&str>) -> Option<String> {
    let reference = photo_reference.filter(|r| !r.is_empty())?;
    let key = api_key.filter(|k| !k.is_empty())?;
    let url = reqwest::Url::parse_with_params(
        PHOTO_URL,
        &[
            ("maxwidth", PHOTO_MAX_WIDTH.to_string()),
            ("photo_reference", reference.to_string()),
            ("key", key.to_string()),
        ],
    )
    .ok()?;
    Some(url.to_string())
}

/// 收藏的排在前面（稳定排序），再按关键字过滤店名或地址
pub fn render<S: LikedStore>(
    stores: &[RestaurantSummary],
    keyword: &str,
    liked: &LikedSet<S>,
    photo_api_key: Option<&str>,
) -> Vec<CardView> {
    let keyword = keyword.trim();

    let mut ordered: Vec<&RestaurantSummary> = stores.iter().collect();
    ordered.sort_by_key(|s| !liked.contains(s.id));

    ordered
        .into_iter()
        .filter(|s| {
            keyword.is_empty()
                || s.name.contains(keyword)
                || s.address.as_deref().unwrap_or_default().contains(keyword)
        })
        .map(|s| CardView {
            id: s.id,
            name: if s.name.is_empty() {
                "(未命名)".to_string()
            } else {
                s.name.clone()
            },
            address: s.address.clone().filter(|a| !a.is_empty()),
            liked: liked.contains(s.id),
            image_url: photo_url(s.photo_reference.as_deref(), photo_api_key)
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            rating_line: s.rating.map(|rating| {
                format!("⭐ {} ({}人評分)", rating, s.user_ratings_total.unwrap_or(0))
            }),
            price_label: s.price_level.map(price_label),
            open_now_label: s.opening_now.map(|open| {
                let label = if open { "是" } else { "否" };
                format!("營業中（匯入時）: {}", label)
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::client::liked::MemoryStore;

    fn store(id: i64, name: &str, address: &str) -> RestaurantSummary {
        RestaurantSummary {
            id,
            google_place_id: format!("p{id}"),
            name: name.to_string(),
            address: Some(address.to_string()),
            lat: 24.95,
            lng: 121.24,
            rating: Some(4.2),
            user_ratings_total: None,
            price_level: Some(3),
            opening_now: Some(false),
            business_status: None,
            phone: None,
            website: None,
            google_maps_url: None,
            delivery: None,
            dine_in: None,
            takeout: None,
            reservable: None,
            wheelchair_accessible_entrance: None,
            details_fetched_at: None,
            photo_reference: Some("ref".to_string()),
        }
    }

    fn sample() -> Vec<RestaurantSummary> {
        vec![
            store(1, "慕森", "320桃園市中壢區大仁五街45號"),
            store(2, "Mint Pasta", "320桃園市中壢區新中北路61號"),
            store(3, "豆花", "320桃園市中壢區實踐路"),
        ]
    }

    #[test]
    fn liked_items_move_first_and_others_keep_order() {
        let mut liked = LikedSet::open(MemoryStore::default());
        liked.toggle(2).unwrap();

        let cards = render(&sample(), "", &liked, None);
        let ids: Vec<i64> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(cards[0].heart(), "❤️");
        assert_eq!(cards[1].heart(), "🤍");
    }

    #[test]
    fn keyword_matches_name_or_address() {
        let liked = LikedSet::open(MemoryStore::default());

        let cards = render(&sample(), "Mint", &liked, None);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Mint Pasta");

        let cards = render(&sample(), "大仁", &liked, None);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, 1);

        assert_eq!(render(&sample(), "  ", &liked, None).len(), 3);
    }

    #[test]
    fn card_labels() {
        let liked = LikedSet::open(MemoryStore::default());
        let cards = render(&sample(), "", &liked, None);
        let card = &cards[0];
        assert_eq!(card.rating_line.as_deref(), Some("⭐ 4.2 (0人評分)"));
        assert_eq!(card.price_label.as_deref(), Some("NT$400~600"));
        assert_eq!(card.open_now_label.as_deref(), Some("營業中（匯入時）: 否"));
        assert_eq!(card.image_url, PLACEHOLDER_IMAGE);
        assert_eq!(price_label(7), "7");
    }

    #[test]
    fn photo_url_needs_reference_and_key() {
        assert_eq!(photo_url(Some("abc"), None), None);
        assert_eq!(photo_url(None, Some("k")), None);
        let url = photo_url(Some("a b"), Some("k")).unwrap();
        assert!(url.starts_with(PHOTO_URL));
        assert!(url.contains("maxwidth=800"));
        assert!(url.contains("photo_reference=a+b"));
    }
}
