//! 列表查询条件与 SQL 组装
//!
//! 每个条件都是独立的小函数，最终用 [`sqlx::QueryBuilder`] 拼出带绑定参数的语句。

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

pub const DEFAULT_LIMIT: i64 = 30;
pub const MAX_LIMIT: i64 = 100;

/// 列表排序方式，null 一律排在最后
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// 评分高到低
    #[default]
    Rating,
    /// 评论数多到少
    Reviews,
    /// 价位低到高
    Price,
}

impl SortKey {
    /// 无法识别的值按评分排序
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "reviews" => SortKey::Reviews,
            "price" => SortKey::Price,
            _ => SortKey::Rating,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Rating => "rating",
            SortKey::Reviews => "reviews",
            SortKey::Price => "price",
        }
    }

    pub fn order_clause(&self) -> &'static str {
        match self {
            SortKey::Rating => "r.rating DESC NULLS LAST, r.id ASC",
            SortKey::Reviews => "r.user_ratings_total DESC NULLS LAST, r.id ASC",
            SortKey::Price => "r.price_level ASC NULLS LAST, r.id ASC",
        }
    }
}

/// `GET /api/restaurants` 的原始查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub open: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// 规整后的列表条件
#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    pub keyword: Option<String>,
    pub open_now: bool,
    pub limit: i64,
    pub sort: SortKey,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            keyword: None,
            open_now: false,
            limit: DEFAULT_LIMIT,
            sort: SortKey::Rating,
        }
    }
}

impl From<ListParams> for ListOptions {
    fn from(params: ListParams) -> Self {
        let keyword = params
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        Self {
            keyword,
            open_now: params.open.as_deref() == Some("true"),
            limit: clamp_limit(params.limit.as_deref()),
            sort: params.sort.as_deref().map(SortKey::parse).unwrap_or_default(),
        }
    }
}

/// 缺省 30，上限 100，下限 1；解析不了按缺省
pub fn clamp_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(1, MAX_LIMIT)
}

/// 关键字转成 LIKE 模式，`%` `_` `\` 按字面匹配
pub fn keyword_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

const LIST_SELECT: &str = r#"
    SELECT
        r.id,
        r.google_place_id,
        r.name,
        r.address,
        r.lat,
        r.lng,
        r.rating,
        r.user_ratings_total,
        r.price_level,
        r.opening_now,
        r.business_status,
        r.phone,
        r.website,
        r.google_maps_url,
        r.delivery,
        r.dine_in,
        r.takeout,
        r.reservable,
        r.wheelchair_accessible_entrance,
        r.details_fetched_at,
        (
            SELECT p.photo_reference
            FROM restaurant_photos p
            WHERE p.restaurant_id = r.id
            ORDER BY p.id ASC
            LIMIT 1
        ) AS photo_reference
    FROM restaurants r
"#;

/// 追加 WHERE 条件
pub fn push_filters(qb: &mut QueryBuilder<'static, Sqlite>, options: &ListOptions) {
    let mut first = true;
    let mut next_clause = |qb: &mut QueryBuilder<'static, Sqlite>| {
        qb.push(if first { " WHERE " } else { " AND " });
        first = false;
    };

    if let Some(keyword) = &options.keyword {
        // 两边都用 Unicode 小写比较，SQLite 自带的 LIKE 只折叠 ASCII
        next_clause(qb);
        qb.push("r.name_folded LIKE ")
            .push_bind(keyword_pattern(&keyword.to_lowercase()))
            .push(" ESCAPE '\\'");
    }

    if options.open_now {
        next_clause(qb);
        qb.push("r.opening_now = 1");
    }
}

/// 组装完整的列表查询
pub fn build_list_query(options: &ListOptions) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new(LIST_SELECT);
    push_filters(&mut qb, options);
    qb.push(" ORDER BY ").push(options.sort.order_clause());
    qb.push(" LIMIT ").push_bind(options.limit.clamp(1, MAX_LIMIT));
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        q: Option<&str>,
        open: Option<&str>,
        limit: Option<&str>,
        sort: Option<&str>,
    ) -> ListParams {
        ListParams {
            q: q.map(str::to_string),
            open: open.map(str::to_string),
            limit: limit.map(str::to_string),
            sort: sort.map(str::to_string),
        }
    }

    #[test]
    fn limit_defaults_and_caps() {
        assert_eq!(clamp_limit(None), 30);
        assert_eq!(clamp_limit(Some("60")), 60);
        assert_eq!(clamp_limit(Some("500")), 100);
        assert_eq!(clamp_limit(Some("0")), 1);
        assert_eq!(clamp_limit(Some("abc")), 30);
    }

    #[test]
    fn unknown_sort_falls_back_to_rating() {
        assert_eq!(SortKey::parse("reviews"), SortKey::Reviews);
        assert_eq!(SortKey::parse("price"), SortKey::Price);
        assert_eq!(SortKey::parse("distance"), SortKey::Rating);
        assert_eq!(SortKey::parse(""), SortKey::Rating);
    }

    #[test]
    fn params_are_normalized() {
        let options =
            ListOptions::from(params(Some("  Mint "), Some("true"), Some("500"), Some("price")));
        assert_eq!(options.keyword.as_deref(), Some("Mint"));
        assert!(options.open_now);
        assert_eq!(options.limit, 100);
        assert_eq!(options.sort, SortKey::Price);

        let options = ListOptions::from(params(Some("   "), Some("1"), None, None));
        assert_eq!(options, ListOptions::default());
    }

    #[test]
    fn keyword_wildcards_are_escaped() {
        assert_eq!(keyword_pattern("Mint"), "%Mint%");
        assert_eq!(keyword_pattern("100%_a"), "%100\\%\\_a%");
    }

    #[test]
    fn filters_compose_into_where_clause() {
        let options = ListOptions {
            keyword: Some("Mint".to_string()),
            open_now: true,
            limit: 10,
            sort: SortKey::Reviews,
        };
        let qb = build_list_query(&options);
        let sql = qb.sql();
        assert!(sql.contains(" WHERE r.name_folded LIKE ? ESCAPE '\\' AND r.opening_now = 1"));
        assert!(sql.contains("ORDER BY r.user_ratings_total DESC NULLS LAST"));
        assert!(sql.trim_end().ends_with("LIMIT ?"));

        let qb = build_list_query(&ListOptions::default());
        assert!(!qb.sql().contains("WHERE r."));
        assert!(qb.sql().contains("ORDER BY r.rating DESC NULLS LAST"));
    }
}
