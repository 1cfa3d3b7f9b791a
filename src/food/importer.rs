//! 附近餐厅导入
//!
//! 用 Nearby Search 分页抓取中心点附近的餐厅，逐条 upsert 到 restaurants。

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use crate::food::places::{NearbyPlace, NearbyQuery, NearbySearchResp, PlacesProvider, PlacesStatus};
use crate::food::restaurant::{NewRestaurant, RestaurantDao};
use crate::food::schedule::{Clock, Pacer, PAGE_TOKEN_DELAY};

/// Nearby Search 最多 3 页（每页 20 条）
pub const MAX_PAGES: usize = 3;

/// 导入结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub pages: usize,
    /// 接口返回的原始条目数
    pub fetched: usize,
    pub upserted: usize,
    /// 缺少必要字段被丢弃的条目数
    pub skipped: usize,
}

/// 附近餐厅导入器
pub struct PlacesImporter {
    provider: Arc<dyn PlacesProvider>,
    dao: RestaurantDao,
    pacer: Arc<dyn Pacer>,
    clock: Arc<dyn Clock>,
    query: NearbyQuery,
}

impl PlacesImporter {
    pub fn new(
        provider: Arc<dyn PlacesProvider>,
        dao: RestaurantDao,
        pacer: Arc<dyn Pacer>,
        clock: Arc<dyn Clock>,
        query: NearbyQuery,
    ) -> Self {
        Self {
            provider,
            dao,
            pacer,
            clock,
            query,
        }
    }

    /// 执行一次完整导入：先抓完所有页，再逐条写库
    pub async fn run(&self) -> Result<ImportReport> {
        info!(
            "[Importer] 开始导入，中心点: {},{}，半径: {}m",
            self.query.lat, self.query.lng, self.query.radius_meters
        );

        let mut report = ImportReport::default();
        let mut all: Vec<NearbyPlace> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            report.pages += 1;

            // token 签发后要等一下才生效
            if page_token.is_some() {
                self.pacer.wait(PAGE_TOKEN_DELAY).await;
            }

            let resp = self.fetch_page(page_token.as_deref()).await?;
            info!("[Importer] 第 {} 页: {} 条", report.pages, resp.results.len());
            all.extend(resp.results);

            page_token = resp.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() || report.pages >= MAX_PAGES {
                break;
            }
        }

        report.fetched = all.len();
        let now = self.clock.now();

        for place in &all {
            let Some(candidate) = NewRestaurant::from_nearby(place) else {
                debug!("[Importer]   丢弃缺少必要字段的条目: {:?}", place.place_id);
                report.skipped += 1;
                continue;
            };
            self.dao.upsert_restaurant(&candidate, now).await?;
            report.upserted += 1;
        }

        info!(
            "[Importer] ✅ 导入完成，写入 {} 家（原始 {} 条，丢弃 {} 条）",
            report.upserted, report.fetched, report.skipped
        );
        Ok(report)
    }

    /// 抓一页；带 token 的请求遇到 INVALID_REQUEST 时等待后重试一次
    async fn fetch_page(&self, page_token: Option<&str>) -> Result<NearbySearchResp> {
        let mut resp = self.provider.nearby_search(&self.query, page_token).await?;

        if resp.status == PlacesStatus::InvalidRequest && page_token.is_some() {
            warn!("[Importer] next_page_token 尚未生效，等待后重试");
            self.pacer.wait(PAGE_TOKEN_DELAY).await;
            resp = self.provider.nearby_search(&self.query, page_token).await?;
        }

        if !matches!(resp.status, PlacesStatus::Ok | PlacesStatus::ZeroResults) {
            bail!(
                "Nearby API error: {} {}",
                resp.status,
                resp.error_message.as_deref().unwrap_or_default()
            );
        }
        Ok(resp)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::food::db::memory_pool;
    use crate::food::places::types::{Geometry, LatLng};
    use crate::food::places::PlaceDetailsResp;
    use crate::food::restaurant::dao::tests::t0;
    use crate::food::schedule::testing::{FixedClock, RecordingPacer};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 按顺序吐出预设响应，并记录收到的 page_token
    #[derive(Default)]
    pub(crate) struct ScriptedNearby {
        pub pages: Mutex<VecDeque<NearbySearchResp>>,
        pub tokens: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedNearby {
        pub fn new(pages: Vec<NearbySearchResp>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                tokens: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PlacesProvider for ScriptedNearby {
        async fn nearby_search(
            &self,
            _query: &NearbyQuery,
            page_token: Option<&str>,
        ) -> Result<NearbySearchResp> {
            self.tokens.lock().unwrap().push(page_token.map(str::to_string));
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("no more scripted pages"))
        }

        async fn place_details(
            &self,
            _place_id: &str,
            _language: &str,
        ) -> Result<PlaceDetailsResp> {
            bail!("not scripted")
        }
    }

    pub(crate) fn nearby(place_id: &str, name: &str) -> NearbyPlace {
        NearbyPlace {
            place_id: Some(place_id.to_string()),
            name: Some(name.to_string()),
            vicinity: Some("中壢區".to_string()),
            geometry: Some(Geometry {
                location: Some(LatLng {
                    lat: Some(24.958),
                    lng: Some(121.241),
                }),
            }),
            rating: Some(4.1),
            ..Default::default()
        }
    }

    fn page(status: &str, results: Vec<NearbyPlace>, next: Option<&str>) -> NearbySearchResp {
        NearbySearchResp {
            status: PlacesStatus::from(status.to_string()),
            results,
            next_page_token: next.map(str::to_string),
            error_message: None,
        }
    }

    fn query() -> NearbyQuery {
        NearbyQuery {
            lat: 24.9581639,
            lng: 121.2417917,
            radius_meters: 500,
            place_type: "restaurant".to_string(),
            language: "zh-TW".to_string(),
        }
    }

    async fn build_importer(
        provider: Arc<ScriptedNearby>,
        pacer: Arc<RecordingPacer>,
    ) -> (PlacesImporter, RestaurantDao) {
        crate::logging::init_test_logger();
        let dao = RestaurantDao::new(memory_pool().await);
        let importer = PlacesImporter::new(
            provider,
            dao.clone(),
            pacer,
            Arc::new(FixedClock::at(t0())),
            query(),
        );
        (importer, dao)
    }

    #[tokio::test]
    async fn follows_tokens_and_waits_before_each_token_call() -> Result<()> {
        let provider = Arc::new(ScriptedNearby::new(vec![
            page("OK", vec![nearby("p1", "A"), nearby("p2", "B")], Some("t1")),
            page("OK", vec![nearby("p3", "C")], None),
        ]));
        let pacer = Arc::new(RecordingPacer::default());
        let (importer, dao) = build_importer(provider.clone(), pacer.clone()).await;

        let report = importer.run().await?;
        assert_eq!(
            report,
            ImportReport {
                pages: 2,
                fetched: 3,
                upserted: 3,
                skipped: 0
            }
        );
        assert_eq!(
            *provider.tokens.lock().unwrap(),
            vec![None, Some("t1".to_string())]
        );
        assert_eq!(pacer.recorded(), vec![PAGE_TOKEN_DELAY]);
        assert_eq!(dao.count_restaurants().await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn stops_at_page_ceiling() -> Result<()> {
        let provider = Arc::new(ScriptedNearby::new(vec![
            page("OK", vec![nearby("p1", "A")], Some("t1")),
            page("OK", vec![nearby("p2", "B")], Some("t2")),
            page("OK", vec![nearby("p3", "C")], Some("t3")),
            page("OK", vec![nearby("p4", "D")], None),
        ]));
        let pacer = Arc::new(RecordingPacer::default());
        let (importer, dao) = build_importer(provider.clone(), pacer).await;

        let report = importer.run().await?;
        assert_eq!(report.pages, MAX_PAGES);
        assert_eq!(provider.tokens.lock().unwrap().len(), 3);
        assert_eq!(dao.count_restaurants().await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn retries_inactive_token_exactly_once() -> Result<()> {
        let provider = Arc::new(ScriptedNearby::new(vec![
            page("OK", vec![nearby("p1", "A")], Some("t1")),
            page("INVALID_REQUEST", vec![], None),
            page("OK", vec![nearby("p2", "B")], None),
        ]));
        let pacer = Arc::new(RecordingPacer::default());
        let (importer, _dao) = build_importer(provider.clone(), pacer.clone()).await;

        let report = importer.run().await?;
        assert_eq!(report.upserted, 2);
        assert_eq!(
            *provider.tokens.lock().unwrap(),
            vec![None, Some("t1".to_string()), Some("t1".to_string())]
        );
        assert_eq!(pacer.recorded(), vec![PAGE_TOKEN_DELAY, PAGE_TOKEN_DELAY]);
        Ok(())
    }

    #[tokio::test]
    async fn second_invalid_request_aborts() {
        let provider = Arc::new(ScriptedNearby::new(vec![
            page("OK", vec![nearby("p1", "A")], Some("t1")),
            page("INVALID_REQUEST", vec![], None),
            page("INVALID_REQUEST", vec![], None),
        ]));
        let (importer, dao) = build_importer(provider, Arc::new(RecordingPacer::default())).await;

        assert!(importer.run().await.is_err());
        // 抓页失败时一条都不写
        assert_eq!(dao.count_restaurants().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_request_without_token_is_not_retried() {
        let provider = Arc::new(ScriptedNearby::new(vec![page("INVALID_REQUEST", vec![], None)]));
        let (importer, _dao) =
            build_importer(provider.clone(), Arc::new(RecordingPacer::default())).await;

        assert!(importer.run().await.is_err());
        assert_eq!(provider.tokens.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn error_status_aborts_and_zero_results_does_not() -> Result<()> {
        let provider = Arc::new(ScriptedNearby::new(vec![page("REQUEST_DENIED", vec![], None)]));
        let (importer, _dao) = build_importer(provider, Arc::new(RecordingPacer::default())).await;
        let err = importer.run().await.unwrap_err();
        assert!(err.to_string().contains("REQUEST_DENIED"));

        let provider = Arc::new(ScriptedNearby::new(vec![page("ZERO_RESULTS", vec![], None)]));
        let (importer, _dao) = build_importer(provider, Arc::new(RecordingPacer::default())).await;
        assert_eq!(importer.run().await?.upserted, 0);
        Ok(())
    }

    #[tokio::test]
    async fn incomplete_candidates_are_skipped() -> Result<()> {
        let mut no_location = nearby("p2", "B");
        no_location.geometry = None;
        let mut no_id = nearby("", "C");
        no_id.place_id = None;

        let provider = Arc::new(ScriptedNearby::new(vec![page(
            "OK",
            vec![nearby("p1", "A"), no_location, no_id],
            None,
        )]));
        let (importer, dao) = build_importer(provider, Arc::new(RecordingPacer::default())).await;

        let report = importer.run().await?;
        assert_eq!(report.fetched, 3);
        assert_eq!(report.upserted, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(dao.count_restaurants().await?, 1);
        Ok(())
    }
}
