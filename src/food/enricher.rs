//! 餐厅详情补充
//!
//! 从 restaurants 取出没补过或太久没补的店，用 Place Details 抓电话、网站、
//! 营业时间、设施和照片，再在同一事务里更新餐厅和照片表。

use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Duration as ChronoDuration;
use tracing::{error, info};

use crate::food::places::{PlacesProvider, PlacesStatus};
use crate::food::restaurant::{DetailsUpdate, RestaurantDao};
use crate::food::schedule::{Clock, Pacer, BETWEEN_TARGETS_DELAY};

/// 一次最多补几家
pub const BATCH_LIMIT: i64 = 50;
/// 详情多少天更新一次
pub const REFRESH_DAYS: i64 = 14;

/// 补充结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub targets: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// 餐厅详情补充器
pub struct DetailsEnricher {
    provider: Arc<dyn PlacesProvider>,
    dao: RestaurantDao,
    pacer: Arc<dyn Pacer>,
    clock: Arc<dyn Clock>,
    language: String,
}

impl DetailsEnricher {
    pub fn new(
        provider: Arc<dyn PlacesProvider>,
        dao: RestaurantDao,
        pacer: Arc<dyn Pacer>,
        clock: Arc<dyn Clock>,
        language: String,
    ) -> Self {
        Self {
            provider,
            dao,
            pacer,
            clock,
            language,
        }
    }

    /// 执行一批补充；单家失败只计数，不中断整批
    pub async fn run(&self) -> Result<EnrichReport> {
        let stale_before = self.clock.now() - ChronoDuration::days(REFRESH_DAYS);
        let targets = self.dao.pick_enrich_targets(stale_before, BATCH_LIMIT).await?;
        info!("[Enricher] 待补充: {} 家", targets.len());

        let mut report = EnrichReport {
            targets: targets.len(),
            ..Default::default()
        };

        for place_id in &targets {
            match self.enrich_one(place_id).await {
                Ok(()) => {
                    report.succeeded += 1;
                    info!("[Enricher] [OK] {}", place_id);
                }
                Err(e) => {
                    report.failed += 1;
                    error!("[Enricher] [FAIL] {}: {:#}", place_id, e);
                }
            }

            // 限流：成功失败都要等
            self.pacer.wait(BETWEEN_TARGETS_DELAY).await;
        }

        info!(
            "[Enricher] ✅ 完成，OK={}, FAIL={}",
            report.succeeded, report.failed
        );
        Ok(report)
    }

    async fn enrich_one(&self, place_id: &str) -> Result<()> {
        let resp = self.provider.place_details(place_id, &self.language).await?;

        if resp.status != PlacesStatus::Ok {
            bail!(
                "Details API error: {} {}",
                resp.status,
                resp.error_message.as_deref().unwrap_or_default()
            );
        }
        let Some(details) = resp.result else {
            bail!("Details API error: 响应中缺少 result 字段");
        };

        let update = DetailsUpdate::from_details(&details);
        self.dao
            .apply_details(place_id, &update, self.clock.now())
            .await
    }
}
