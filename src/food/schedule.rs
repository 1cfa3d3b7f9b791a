//! 批处理脚本的调用节奏：固定间隔 + 可替换的时钟
//!
//! Places API 的 next_page_token 需要一段时间才生效，详情接口也有配额，
//! 所以批处理每次外部调用之间都按固定间隔等待（不是自适应退避）。
//! 测试里换成 [`NoDelay`] 即可零等待运行。

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 打 next_page_token 前的等待，以及 token 未生效时重试前的等待
pub const PAGE_TOKEN_DELAY: Duration = Duration::from_millis(1500);
/// 详情补充时每个目标之间的间隔
pub const BETWEEN_TARGETS_DELAY: Duration = Duration::from_millis(200);

/// 调用间隔策略
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn wait(&self, delay: Duration);
}

/// 真实等待（tokio 定时器）
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// 不等待
pub struct NoDelay;

#[async_trait]
impl Pacer for NoDelay {
    async fn wait(&self, _delay: Duration) {}
}

/// 时间来源，写库时的 updated_at / details_fetched_at 都从这里取
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// 记录每次请求的等待时长
    #[derive(Default)]
    pub struct RecordingPacer {
        pub waits: Mutex<Vec<Duration>>,
    }

    impl RecordingPacer {
        pub fn recorded(&self) -> Vec<Duration> {
            self.waits.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Pacer for RecordingPacer {
        async fn wait(&self, delay: Duration) {
            self.waits.lock().unwrap().push(delay);
        }
    }

    /// 可手动拨动的时钟
    pub struct FixedClock(pub Mutex<DateTime<Utc>>);

    impl FixedClock {
        pub fn at(t: DateTime<Utc>) -> Self {
            Self(Mutex::new(t))
        }

        pub fn set(&self, t: DateTime<Utc>) {
            *self.0.lock().unwrap() = t;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }
}
