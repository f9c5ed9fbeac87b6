//! 周期任务
//!
//! 服务状态的周期刷新以一个 tick 流驱动，并包在 `Abortable` 里；
//! `PollHandle` 被 cancel 或 drop 时任务随之结束。

use futures::Stream;
use futures::future::AbortHandle;
use std::time::Duration;

/// 服务状态刷新周期
pub const SERVICES_POLL_PERIOD: Duration = Duration::from_secs(30);

/// 可取消的周期任务句柄；drop 时自动取消
#[derive(Debug)]
pub struct PollHandle {
    abort: AbortHandle,
}

impl PollHandle {
    pub(crate) fn new(abort: AbortHandle) -> Self {
        Self { abort }
    }

    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 以 tokio 定时器生成 tick 流
///
/// 第一个 tick 在激活后一个周期到达；错过的 tick 直接丢弃，
/// 后续 tick 仍对齐到激活时刻的整数倍周期。
#[cfg(feature = "native")]
pub fn interval_ticks(period: Duration) -> impl Stream<Item = ()> {
    use futures::StreamExt;
    use tokio::time::{Instant, MissedTickBehavior, interval_at};

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio_stream::wrappers::IntervalStream::new(interval).map(|_| ())
}

/// 不产生任何 tick，只执行首次加载
pub fn no_ticks() -> impl Stream<Item = ()> {
    futures::stream::empty()
}
