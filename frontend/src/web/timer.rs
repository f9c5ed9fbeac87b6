//! 定时器封装模块

use futures::Stream;
use gloo_timers::future::IntervalStream;
use std::time::Duration;

/// 周期性 tick 流
///
/// 封装 `setInterval`；流被 drop 时定时器随之清除。第一个 tick 在一个周期后到达。
pub fn interval_ticks(period: Duration) -> impl Stream<Item = ()> {
    IntervalStream::new(interval_millis(period))
}

/// `setInterval` 只接受 u32 毫秒，超出时取上限
fn interval_millis(period: Duration) -> u32 {
    u32::try_from(period.as_millis()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_millis_saturates() {
        assert_eq!(interval_millis(Duration::from_secs(30)), 30_000);
        assert_eq!(interval_millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }
}
