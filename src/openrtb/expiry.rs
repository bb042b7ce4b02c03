//! `tmax` 超时判断
//!
//! 时间约定：参考时间是请求到达时记录的 `DateTime<Utc>`。
//! 已耗时 = `now - reference`，先取整数微秒，再除以 1000 得到浮点毫秒，
//! 用 `f64::round`（0.5 远离零取整）取整后与 `tmax` 比较。
//! 只有严格大于 `tmax` 才算超时：tmax = 100 时，100ms 未超时，101ms 超时。
//! 参考时间晚于当前时间（时钟回拨）时按 0ms 处理。

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// 两个时间点之间的已耗时，单位毫秒（四舍五入）
pub fn elapsed_millis(reference: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let delta = now - reference;
    if delta <= TimeDelta::zero() {
        return 0;
    }
    let micros = delta.num_microseconds().unwrap_or(i64::MAX);
    round_micros(micros as f64)
}

/// `Instant::elapsed()` 之类的单调时长转换为毫秒（四舍五入）
pub fn duration_millis(elapsed: Duration) -> u64 {
    round_micros(elapsed.as_micros() as f64)
}

pub fn exceeds(elapsed_ms: u64, tmax: u64) -> bool {
    elapsed_ms > tmax
}

/// 把带小数的 Unix 秒（如 `1700000000.123456`）转换为时间点
pub fn from_unix_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let micros = (secs * 1_000_000.0).round();
    if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_micros(micros as i64)
}

/// 截止时间 = reference + tmax，溢出时返回 None
pub fn deadline(reference: DateTime<Utc>, tmax: u64) -> Option<DateTime<Utc>> {
    let tmax = i64::try_from(tmax).ok()?;
    TimeDelta::try_milliseconds(tmax).and_then(|d| reference.checked_add_signed(d))
}

/// 距离截止时间的剩余时长，已超时返回 0
pub fn remaining(reference: DateTime<Utc>, now: DateTime<Utc>, tmax: u64) -> Duration {
    Duration::from_millis(tmax.saturating_sub(elapsed_millis(reference, now)))
}

fn round_micros(micros: f64) -> u64 {
    (micros / 1000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(reference: DateTime<Utc>, micros: i64) -> DateTime<Utc> {
        reference + TimeDelta::microseconds(micros)
    }

    fn reference() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn rounds_to_nearest_millisecond() {
        let r = reference();
        assert_eq!(elapsed_millis(r, at(r, 100_499)), 100);
        assert_eq!(elapsed_millis(r, at(r, 100_500)), 101);
        assert_eq!(elapsed_millis(r, at(r, 99_500)), 100);
        assert_eq!(elapsed_millis(r, r), 0);
    }

    #[test]
    fn future_reference_counts_as_zero() {
        let r = reference();
        assert_eq!(elapsed_millis(r, at(r, -5_000)), 0);
        assert_eq!(remaining(r, at(r, -5_000), 100), Duration::from_millis(100));
    }

    #[test]
    fn strictly_greater_than_tmax() {
        assert!(!exceeds(100, 100));
        assert!(exceeds(101, 100));
        assert!(!exceeds(0, 0));
        assert!(exceeds(1, 0));
    }

    #[test]
    fn duration_uses_same_rounding() {
        assert_eq!(duration_millis(Duration::from_micros(100_499)), 100);
        assert_eq!(duration_millis(Duration::from_micros(100_500)), 101);
        assert_eq!(duration_millis(Duration::from_secs(2)), 2000);
    }

    #[test]
    fn unix_seconds_keep_microseconds() {
        let ts = from_unix_seconds(1_700_000_000.25).unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(ts.timestamp_subsec_micros(), 250_000);
        assert!(from_unix_seconds(f64::NAN).is_none());
        assert!(from_unix_seconds(f64::INFINITY).is_none());
        assert!(from_unix_seconds(1e300).is_none());
    }

    #[test]
    fn deadline_and_remaining() {
        let r = reference();
        assert_eq!(deadline(r, 120), Some(at(r, 120_000)));
        assert_eq!(deadline(r, u64::MAX), None);
        assert_eq!(remaining(r, at(r, 20_000), 120), Duration::from_millis(100));
        assert_eq!(remaining(r, at(r, 500_000), 120), Duration::ZERO);
    }

    proptest! {
        #[test]
        fn expiry_is_monotonic(tmax in 0u64..2_000, a in 0i64..3_000_000, b in 0i64..3_000_000) {
            let r = reference();
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            let early_expired = exceeds(elapsed_millis(r, at(r, early)), tmax);
            let late_expired = exceeds(elapsed_millis(r, at(r, late)), tmax);
            prop_assert!(!early_expired || late_expired);
        }

        #[test]
        fn elapsed_never_exceeds_truncated_plus_one(micros in 0i64..10_000_000_000) {
            let r = reference();
            let ms = elapsed_millis(r, at(r, micros));
            prop_assert!(ms >= (micros / 1000) as u64);
            prop_assert!(ms <= (micros / 1000) as u64 + 1);
        }
    }
}
