//! Wall-clock access for connection timestamps.
//!
//! Timestamps are Unix milliseconds in UTC. Components take an `Arc<dyn Clock>`
//! so tests can drive time with `ManualClock`.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the current time in Unix milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// The real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to.
///
/// Shared through an `Arc`, so a test can advance the time seen by the
/// component under test.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Render Unix milliseconds as RFC 3339 in UTC with millisecond precision.
///
/// Out-of-range timestamps fall back to the raw millisecond value.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| timestamp_millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_2020() {
        // テスト項目: SystemClock は現在時刻（2020 年以降）を返す
        // given (前提条件):
        let clock = SystemClock;
        let jan_2020 = 1_577_836_800_000;

        // when (操作):
        let timestamp = clock.now_millis();

        // then (期待する結果):
        assert!(timestamp > jan_2020);
    }

    #[test]
    fn test_manual_clock_moves_only_when_told() {
        // テスト項目: ManualClock は advance したときだけ進む
        // given (前提条件):
        let clock = ManualClock::new(1_000);
        let before = clock.now_millis();

        // when (操作):
        clock.advance(250);

        // then (期待する結果):
        assert_eq!(before, 1_000);
        assert_eq!(clock.now_millis(), 1_250);
        assert_eq!(clock.now_millis(), 1_250);
    }

    #[test]
    fn test_manual_clock_through_trait_object() {
        // テスト項目: Arc<dyn Clock> として共有しても進めた時刻が見える
        // given (前提条件):
        let manual = std::sync::Arc::new(ManualClock::new(0));
        let clock: std::sync::Arc<dyn Clock> = manual.clone();

        // when (操作):
        manual.advance(5);

        // then (期待する結果):
        assert_eq!(clock.now_millis(), 5);
    }

    #[test]
    fn test_timestamp_to_rfc3339_format() {
        // テスト項目: ミリ秒付きの RFC 3339 (UTC) 形式に変換される
        // given (前提条件):
        // 2023-01-01 00:00:00.123 UTC
        let timestamp = 1_672_531_200_123;

        // when (操作):
        let result = timestamp_to_rfc3339(timestamp);

        // then (期待する結果):
        assert_eq!(result, "2023-01-01T00:00:00.123Z");
    }

    #[test]
    fn test_timestamp_to_rfc3339_out_of_range() {
        // テスト項目: 範囲外のタイムスタンプは数値のまま返される
        // given (前提条件):
        let timestamp = i64::MAX;

        // when (操作):
        let result = timestamp_to_rfc3339(timestamp);

        // then (期待する結果):
        assert_eq!(result, i64::MAX.to_string());
    }
}
