use crate::protocol;
use std::time;

/// The number of seconds from 1st January 1900 UTC to the start of the Unix epoch.
pub const EPOCH_DELTA: i64 = 2_208_988_800;

/// The number of seconds in one NTP era (2^32 seconds, approximately 136 years).
pub const ERA_SECONDS: i64 = 4_294_967_296;

// The NTP fractional scale (32-bit).
const NTP_SCALE: f64 = u32::MAX as f64;

/// An instant relative to the Unix epoch, in seconds with the fractional part in nanoseconds.
///
/// If the **Instant** describes some moment prior to the epoch, both components are negative.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Instant {
    secs: i64,
    subsec_nanos: i32,
}

impl Instant {
    /// Create a new **Instant** given its `secs` and `subsec_nanos` components.
    ///
    /// Both components must carry the same sign. Violating this will result in a **panic!**.
    pub fn new(secs: i64, subsec_nanos: i32) -> Instant {
        if secs > 0 && subsec_nanos < 0 {
            panic!("invalid instant: secs was positive but subsec_nanos was negative");
        }
        if secs < 0 && subsec_nanos > 0 {
            panic!("invalid instant: secs was negative but subsec_nanos was positive");
        }
        Instant { secs, subsec_nanos }
    }

    /// The current system time.
    pub fn now() -> Self {
        match time::SystemTime::now().duration_since(time::UNIX_EPOCH) {
            Ok(duration) => Instant::new(duration.as_secs() as i64, duration.subsec_nanos() as i32),
            Err(sys_time_err) => {
                let before = sys_time_err.duration();
                Instant::new(-(before.as_secs() as i64), -(before.subsec_nanos() as i32))
            }
        }
    }

    /// The "seconds" component of the **Instant**.
    pub fn secs(&self) -> i64 {
        self.secs
    }

    /// The fractional component of the **Instant** in nanoseconds.
    pub fn subsec_nanos(&self) -> i32 {
        self.subsec_nanos
    }

    /// Seconds since the Unix epoch as a float.
    pub fn as_secs_f64(&self) -> f64 {
        self.secs as f64 + self.subsec_nanos as f64 / 1e9
    }
}

/// Select the era that places `raw_seconds` closest to `pivot` and return absolute NTP seconds.
///
/// Assumes the timestamp lies within half an era (~68 years) of the pivot.
fn era_aware_ntp_seconds(raw_seconds: u32, pivot: &Instant) -> i64 {
    let pivot_ntp = pivot.secs + EPOCH_DELTA;
    let candidate = pivot_ntp.div_euclid(ERA_SECONDS) * ERA_SECONDS + raw_seconds as i64;

    let diff = candidate - pivot_ntp;
    if diff > ERA_SECONDS / 2 {
        candidate - ERA_SECONDS
    } else if diff < -(ERA_SECONDS / 2) {
        candidate + ERA_SECONDS
    } else {
        candidate
    }
}

/// Convert a [`protocol::TimestampFormat`] to an [`Instant`] using the given pivot
/// for era disambiguation.
///
/// For live queries pass the local receive time as the pivot.
pub fn timestamp_to_instant(ts: protocol::TimestampFormat, pivot: &Instant) -> Instant {
    let secs = era_aware_ntp_seconds(ts.seconds, pivot) - EPOCH_DELTA;
    let subsec_nanos = (ts.fraction as f64 / NTP_SCALE * 1e9) as i32;
    if secs < 0 && subsec_nanos > 0 {
        // Keep both components on the same side of the epoch.
        Instant::new(secs + 1, subsec_nanos - 1_000_000_000)
    } else {
        Instant::new(secs, subsec_nanos)
    }
}

impl From<Instant> for protocol::TimestampFormat {
    /// Converts a Unix [`Instant`] to a 32-bit NTP timestamp.
    ///
    /// This truncates to 32 bits; the receiver infers the era with [`timestamp_to_instant`].
    fn from(t: Instant) -> Self {
        let sec = t.secs() + EPOCH_DELTA;
        let frac = t.subsec_nanos() as f64 * NTP_SCALE / 1e9;
        protocol::TimestampFormat {
            seconds: sec as u32,
            fraction: frac as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn era0_timestamp_to_instant() {
        // 2024-01-01 00:00:00 UTC: Unix=1704067200, NTP=3913056000
        let ts = protocol::TimestampFormat {
            seconds: 3_913_056_000,
            fraction: 0,
        };
        let pivot = Instant::new(1_704_067_200, 0);
        assert_eq!(timestamp_to_instant(ts, &pivot).secs(), 1_704_067_200);
    }

    #[test]
    fn era_boundary_pivot_before_ts_after() {
        // Pivot in Jan 2036 (era 0). NTP seconds=1000 belongs to era 1.
        let pivot = Instant::new(2_082_758_400, 0);
        let ts = protocol::TimestampFormat {
            seconds: 1000,
            fraction: 0,
        };
        let expected = ERA_SECONDS + 1000 - EPOCH_DELTA;
        assert_eq!(timestamp_to_instant(ts, &pivot).secs(), expected);
    }

    #[test]
    fn timestamp_format_roundtrip_with_pivot() {
        let original = Instant::new(1_704_067_200, 250_000_000);
        let ts: protocol::TimestampFormat = original.into();
        let restored = timestamp_to_instant(ts, &original);
        assert_eq!(restored.secs(), original.secs());
        assert!((restored.subsec_nanos() - original.subsec_nanos()).abs() <= 1);
    }

    #[test]
    fn as_secs_f64_includes_fraction() {
        let instant = Instant::new(10, 500_000_000);
        assert!((instant.as_secs_f64() - 10.5).abs() < 1e-9);
    }
}
