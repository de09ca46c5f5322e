/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
///
/// IDs handed out by one process are strictly increasing, so two calls in
/// the same millisecond never collide.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    use std::sync::atomic::{AtomicI64, Ordering};

    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    static LAST: AtomicI64 = AtomicI64::new(0);

    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    let candidate = (ts << 12) | rand_bits;

    let previous = LAST
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
            Some(candidate.max(last + 1))
        })
        .unwrap_or(candidate);
    candidate.max(previous + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_fits_js_safe_integer() {
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id < (1_i64 << 53));
    }

    #[test]
    fn snowflake_never_repeats_within_a_process() {
        let ids: std::collections::HashSet<i64> = (0..10_000).map(|_| snowflake_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn snowflake_is_time_ordered_across_milliseconds() {
        let a = snowflake_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = snowflake_id();
        assert!(b > a);
    }
}
