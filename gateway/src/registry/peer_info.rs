use std::sync::atomic::{AtomicI64, AtomicU32, AtomicU64, Ordering};

/// Per-(storeId, ip) health/latency record. Hot counters are independent
/// atomics rather than one lock: writers never block each other and the
/// selection policy already tolerates small cross-field inconsistencies
/// under concurrent updates.
#[derive(Debug)]
pub struct PeerInfo {
    ip: String,
    weight: AtomicU32,
    success_count: AtomicU64,
    failure_count: AtomicU64,
    total_requests: AtomicU64,
    total_latency_ms: AtomicU64,
    last_check: AtomicI64,
    last_failure: AtomicI64,
}

const INITIAL_WEIGHT: u32 = 5;
const MIN_WEIGHT: u32 = 1;
const MAX_WEIGHT: u32 = 10;

impl PeerInfo {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            weight: AtomicU32::new(INITIAL_WEIGHT),
            success_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            total_requests: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            last_check: AtomicI64::new(0),
            last_failure: AtomicI64::new(0),
        }
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn weight(&self) -> u32 {
        self.weight.load(Ordering::Relaxed)
    }

    pub fn success_count(&self) -> u64 {
        self.success_count.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn total_latency_ms(&self) -> u64 {
        self.total_latency_ms.load(Ordering::Relaxed)
    }

    pub fn last_failure(&self) -> i64 {
        self.last_failure.load(Ordering::Relaxed)
    }

    pub fn average_latency_ms(&self) -> f64 {
        let requests = self.total_requests();
        if requests == 0 {
            f64::INFINITY
        } else {
            self.total_latency_ms() as f64 / requests as f64
        }
    }

    pub fn success_rate(&self) -> f64 {
        let requests = self.total_requests();
        if requests == 0 {
            0.0
        } else {
            self.success_count() as f64 / requests as f64
        }
    }

    /// `AdjustStats` (§4.2). `now_ms` is the caller-supplied wall clock so
    /// the statistics code stays free of hidden time sources and testable
    /// with fixed clocks.
    ///
    /// Returns `true` once `failureCount` first reaches the given
    /// threshold on this call, signalling the caller to blacklist the IP.
    pub fn adjust_stats(&self, success: bool, latency_ms: u64, now_ms: i64, failure_threshold: u64) -> bool {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.last_check.store(now_ms, Ordering::Relaxed);

        if success {
            self.success_count.fetch_add(1, Ordering::Relaxed);
            self.failure_count.store(0, Ordering::Relaxed);
            self.weight
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |w| {
                    Some((w + 1).min(MAX_WEIGHT))
                })
                .ok();
            false
        } else {
            let failures = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
            self.last_failure.store(now_ms, Ordering::Relaxed);
            self.weight
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |w| {
                    Some(w.saturating_sub(1).max(MIN_WEIGHT))
                })
                .ok();
            failures >= failure_threshold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_stays_within_bounds() {
        let peer = PeerInfo::new("1.2.3.4");
        for _ in 0..20 {
            peer.adjust_stats(true, 10, 0, 3);
        }
        assert_eq!(peer.weight(), MAX_WEIGHT);
        for _ in 0..20 {
            peer.adjust_stats(false, 10, 0, 3);
        }
        assert_eq!(peer.weight(), MIN_WEIGHT);
    }

    #[test]
    fn failure_threshold_fires_once_reached() {
        let peer = PeerInfo::new("1.2.3.4");
        assert!(!peer.adjust_stats(false, 5, 1, 3));
        assert!(!peer.adjust_stats(false, 5, 2, 3));
        assert!(peer.adjust_stats(false, 5, 3, 3));
    }

    #[test]
    fn success_resets_failure_streak() {
        let peer = PeerInfo::new("1.2.3.4");
        peer.adjust_stats(false, 5, 1, 3);
        peer.adjust_stats(false, 5, 2, 3);
        peer.adjust_stats(true, 5, 3, 3);
        assert!(!peer.adjust_stats(false, 5, 4, 3));
    }

    #[test]
    fn success_plus_failure_never_exceeds_total() {
        let peer = PeerInfo::new("1.2.3.4");
        peer.adjust_stats(true, 5, 1, 3);
        peer.adjust_stats(false, 5, 2, 3);
        peer.adjust_stats(true, 5, 3, 3);
        assert!(peer.success_count() + peer.failure_count() <= peer.total_requests());
    }

    #[test]
    fn average_latency_is_infinite_with_no_requests() {
        let peer = PeerInfo::new("1.2.3.4");
        assert_eq!(peer.average_latency_ms(), f64::INFINITY);
        assert_eq!(peer.success_rate(), 0.0);
    }
}
