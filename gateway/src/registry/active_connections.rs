use std::sync::{
    atomic::{AtomicI64, Ordering},
    RwLock,
};

use rustc_hash::FxHashMap;

/// Process-wide `ip -> in-flight request count`. Entries are never removed
/// when an ip drops out of a registry entry (§9: small, bounded by network
/// size); only ever incremented/decremented. Kept synchronous (a plain
/// `std::sync::RwLock`, not `tokio::sync::RwLock`) since the selection
/// policy that reads it runs entirely without suspension points (§5).
#[derive(Debug, Default)]
pub struct ActiveConnections {
    counts: RwLock<FxHashMap<String, AtomicI64>>,
}

impl ActiveConnections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, ip: &str) {
        if let Some(counter) = self.counts.read().expect("lock poisoned").get(ip) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let mut counts = self.counts.write().expect("lock poisoned");
        counts
            .entry(ip.to_string())
            .or_insert_with(|| AtomicI64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement(&self, ip: &str) {
        if let Some(counter) = self.counts.read().expect("lock poisoned").get(ip) {
            counter
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some((v - 1).max(0)))
                .ok();
        }
    }

    /// Resets an ip's counter to zero, used when a registry entry is
    /// re-seeded (§4.2).
    pub fn reset(&self, ip: &str) {
        let counts = self.counts.read().expect("lock poisoned");
        if let Some(counter) = counts.get(ip) {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub fn get(&self, ip: &str) -> i64 {
        self.counts
            .read()
            .expect("lock poisoned")
            .get(ip)
            .map(|counter| counter.load(Ordering::Relaxed))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_goes_negative() {
        let connections = ActiveConnections::new();
        connections.decrement("1.2.3.4");
        assert_eq!(connections.get("1.2.3.4"), 0);
    }

    #[test]
    fn increments_and_decrements_symmetrically() {
        let connections = ActiveConnections::new();
        connections.increment("1.2.3.4");
        connections.increment("1.2.3.4");
        assert_eq!(connections.get("1.2.3.4"), 2);
        connections.decrement("1.2.3.4");
        assert_eq!(connections.get("1.2.3.4"), 1);
    }

    #[test]
    fn reset_zeroes_the_counter() {
        let connections = ActiveConnections::new();
        connections.increment("1.2.3.4");
        connections.reset("1.2.3.4");
        assert_eq!(connections.get("1.2.3.4"), 0);
    }
}
