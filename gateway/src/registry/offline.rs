use std::time::Duration;

use moka::future::Cache;

/// Blacklist of ips with ≥3 consecutive failures. Re-insertion resets the
/// TTL, matching moka's default "time to live measured from last write"
/// semantics.
#[derive(Debug, Clone)]
pub struct OfflinePeersSet {
    cache: Cache<String, ()>,
}

impl OfflinePeersSet {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().time_to_live(ttl).build(),
        }
    }

    pub async fn blacklist(&self, ip: &str) {
        self.cache.insert(ip.to_string(), ()).await;
    }

    pub fn is_blacklisted(&self, ip: &str) -> bool {
        self.cache.contains_key(ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blacklisted_ip_is_reported_as_such() {
        let offline = OfflinePeersSet::new(Duration::from_secs(300));
        assert!(!offline.is_blacklisted("1.2.3.4"));
        offline.blacklist("1.2.3.4").await;
        assert!(offline.is_blacklisted("1.2.3.4"));
    }
}
