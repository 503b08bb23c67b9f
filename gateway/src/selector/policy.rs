use std::sync::Arc;

use rand::Rng;

use crate::registry::{ActiveConnections, PeerInfo};

/// Blended selection policy (§4.3): a weighted-random base draw, then three
/// independent probability-`p` overrides (least connections, lowest
/// average latency, highest success rate), applied in that fixed order.
/// Ties within an override are broken by registry order — the first
/// candidate with the best score wins.
pub fn blended_pick(
    candidates: &[Arc<PeerInfo>],
    active_connections: &ActiveConnections,
    override_probability: f64,
    rng: &mut impl Rng,
) -> Arc<PeerInfo> {
    let mut choice = weighted_random_pick(candidates, rng);
    if rng.random_bool(override_probability) {
        choice = least_connections_pick(candidates, active_connections);
    }
    if rng.random_bool(override_probability) {
        choice = lowest_latency_pick(candidates);
    }
    if rng.random_bool(override_probability) {
        choice = highest_success_rate_pick(candidates);
    }
    choice
}

fn weighted_random_pick(candidates: &[Arc<PeerInfo>], rng: &mut impl Rng) -> Arc<PeerInfo> {
    let total_weight: u32 = candidates.iter().map(|peer| peer.weight()).sum();
    if total_weight == 0 {
        return Arc::clone(&candidates[0]);
    }
    let mut draw = rng.random_range(0..total_weight);
    for peer in candidates {
        let weight = peer.weight();
        if draw < weight {
            return Arc::clone(peer);
        }
        draw -= weight;
    }
    Arc::clone(candidates.last().expect("candidates is non-empty"))
}

fn least_connections_pick(
    candidates: &[Arc<PeerInfo>],
    active_connections: &ActiveConnections,
) -> Arc<PeerInfo> {
    best_by(candidates, |peer| active_connections.get(peer.ip()) as f64, false)
}

fn lowest_latency_pick(candidates: &[Arc<PeerInfo>]) -> Arc<PeerInfo> {
    best_by(candidates, PeerInfo::average_latency_ms, false)
}

fn highest_success_rate_pick(candidates: &[Arc<PeerInfo>]) -> Arc<PeerInfo> {
    best_by(candidates, PeerInfo::success_rate, true)
}

/// Picks the candidate with the extreme score, preferring the earliest
/// index on ties (strict `>`/`<` only, never replacing on equal score).
fn best_by(candidates: &[Arc<PeerInfo>], score: impl Fn(&PeerInfo) -> f64, maximize: bool) -> Arc<PeerInfo> {
    let mut best = &candidates[0];
    let mut best_score = score(best);
    for peer in &candidates[1..] {
        let current = score(peer);
        let better = if maximize {
            current > best_score
        } else {
            current < best_score
        };
        if better {
            best = peer;
            best_score = current;
        }
    }
    Arc::clone(best)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn peer(ip: &str) -> Arc<PeerInfo> {
        Arc::new(PeerInfo::new(ip))
    }

    #[test]
    fn least_connections_prefers_earliest_tie() {
        let candidates = vec![peer("1.1.1.1"), peer("2.2.2.2"), peer("3.3.3.3")];
        let connections = ActiveConnections::new();
        connections.increment("3.3.3.3");
        let chosen = least_connections_pick(&candidates, &connections);
        assert_eq!(chosen.ip(), "1.1.1.1");
    }

    #[test]
    fn lowest_latency_prefers_peer_with_recorded_latency_over_untouched_peer() {
        let fast = peer("1.1.1.1");
        fast.adjust_stats(true, 5, 1, 3);
        let untouched = peer("2.2.2.2");
        let candidates = vec![untouched.clone(), fast.clone()];
        assert_eq!(lowest_latency_pick(&candidates).ip(), fast.ip());
    }

    #[test]
    fn highest_success_rate_prefers_peer_with_successes() {
        let reliable = peer("1.1.1.1");
        reliable.adjust_stats(true, 5, 1, 3);
        let unreliable = peer("2.2.2.2");
        unreliable.adjust_stats(false, 5, 1, 3);
        let candidates = vec![unreliable.clone(), reliable.clone()];
        assert_eq!(highest_success_rate_pick(&candidates).ip(), reliable.ip());
    }

    #[test]
    fn weighted_pick_is_deterministic_for_a_fixed_seed() {
        let candidates = vec![peer("1.1.1.1"), peer("2.2.2.2")];
        let connections = ActiveConnections::new();
        let mut rng = StdRng::seed_from_u64(42);
        let first = blended_pick(&candidates, &connections, 0.0, &mut rng);
        let mut rng = StdRng::seed_from_u64(42);
        let second = blended_pick(&candidates, &connections, 0.0, &mut rng);
        assert_eq!(first.ip(), second.ip());
    }
}
