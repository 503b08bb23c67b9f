use std::{sync::Arc, time::Instant};

use axum::body::Body;
use displaydoc::Display;
use http::{header, Response};
use thiserror::Error;

use crate::{
    config::oracle::OracleConfig,
    registry::{ActiveConnections, OfflinePeersSet, PeerInfo},
};

/// Failures attributable to the upstream peer hop (§4.4, §7.1), always
/// surfaced to the client as 502.
#[derive(Debug, Error, Display)]
pub enum ProxyError {
    /// failed to reach upstream peer {ip}: {source}
    Connect {
        ip: String,
        #[source]
        source: reqwest::Error,
    },
    /// upstream peer {ip} sent a response this proxy could not relay
    Relay { ip: String },
}

/// Forwards the client request to a validated peer (§4.4): bumps
/// `activeConnections`, rewrites the path to
/// `/<chain>.<store>.<root><subpath>`, streams the response back through,
/// and calls `AdjustStats` on completion or failure. Headers are passed
/// through unchanged except for the two the contract adds (§6).
///
/// `subpath` is always the original request's subpath verbatim — scenario
/// 2 in §8 forwards `/foo/bar` to the upstream peer even though the
/// selector's key-aware fallback only used that subpath to pick a
/// *validation* strategy (`headKey` vs `headStore`), not to decide what to
/// forward. The narrower `[/<key>]` notation in §4.4's prose is this same
/// subpath; there is no separate "forward without the key suffix" path
/// distinct from "forward the subpath the client asked for".
pub async fn forward(
    http: &reqwest::Client,
    oracle: &OracleConfig,
    active_connections: &ActiveConnections,
    offline: &OfflinePeersSet,
    peer: &Arc<PeerInfo>,
    failure_threshold: u64,
    chain: &str,
    store_id: &str,
    root_hash: &str,
    subpath: &str,
    method: http::Method,
) -> Result<Response<Body>, ProxyError> {
    let ip = peer.ip().to_string();
    active_connections.increment(&ip);
    let started = Instant::now();

    let upstream_path = format!("/{chain}.{store_id}.{root_hash}{subpath}");
    let url = format!("http://{ip}:{}{upstream_path}", oracle.peer_port);

    let result = http
        .request(method, &url)
        .header(header::HOST, format!("{ip}:{}", oracle.peer_port))
        .send()
        .await;

    active_connections.decrement(&ip);
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let upstream = match result {
        Ok(upstream) => upstream,
        Err(source) => {
            record_outcome(peer, offline, false, latency_ms, failure_threshold);
            return Err(ProxyError::Connect { ip, source });
        }
    };

    record_outcome(peer, offline, true, latency_ms, failure_threshold);

    let status = upstream.status();
    let mut builder = Response::builder()
        .status(status)
        .header("X-Network-Origin", format!("DIG Network: {ip}"))
        .header(header::CACHE_CONTROL, "public, max-age=86400");
    for (name, value) in upstream.headers() {
        if name == header::HOST || name == header::CACHE_CONTROL {
            continue;
        }
        builder = builder.header(name, value);
    }

    let body = Body::from_stream(upstream.bytes_stream());
    builder.body(body).map_err(|_| ProxyError::Relay { ip: peer.ip().to_string() })
}

fn record_outcome(
    peer: &Arc<PeerInfo>,
    offline: &OfflinePeersSet,
    success: bool,
    latency_ms: u64,
    failure_threshold: u64,
) {
    let now_ms = i64::try_from(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    )
    .unwrap_or(i64::MAX);
    let should_blacklist = peer.adjust_stats(success, latency_ms, now_ms, failure_threshold);
    if should_blacklist {
        let ip = peer.ip().to_string();
        let offline = offline.clone();
        tokio::spawn(async move {
            offline.blacklist(&ip).await;
        });
    }
}
