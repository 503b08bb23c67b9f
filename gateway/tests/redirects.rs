//! Covers the redirect-producing branches of §4.1 not exercised by
//! `proxy_flow.rs`: a bare storeId resolving to the latest root hash via
//! the oracle's coin-info endpoint, and the `Set-Cookie` header a
//! successful resolution attaches.

use axum::body::Body;
use dig_gateway::tests::test_router;
use http::{Request, StatusCode};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, path_regex},
};

fn store_id() -> String {
    "a".repeat(64)
}

#[tokio::test]
async fn bare_store_id_redirects_to_latest_chain_and_root_hash() {
    let oracle = MockServer::start().await;
    let store = store_id();

    Mock::given(method("GET"))
        .and(path_regex(format!("^/stores/{store}/coin$")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latestStore": {
                "metadata": { "rootHash": "cafef00d" }
            }
        })))
        .mount(&oracle)
        .await;

    let router = test_router(&oracle.uri());

    let response = router
        .oneshot(Request::builder().uri(format!("/{store}")).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get(http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, format!("/chia.{store}.cafef00d"));
}

#[tokio::test]
async fn resolved_request_sets_the_udi_cookie() {
    let oracle = MockServer::start().await;
    let peer = MockServer::start().await;
    let store = store_id();
    let root_hash = "deadbeef";
    let peer_port = peer.address().port();

    Mock::given(method("GET"))
        .and(path("/epoch/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "epoch": 1,
            "round": 1,
        })))
        .mount(&oracle)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(format!("^/stores/{store}/peers$")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "peers": ["127.0.0.1"],
        })))
        .mount(&oracle)
        .await;

    Mock::given(method("HEAD"))
        .and(path(format!("/chia.{store}.{root_hash}")))
        .respond_with(ResponseTemplate::new(200).insert_header("x-has-roothash", "true"))
        .mount(&peer)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/chia.{store}.{root_hash}")))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&peer)
        .await;

    let mut config = dig_gateway::tests::test_config(&oracle.uri());
    config.oracle.peer_port = peer_port;
    let state = dig_gateway::app_state::AppState::new_for_test(config);
    let router = dig_gateway::router::build(state);

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/chia.{store}.{root_hash}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(http::header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(set_cookie.contains("udiData="));
}
