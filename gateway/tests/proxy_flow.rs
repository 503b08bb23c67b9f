//! End-to-end coverage of the routes and scenarios in spec §6/§8: health
//! check, well-known bypass, the happy-path resolve -> select -> proxy
//! flow, redirect to a canonical chain, and the unknown-chain/invalid
//! store-id rejections. The oracle and the peers it points requests at are
//! both played by `wiremock` servers.

use axum::body::Body;
use dig_gateway::tests::test_router;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, path_regex},
};

fn store_id() -> String {
    "a".repeat(64)
}

#[tokio::test]
async fn health_check_bypasses_the_resolver() {
    let oracle = MockServer::start().await;
    let router = test_router(&oracle.uri());

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn well_known_paths_are_bypassed_with_a_bare_404() {
    let oracle = MockServer::start().await;
    let router = test_router(&oracle.uri());

    let response = router
        .oneshot(
            Request::builder()
                .uri("/.well-known/anything")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_store_id_without_cookie_or_referer_is_rejected() {
    let oracle = MockServer::start().await;
    let router = test_router(&oracle.uri());

    let response = router
        .oneshot(
            Request::builder()
                .uri("/not-a-udi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_chain_is_rejected() {
    let oracle = MockServer::start().await;
    let router = test_router(&oracle.uri());
    let store = store_id();

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/eth.{store}.deadbeef"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn resolves_selects_and_proxies_the_full_subpath() {
    let oracle = MockServer::start().await;
    let peer = MockServer::start().await;
    let store = store_id();
    let root_hash = "deadbeef";
    let peer_ip = "127.0.0.1";
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
            "peers": [peer_ip],
        })))
        .mount(&oracle)
        .await;

    Mock::given(method("HEAD"))
        .and(path(format!("/chia.{store}.{root_hash}")))
        .respond_with(ResponseTemplate::new(200).insert_header("x-has-roothash", "true"))
        .mount(&peer)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/chia.{store}.{root_hash}/foo/bar")))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello from the network"))
        .mount(&peer)
        .await;

    // Point the peer port at the second wiremock server so the proxy hop
    // lands on our mock content endpoint instead of the real peer port.
    let mut config = dig_gateway::tests::test_config(&oracle.uri());
    config.oracle.peer_port = peer_port;
    let state = dig_gateway::app_state::AppState::new_for_test(config);
    let router = dig_gateway::router::build(state);

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/chia.{store}.{root_hash}/foo/bar"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"hello from the network");
}

#[tokio::test]
async fn no_reachable_peers_yields_500() {
    let oracle = MockServer::start().await;
    let store = store_id();

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
            "peers": Vec::<String>::new(),
        })))
        .mount(&oracle)
        .await;

    let router = test_router(&oracle.uri());

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/chia.{store}.deadbeef/foo"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
