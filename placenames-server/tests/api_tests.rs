use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use placenames_core::{build, load_index, PrefixIndex, QueryEngine, SuggestConfig};
use placenames_server::api::metrics;
use placenames_server::{create_router, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

async fn spawn_app(index: PrefixIndex) -> String {
    let app = create_router(AppState::new(
        QueryEngine::new(index),
        metrics::install_recorder(),
    ));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn sample_index(k: usize) -> PrefixIndex {
    build(
        k,
        [
            ("London", 1.0),
            ("Los Angeles", 0.9),
            ("Liverpool", 0.8),
            ("Leeds", 0.7),
            ("Lancaster", 0.6),
            ("Bath", 0.5),
        ],
    )
    .expect("sample should build")
}

async fn get(url: String) -> (StatusCode, Value) {
    let resp = Client::new().get(url).send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

fn names(body: &Value) -> Vec<&str> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let base = spawn_app(sample_index(100)).await;
    let (status, body) = get(format!("{}/healthz", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["entries"], 6);
    assert!(body["nodes"].as_u64().unwrap() > 1);
}

#[tokio::test]
async fn test_prefix_lookup() {
    let base = spawn_app(sample_index(100)).await;
    let (status, body) = get(format!("{}/v1/place-names/prefix/Lo", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"results": [
            {"name": "London", "relevancy": 1.0},
            {"name": "Los Angeles", "relevancy": 0.9}
        ]})
    );
}

#[tokio::test]
async fn test_prefix_recased_to_query() {
    let base = spawn_app(sample_index(100)).await;
    let (_, body) = get(format!("{}/v1/place-names/prefix/LIV", base)).await;
    assert_eq!(names(&body), vec!["LIVerpool"]);

    let (_, body) = get(format!("{}/v1/place-names/prefix/los%20a", base)).await;
    assert_eq!(names(&body), vec!["los angeles"]);
}

#[tokio::test]
async fn test_no_match_is_empty_list() {
    let base = spawn_app(sample_index(100)).await;
    let (status, body) = get(format!("{}/v1/place-names/prefix/Xyz", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"results": []}));
}

#[tokio::test]
async fn test_default_limit_is_ten() {
    let records: Vec<(String, f64)> = (0..30).map(|i| (format!("Ash{i:02}"), 0.01 * i as f64)).collect();
    let index = build(100, records.iter().map(|(n, r)| (n.as_str(), *r))).unwrap();
    let base = spawn_app(index).await;

    let (_, body) = get(format!("{}/v1/place-names/prefix/ash", base)).await;
    assert_eq!(names(&body).len(), 10);
    assert_eq!(names(&body)[0], "ash29");
}

#[tokio::test]
async fn test_max_results() {
    let base = spawn_app(sample_index(100)).await;

    let (status, body) = get(format!("{}/v1/place-names/prefix/l?max_results=2", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["london", "los Angeles"]);

    let (status, body) = get(format!("{}/v1/place-names/prefix/l?max_results=100", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body).len(), 5);
}

#[tokio::test]
async fn test_invalid_max_results() {
    let base = spawn_app(sample_index(100)).await;
    let expected = json!({
        "error": "max_results must be a positive integer less than or equal to 100"
    });

    for raw in ["0", "-1", "101", "ten", "%20"] {
        let (status, body) =
            get(format!("{}/v1/place-names/prefix/l?max_results={}", base, raw)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "max_results={raw}");
        assert_eq!(body, expected, "max_results={raw}");
    }
}

#[tokio::test]
async fn test_empty_max_results_uses_default() {
    let records: Vec<(String, f64)> = (0..30).map(|i| (format!("Elm{i:02}"), 0.01 * i as f64)).collect();
    let index = build(100, records.iter().map(|(n, r)| (n.as_str(), *r))).unwrap();
    let base = spawn_app(index).await;

    let (status, body) = get(format!("{}/v1/place-names/prefix/elm?max_results=", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body).len(), 10);
    assert_eq!(names(&body)[0], "elm29");

    let (status, body) = get(format!("{}/v1/place-names/prefix?max_results=", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body).len(), 10);
}

#[tokio::test]
async fn test_max_results_bounded_by_k() {
    let base = spawn_app(sample_index(3)).await;

    let (status, body) = get(format!("{}/v1/place-names/prefix/l?max_results=4", base)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "max_results must be a positive integer less than or equal to 3"
    );

    let (_, body) = get(format!("{}/v1/place-names/prefix/l", base)).await;
    assert_eq!(names(&body), vec!["london", "los Angeles", "liverpool"]);
}

#[tokio::test]
async fn test_empty_prefix_returns_top_entries() {
    let base = spawn_app(sample_index(100)).await;
    let (status, body) = get(format!("{}/v1/place-names/prefix?max_results=2", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["London", "Los Angeles"]);
}

#[tokio::test]
async fn test_cache_control_header() {
    let base = spawn_app(sample_index(100)).await;
    let resp = Client::new()
        .get(format!("{}/v1/place-names/prefix/Ba", base))
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers()["cache-control"],
        "public, max-age=2419200, immutable"
    );

    let resp = Client::new()
        .get(format!("{}/healthz", base))
        .send()
        .await
        .unwrap();
    assert!(resp.headers().get("cache-control").is_none());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let base = spawn_app(sample_index(100)).await;
    let resp = Client::new()
        .get(format!("{}/v1/place-names/prefix/Ba", base))
        .header("Origin", "https://example.org")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_serves_index_loaded_from_gzip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("placenames_with_relevancy.csv.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    encoder
        .write_all(b"name,relevancy\nbrighton,0.7\nBristol,0.8\nBradford,0.6\n")
        .unwrap();
    encoder.finish().unwrap();

    let index = load_index(&path, SuggestConfig::default()).unwrap();
    let base = spawn_app(index).await;

    let (_, body) = get(format!("{}/v1/place-names/prefix/Br", base)).await;
    assert_eq!(names(&body), vec!["Bristol", "Brighton", "Bradford"]);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let base = spawn_app(sample_index(100)).await;
    let client = Client::new();

    client
        .get(format!("{}/v1/place-names/prefix/Ba", base))
        .send()
        .await
        .unwrap();
    client
        .get(format!("{}/v1/place-names/prefix/Ba?max_results=0", base))
        .send()
        .await
        .unwrap();
    client.get(format!("{}/healthz", base)).send().await.unwrap();

    let resp = client.get(format!("{}/metrics", base)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("cache-control").is_none());
    let body = resp.text().await.unwrap();

    assert!(body.contains("http_requests_total"), "{body}");
    assert!(body.contains("http_request_duration_seconds"), "{body}");
    assert!(body.contains(r#"path="/v1/place-names/prefix/:query""#), "{body}");
    assert!(body.contains(r#"status="400""#), "{body}");
    assert!(body.contains("placenames_lookup_results"), "{body}");
    assert!(!body.contains(r#"path="/healthz""#), "{body}");
    assert!(!body.contains(r#"path="/v1/place-names/prefix/Ba""#), "{body}");
}
