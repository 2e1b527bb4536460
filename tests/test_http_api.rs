mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{fixture_path, get, lexicon_handle, post_json, router_for, send};
use gazette::handle::HandleState;

#[tokio::test]
async fn health_reports_unloaded_model_without_loading_it() {
    let handle = lexicon_handle(&fixture_path("lexicon.yaml"));
    let router = router_for(&handle);

    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], false);
    assert_eq!(body["model_name"], "fixture/lexicon");
    assert_eq!(handle.state(), HandleState::Uninitialized);
}

#[tokio::test]
async fn first_extract_loads_model_and_health_flips() {
    let handle = lexicon_handle(&fixture_path("lexicon.yaml"));
    let router = router_for(&handle);

    let (status, body) = send(
        &router,
        post_json(
            "/extract",
            &json!({
                "text": "Ada Lovelace moved from London to Acme Corp.",
                "entity_types": ["person", "location", "organization"]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["entity_count"], 3);
    assert_eq!(body["text_length"], 44);
    let texts: Vec<&str> = body["entities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["Ada Lovelace", "London", "Acme Corp"]);
    assert_eq!(body["entities"][2]["start"], 34);
    assert_eq!(body["entities"][2]["end"], 43);

    let (_, health) = send(&router, get("/health")).await;
    assert_eq!(health["model_loaded"], true);
}

#[tokio::test]
async fn default_threshold_drops_low_scores() {
    let handle = lexicon_handle(&fixture_path("lexicon.yaml"));
    let router = router_for(&handle);
    let text = "Initech and Globex";

    let (_, default) = send(
        &router,
        post_json("/extract", &json!({"text": text, "entity_types": ["org"]})),
    )
    .await;
    assert_eq!(default["entity_count"], 1);
    assert_eq!(default["entities"][0]["text"], "Globex");
    assert_eq!(default["entities"][0]["label"], "org");

    let (_, permissive) = send(
        &router,
        post_json(
            "/extract",
            &json!({"text": text, "entity_types": ["org"], "threshold": 0.1}),
        ),
    )
    .await;
    assert_eq!(permissive["entity_count"], 2);
}

#[tokio::test]
async fn text_length_counts_characters() {
    let handle = lexicon_handle(&fixture_path("lexicon.yaml"));
    let router = router_for(&handle);

    let (status, body) = send(
        &router,
        post_json(
            "/extract",
            &json!({"text": "Olá São Paulo", "entity_types": ["city"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text_length"], 13);
    assert_eq!(body["entities"][0]["start"], 4);
    assert_eq!(body["entities"][0]["end"], 13);
}

#[tokio::test]
async fn validation_failures_are_422_and_do_not_load_model() {
    let handle = lexicon_handle(&fixture_path("lexicon.yaml"));
    let router = router_for(&handle);

    let cases = [
        json!({"text": "", "entity_types": ["person"]}),
        json!({"text": "Acme Corp", "entity_types": []}),
        json!({"text": "Acme Corp", "entity_types": ["org"], "threshold": 1.5}),
        json!({"text": "Acme Corp", "entity_types": ["org"], "threshold": -0.5}),
        json!({"text": "Acme Corp", "entity_types": [" "]}),
    ];

    for case in cases {
        let (status, body) = send(&router, post_json("/extract", &case)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{case}");
        assert_eq!(body["error"], "validation_error");
        assert!(!body["detail"].as_str().unwrap().is_empty());
    }
    assert_eq!(handle.state(), HandleState::Uninitialized);
}

#[tokio::test]
async fn wrong_shape_is_422() {
    let handle = lexicon_handle(&fixture_path("lexicon.yaml"));
    let router = router_for(&handle);

    let (status, body) = send(
        &router,
        post_json("/extract", &json!({"text": 42, "entity_types": "person"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn model_info_is_static_across_loading() {
    let handle = lexicon_handle(&fixture_path("lexicon.yaml"));
    let router = router_for(&handle);

    let (status, before) = send(&router, get("/model_info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["loaded"], false);

    handle.acquire().await.unwrap();

    let (_, after) = send(&router, get("/describe")).await;
    assert_eq!(after["loaded"], true);
    for field in ["model_name", "model_type", "parameters", "license"] {
        assert_eq!(before[field], after[field], "{field} changed");
    }
    assert_eq!(after["model_type"], "Lexicon");
}

#[tokio::test]
async fn root_lists_endpoints() {
    let handle = lexicon_handle(&fixture_path("lexicon.yaml"));
    let (status, body) = send(&router_for(&handle), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["model"], "fixture/lexicon");
    assert_eq!(body["endpoints"]["extract"], "/extract (POST)");
    assert_eq!(body["endpoints"]["health"], "/health");
}

#[tokio::test]
async fn missing_model_is_500_then_recovers_once_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexicon.yaml");
    let handle = lexicon_handle(&path);
    let router = router_for(&handle);
    let request = json!({"text": "Globex", "entity_types": ["org"]});

    let (status, body) = send(&router, post_json("/extract", &request)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "initialization_error");
    assert!(body["detail"].as_str().unwrap().contains("not found"));
    assert_eq!(handle.state(), HandleState::Uninitialized);

    // The process keeps serving after the failure
    let (status, health) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["model_loaded"], false);

    std::fs::copy(fixture_path("lexicon.yaml"), &path).unwrap();

    let (status, body) = send(&router, post_json("/extract", &request)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["entity_count"], 1);
    assert_eq!(handle.state(), HandleState::Ready);
}

#[tokio::test]
async fn invalid_model_is_500_naming_the_problem() {
    let handle = lexicon_handle(&fixture_path("broken_lexicon.yaml"));
    let router = router_for(&handle);

    let (status, body) = send(
        &router,
        post_json("/extract", &json!({"text": "Acme Corp", "entity_types": ["organization"]})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("outside [0.0, 1.0]"));
}

#[tokio::test]
async fn concurrent_first_requests_share_one_model() {
    let handle = lexicon_handle(&fixture_path("lexicon.yaml"));
    let router = router_for(&handle);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..16 {
        let router = router.clone();
        tasks.spawn(async move {
            send(
                &router,
                post_json("/extract", &json!({"text": "Grace Hopper", "entity_types": ["people"]})),
            )
            .await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        let (status, body) = joined.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entities"][0]["label"], "people");
    }

    let first = handle.acquire().await.unwrap();
    let second = handle.acquire().await.unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn browser_clients_get_cors_headers() {
    let handle = lexicon_handle(&fixture_path("lexicon.yaml"));
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/extract")
        .header("content-type", "application/json")
        .header("origin", "http://localhost:3000")
        .body(axum::body::Body::from(
            json!({"text": "Paris", "entity_types": ["city"]}).to_string(),
        ))
        .unwrap();

    let response = tower::ServiceExt::oneshot(router_for(&handle), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
