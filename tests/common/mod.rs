//! Shared integration-test harness: fixture paths, an in-process router
//! around a lexicon handle, and a runner for the `gazette` binary.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt;

use gazette::api::{AppState, build_router};
use gazette::config::ServerSettings;
use gazette::handle::{LazyResourceHandle, ResourceDescriptor};
use gazette::model::LexiconLoader;

/// Body limit used by test routers.
pub const TEST_BODY_LIMIT: usize = 64 * 1024;

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Static descriptor used by test handles.
pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        model_name: "fixture/lexicon".to_string(),
        model_type: "Lexicon".to_string(),
        parameters: "9 entries".to_string(),
        license: "Apache 2.0".to_string(),
    }
}

/// An unloaded handle for the lexicon at `path`.
pub fn lexicon_handle(path: &Path) -> Arc<LazyResourceHandle<LexiconLoader>> {
    Arc::new(LazyResourceHandle::new(LexiconLoader::new(path, descriptor())))
}

/// Router serving `handle` with the usual 0.3 default threshold.
pub fn router_for(handle: &Arc<LazyResourceHandle<LexiconLoader>>) -> Router {
    let state = AppState {
        handle: Arc::clone(handle),
        default_threshold: 0.3,
    };
    let settings = ServerSettings {
        max_body_bytes: TEST_BODY_LIMIT,
        ..ServerSettings::default()
    };
    build_router(state, &settings).expect("default CORS settings are valid")
}

/// `GET uri`.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

/// `POST uri` with a JSON body.
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Sends one request through `router` and decodes the JSON answer.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let json = serde_json::from_slice(&bytes).expect("response is JSON");
    (status, json)
}

/// Runs the `gazette` binary to completion with logging silenced.
pub fn run_cli(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_gazette"))
        .args(args)
        .env_remove("GAZETTE_CONFIG")
        .env_remove("GAZETTE_MODEL_PATH")
        .env_remove("GAZETTE_BIND")
        .output()
        .expect("failed to run gazette")
}
