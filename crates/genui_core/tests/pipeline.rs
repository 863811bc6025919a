//! End-to-end pipeline runs against local mock servers standing in for the
//! DSL backend and the compile endpoint.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use genui_config::{
    Config,
    credential::{CredentialStore, MemoryStore},
};
use genui_core::{
    CredentialPrompt, DeclinePrompt, Error, HostPage, OutputRenderer, Pipeline, RenderState,
    ScriptElement, ScriptHost,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

const DSL: &str = "form(Product Review): rating(1-5), comments  -> /api/comments";

#[derive(Clone)]
enum Reply {
    Json(StatusCode, Value),
    Text(StatusCode, &'static str),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(status, body) => (status, Json(body)).into_response(),
            Reply::Text(status, body) => (status, body).into_response(),
        }
    }
}

#[derive(Clone)]
struct Mock {
    data: Reply,
    compile: Reply,
    data_hits: Arc<AtomicUsize>,
    compile_hits: Arc<AtomicUsize>,
    seen_key: Arc<Mutex<Option<String>>>,
    seen_model: Arc<Mutex<Option<String>>>,
    seen_body: Arc<Mutex<Option<Value>>>,
}

impl Mock {
    fn new(data: Reply, compile: Reply) -> Self {
        Self {
            data,
            compile,
            data_hits: Arc::default(),
            compile_hits: Arc::default(),
            seen_key: Arc::default(),
            seen_model: Arc::default(),
            seen_body: Arc::default(),
        }
    }

    fn hits(&self) -> (usize, usize) {
        (
            self.data_hits.load(Ordering::SeqCst),
            self.compile_hits.load(Ordering::SeqCst),
        )
    }
}

async fn initial_data(State(mock): State<Mock>) -> Reply {
    mock.data_hits.fetch_add(1, Ordering::SeqCst);
    mock.data.clone()
}

async fn generate(
    State(mock): State<Mock>,
    Path(model): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Reply {
    mock.compile_hits.fetch_add(1, Ordering::SeqCst);
    *mock.seen_key.lock().unwrap() = query.get("key").cloned();
    *mock.seen_model.lock().unwrap() = Some(model);
    *mock.seen_body.lock().unwrap() = Some(body);
    mock.compile.clone()
}

/// Starts the mock and returns a config pointing both endpoints at it
async fn start(mock: Mock) -> Config {
    let app = Router::new()
        .route("/get-initial-data", get(initial_data))
        .route("/v1beta/models/{model}", post(generate))
        .with_state(mock);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let mut cfg = Config::default();
    cfg.backend.url = format!("http://127.0.0.1:{port}").parse().unwrap();
    cfg.compiler.url = format!("http://127.0.0.1:{port}/v1beta").parse().unwrap();
    cfg.compiler.model = "test-model".into();
    cfg
}

fn dsl_reply() -> Reply {
    Reply::Json(StatusCode::OK, json!({ "script": DSL }))
}

fn compiled_reply(text: &str) -> Reply {
    Reply::Json(
        StatusCode::OK,
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }),
    )
}

fn stored_key() -> MemoryStore {
    MemoryStore::new().with("geminiApiKey", "test-key")
}

#[derive(Default)]
struct RecordingHost {
    runs: Vec<(String, bool)>,
}

impl ScriptHost for RecordingHost {
    fn execute(&mut self, page: &HostPage, script: &ScriptElement) -> Result<(), String> {
        let markup_attached = page.region().html().contains("id=\"review-form\"");
        self.runs.push((script.text.clone(), markup_attached));
        Ok(())
    }
}

fn renderer<H: ScriptHost>(cfg: &Config, host: H) -> OutputRenderer<H> {
    OutputRenderer::new(HostPage::new(&cfg.page, cfg.backend.base_url()), host)
}

#[tokio::test]
async fn test_compiles_and_renders_two_scripts_in_order() {
    let compiled = r#"<div class="p-4"><form id="review-form"><input name="rating"></form>
<script>const form = document.getElementById('review-form');</script>
<style>.p-4 { padding: 1rem; }</style>
<script type="text/javascript">form.addEventListener('submit', () => fetch(`${url}/api/comments`));</script>
</div>"#;
    let mock = Mock::new(dsl_reply(), compiled_reply(compiled));
    let cfg = start(mock.clone()).await;
    let store = stored_key();

    let mut out = renderer(&cfg, RecordingHost::default());
    let result = Pipeline::new(&cfg, &store, &DeclinePrompt)
        .run(&mut out)
        .await
        .unwrap();

    assert_eq!(result.raw_text, compiled);
    assert_eq!(mock.hits(), (1, 1));
    assert_eq!(out.state(), RenderState::Rendered);

    similar_asserts::assert_eq!(
        out.host().runs,
        vec![
            (
                "const form = document.getElementById('review-form');".to_string(),
                true
            ),
            (
                "form.addEventListener('submit', () => fetch(`${url}/api/comments`));".to_string(),
                true
            ),
        ]
    );

    let region = out.page().region().html();
    assert!(region.contains("Compilation Time:"));
    assert!(region.contains("<form id=\"review-form\">"));
    assert!(region.contains("<style>.p-4 { padding: 1rem; }</style>"));
    assert!(!region.contains("<script"));
    assert_eq!(out.page().region().listeners().len(), 1);
}

#[tokio::test]
async fn test_request_carries_key_model_and_prompt() {
    let mock = Mock::new(dsl_reply(), compiled_reply("<div>ok</div>"));
    let cfg = start(mock.clone()).await;
    let store = stored_key();

    let mut out = OutputRenderer::deferred(HostPage::new(&cfg.page, cfg.backend.base_url()));
    Pipeline::new(&cfg, &store, &DeclinePrompt)
        .run(&mut out)
        .await
        .unwrap();

    assert_eq!(mock.seen_key.lock().unwrap().as_deref(), Some("test-key"));
    assert_eq!(
        mock.seen_model.lock().unwrap().as_deref(),
        Some("test-model:generateContent")
    );

    let body = mock.seen_body.lock().unwrap().clone().unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.ends_with(&format!("DSL:\n{DSL}\n")));
    assert!(prompt.contains(&cfg.backend.base_url()));

    let html = out.into_page().to_html();
    assert!(html.contains(&format!("const url = \"{}\";", cfg.backend.base_url())));
    assert!(html.contains("<div>ok</div>"));
}

#[tokio::test]
async fn test_fetch_failure_shows_url_and_skips_compile() {
    let mock = Mock::new(
        Reply::Json(StatusCode::SERVICE_UNAVAILABLE, json!({})),
        compiled_reply("<div>never</div>"),
    );
    let cfg = start(mock.clone()).await;
    let store = stored_key();

    let mut out = OutputRenderer::deferred(HostPage::new(&cfg.page, cfg.backend.base_url()));
    let err = Pipeline::new(&cfg, &store, &DeclinePrompt)
        .run(&mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Fetch { .. }));
    assert_eq!(mock.hits(), (1, 0));
    assert_eq!(out.state(), RenderState::Errored);

    let region = out.page().region().html();
    assert!(region.contains(&cfg.backend.data_url()));
    assert!(region.contains("Is the backend running?"));
    assert!(region.contains("bg-red-100"));
}

#[tokio::test]
async fn test_declined_prompt_makes_no_requests() {
    let mock = Mock::new(dsl_reply(), compiled_reply("<div>never</div>"));
    let cfg = start(mock.clone()).await;
    let store = MemoryStore::new();

    let mut out = OutputRenderer::deferred(HostPage::new(&cfg.page, cfg.backend.base_url()));
    let err = Pipeline::new(&cfg, &store, &DeclinePrompt)
        .run(&mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingCredential));
    assert_eq!(mock.hits(), (0, 0));
    assert!(
        out.page()
            .region()
            .html()
            .contains("API key is required to use this application")
    );
}

struct TypedKey;

impl CredentialPrompt for TypedKey {
    fn prompt(&self, _message: &str) -> Option<String> {
        Some("typed-key".into())
    }
}

#[tokio::test]
async fn test_prompted_key_is_stored_and_sent() {
    let mock = Mock::new(dsl_reply(), compiled_reply("<div>ok</div>"));
    let cfg = start(mock.clone()).await;
    let store = MemoryStore::new();

    let mut out = OutputRenderer::deferred(HostPage::new(&cfg.page, cfg.backend.base_url()));
    Pipeline::new(&cfg, &store, &TypedKey)
        .run(&mut out)
        .await
        .unwrap();

    assert_eq!(
        store.get("geminiApiKey").unwrap().as_deref(),
        Some("typed-key")
    );
    assert_eq!(mock.seen_key.lock().unwrap().as_deref(), Some("typed-key"));
}

#[tokio::test]
async fn test_compile_error_status_shows_service_detail() {
    let mock = Mock::new(
        dsl_reply(),
        Reply::Json(
            StatusCode::BAD_REQUEST,
            json!({ "error": { "code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT" } }),
        ),
    );
    let cfg = start(mock.clone()).await;
    let store = stored_key();

    let mut out = OutputRenderer::deferred(HostPage::new(&cfg.page, cfg.backend.base_url()));
    let err = Pipeline::new(&cfg, &store, &DeclinePrompt)
        .run(&mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::CompileRequest { status: 400, .. }));
    assert!(
        out.page()
            .region()
            .html()
            .contains("API key not valid. Please pass a valid API key.")
    );
}

#[tokio::test]
async fn test_compile_error_without_body_uses_fallback() {
    let mock = Mock::new(
        dsl_reply(),
        Reply::Text(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded"),
    );
    let cfg = start(mock).await;
    let store = stored_key();

    let mut out = OutputRenderer::deferred(HostPage::new(&cfg.page, cfg.backend.base_url()));
    let err = Pipeline::new(&cfg, &store, &DeclinePrompt)
        .run(&mut out)
        .await
        .unwrap_err();

    match err {
        Error::CompileRequest { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Failed to get a response from the compile endpoint.");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_success_without_text_is_empty_response() {
    let mock = Mock::new(dsl_reply(), Reply::Json(StatusCode::OK, json!({ "candidates": [] })));
    let cfg = start(mock).await;
    let store = stored_key();

    let mut out = OutputRenderer::deferred(HostPage::new(&cfg.page, cfg.backend.base_url()));
    let err = Pipeline::new(&cfg, &store, &DeclinePrompt)
        .run(&mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::CompileEmptyResponse));
    assert_eq!(out.state(), RenderState::Errored);
}

#[tokio::test]
async fn test_success_with_non_json_body_is_malformed() {
    let mock = Mock::new(dsl_reply(), Reply::Text(StatusCode::OK, "<div>not json</div>"));
    let cfg = start(mock).await;
    let store = stored_key();

    let mut out = OutputRenderer::deferred(HostPage::new(&cfg.page, cfg.backend.base_url()));
    let err = Pipeline::new(&cfg, &store, &DeclinePrompt)
        .run(&mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_initial_data_without_script_is_malformed() {
    let mock = Mock::new(
        Reply::Json(StatusCode::OK, json!({ "dsl": DSL })),
        compiled_reply("<div>never</div>"),
    );
    let cfg = start(mock.clone()).await;
    let store = stored_key();

    let mut out = OutputRenderer::deferred(HostPage::new(&cfg.page, cfg.backend.base_url()));
    let err = Pipeline::new(&cfg, &store, &DeclinePrompt)
        .run(&mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedResponse { .. }));
    assert_eq!(mock.hits(), (1, 0));
    assert!(out.page().region().html().contains("script"));
}

#[tokio::test]
async fn test_fenced_response_is_unwrapped() {
    let mock = Mock::new(
        dsl_reply(),
        compiled_reply("```html\n<div id=\"review-form\">x</div>\n<script>go();</script>\n```"),
    );
    let cfg = start(mock).await;
    let store = stored_key();

    let mut out = renderer(&cfg, RecordingHost::default());
    Pipeline::new(&cfg, &store, &DeclinePrompt)
        .run(&mut out)
        .await
        .unwrap();

    let region = out.page().region().html();
    assert!(!region.contains("```"));
    assert!(region.contains("<div id=\"review-form\">x</div>"));
    assert_eq!(out.host().runs, vec![("go();".to_string(), true)]);
}

#[tokio::test]
async fn test_fences_kept_when_disabled() {
    let mock = Mock::new(dsl_reply(), compiled_reply("```html\n<div>x</div>\n```"));
    let mut cfg = start(mock).await;
    cfg.compiler.strip_code_fences = false;
    let store = stored_key();

    let mut out = OutputRenderer::deferred(HostPage::new(&cfg.page, cfg.backend.base_url()));
    Pipeline::new(&cfg, &store, &DeclinePrompt)
        .run(&mut out)
        .await
        .unwrap();

    assert!(out.page().region().html().contains("```html"));
}

#[tokio::test]
async fn test_rerun_supersedes_previous_render() {
    let mock = Mock::new(dsl_reply(), compiled_reply("<div>ok</div>"));
    let cfg = start(mock.clone()).await;
    let store = stored_key();
    let pipeline = Pipeline::new(&cfg, &store, &DeclinePrompt);

    let mut out = OutputRenderer::deferred(HostPage::new(&cfg.page, cfg.backend.base_url()));
    pipeline.run(&mut out).await.unwrap();
    pipeline.run(&mut out).await.unwrap();

    assert_eq!(mock.hits(), (2, 2));
    assert_eq!(out.page().region().generation(), 2);
    assert_eq!(out.page().region().listeners().len(), 1);
    assert_eq!(out.page().region().html().matches("<div>ok</div>").count(), 1);
}
