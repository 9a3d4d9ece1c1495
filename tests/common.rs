#![allow(dead_code)]

use axum::Router;
use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use classifier_console::config::{Config, Surface};
use classifier_console::console::Console;
use classifier_console::domain::session::{TOKEN_EXPIRES_KEY, TOKEN_KEY, USERNAME_KEY};
use classifier_console::services::session_service::{Clock, Confirmation, Navigator, SessionService};
use classifier_console::storage::{KeyValueStore, MemoryStore};
use clap::Parser;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

/// Fixed "now" for every test session, in epoch milliseconds.
pub const NOW_MS: i64 = 1_700_000_000_000;

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("classifier_console=debug".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
    });
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get("authorization").and_then(|v| v.to_str().ok())
    }

    /// Decoded query pairs in request order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let url = reqwest::Url::parse(&format!("http://mock{}?{}", self.path, self.query.as_deref().unwrap_or("")))
            .unwrap();
        url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    path: String,
    status: StatusCode,
    body: Value,
}

#[derive(Debug, Default)]
struct MockState {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<Recorded>>,
}

/// An in-process stand-in for the classification API. Unknown routes answer 404.
pub struct MockApi {
    pub url: String,
    state: Arc<MockState>,
}

impl MockApi {
    pub async fn spawn() -> Self {
        setup_tracing();
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url: format!("http://{addr}"), state }
    }

    pub fn on(&self, method: Method, path: &str, status: StatusCode, body: Value) -> &Self {
        let mut routes = self.state.routes.lock().unwrap();
        routes.retain(|r| !(r.method == method && r.path == path));
        routes.push(Route { method, path: path.to_string(), status, body });
        self
    }

    pub fn ok(&self, path: &str, body: Value) -> &Self {
        self.on(Method::GET, path, StatusCode::OK, body)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }
}

async fn handle(State(state): State<Arc<MockState>>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default().to_vec();
    let path = parts.uri.path().to_string();

    state.requests.lock().unwrap().push(Recorded {
        method: parts.method.clone(),
        path: path.clone(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers.clone(),
        body,
    });

    let route = state.routes.lock().unwrap().iter().find(|r| r.method == parts.method && r.path == path).cloned();
    match route {
        Some(route) => (route.status, axum::Json(route.body)).into_response(),
        None => (StatusCode::NOT_FOUND, axum::Json(serde_json::json!({"detail": "Not Found"}))).into_response(),
    }
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: AtomicUsize,
    last: Mutex<Option<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> usize {
        self.visits.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<String> {
        self.last.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn to_login(&self, login_url: &str) {
        self.visits.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(login_url.to_string());
    }
}

#[derive(Debug)]
pub struct FixedClock(pub AtomicI64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct Answer(pub AtomicBool);

impl Confirmation for Answer {
    fn confirm(&self, _question: &str) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct TestConsole {
    pub console: Console,
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
}

impl TestConsole {
    pub fn new(api: &MockApi, surface: Surface) -> Self {
        Self::with_args(&api.url, surface, &[])
    }

    pub fn with_args(url: &str, surface: Surface, extra: &[&str]) -> Self {
        let mut args = vec!["classifier-console", "--api-url", url, "--surface", surface.as_str()];
        args.extend_from_slice(extra);
        let config = Config::parse_from(args);

        let store = Arc::new(MemoryStore::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let session = SessionService::new(
            Arc::clone(&store) as Arc<dyn KeyValueStore>,
            Arc::clone(&navigator) as Arc<dyn Navigator>,
            Arc::new(Answer(AtomicBool::new(true))),
            config.login_url.clone(),
        )
        .with_clock(Arc::new(FixedClock(AtomicI64::new(NOW_MS))));

        let console = Console::new(&config, session).unwrap();
        Self { console, store, navigator }
    }

    /// Stores a session that expires `ttl_ms` after the fixed clock.
    pub fn sign_in(&self, token: &str, ttl_ms: i64) {
        self.store.set(TOKEN_KEY, token).unwrap();
        self.store.set(TOKEN_EXPIRES_KEY, &(NOW_MS + ttl_ms).to_string()).unwrap();
        self.store.set(USERNAME_KEY, "ops").unwrap();
    }

    pub fn session_keys_absent(&self) -> bool {
        [TOKEN_KEY, TOKEN_EXPIRES_KEY, USERNAME_KEY].iter().all(|k| self.store.get(k).is_none())
    }
}

pub fn scratch_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("classifier-console-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
