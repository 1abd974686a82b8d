//! In-process fake of the IAM and PowerVS endpoints.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::{Json, Router};
use powervs_core::PowerVsConfig;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const IAM_PATH: &str = "/iam/token";
pub const TOKEN: &str = "test-token";
pub const ACCOUNT: &str = "acct";

/// One request seen by the fake, IAM excluded.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub crn: Option<String>,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<String, (StatusCode, Value)>>,
    requests: Mutex<Vec<Recorded>>,
    iam_calls: AtomicUsize,
    iam_fails: AtomicBool,
    /// `expires_in` returned by the token endpoint.
    token_lifetime: AtomicU64,
}

pub struct MockUpstream {
    pub url: String,
    state: Arc<MockState>,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        state.token_lifetime.store(3600, Ordering::SeqCst);
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn route(&self, path: &str, body: Value) {
        self.route_status(path, StatusCode::OK, body);
    }

    pub fn route_status(&self, path: &str, status: StatusCode, body: Value) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body));
    }

    pub fn fail_iam(&self) {
        self.state.iam_fails.store(true, Ordering::SeqCst);
    }

    pub fn set_token_lifetime(&self, secs: u64) {
        self.state.token_lifetime.store(secs, Ordering::SeqCst);
    }

    pub fn iam_calls(&self) -> usize {
        self.state.iam_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_to(&self, path: &str) -> Option<Recorded> {
        self.requests().into_iter().find(|r| r.path == path)
    }

    /// Config pointing IAM and PowerVS at this fake.
    pub fn config(&self, crn: &str) -> PowerVsConfig {
        PowerVsConfig {
            account_id: ACCOUNT.into(),
            api_key: "test-api-key".into(),
            base_url: self.url.clone(),
            crn: crn.into(),
            iam_url: format!("{}{}", self.url, IAM_PATH),
            ..Default::default()
        }
        .validated()
        .unwrap()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let path = uri.path().to_string();

    if method == Method::POST && path == IAM_PATH {
        state.iam_calls.fetch_add(1, Ordering::SeqCst);
        if state.iam_fails.load(Ordering::SeqCst) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"errorMessage": "Provided API key could not be found."})),
            );
        }
        let expires_in = state.token_lifetime.load(Ordering::SeqCst);
        return (
            StatusCode::OK,
            Json(json!({"access_token": TOKEN, "expires_in": expires_in})),
        );
    }

    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if bearer != format!("Bearer {}", TOKEN) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"})));
    }

    state.requests.lock().unwrap().push(Recorded {
        path: path.clone(),
        crn: headers
            .get("crn")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    });

    let route = state.routes.lock().unwrap().get(&path).cloned();
    match route {
        Some((status, body)) => (status, Json(body)),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))),
    }
}

/// Workspace CRN as the client builds it for fleet lookups.
pub fn fleet_crn(region: &str, workspace_id: &str) -> String {
    format!(
        "crn:v1:staging:public:power-iaas:{}:a/{}:{}::",
        region, ACCOUNT, workspace_id
    )
}

pub fn instances_path(workspace_id: &str) -> String {
    format!("/pcloud/v1/cloud-instances/{}/pvm-instances", workspace_id)
}

pub fn vm_path(workspace_id: &str, vm_id: &str, suffix: &str) -> String {
    format!("{}/{}{}", instances_path(workspace_id), vm_id, suffix)
}

pub fn pvm(id: &str, health: &str, status: &str) -> Value {
    json!({
        "serverName": format!("{}-name", id),
        "pvmInstanceID": id,
        "osType": "aix",
        "sysType": "s922",
        "status": status,
        "health": {"status": health},
        "crn": format!("crn:vm:{}", id),
    })
}
