#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashgate::config::ControllerConfig;
use dashgate::session::MemorySessionStore;
use dashgate::Controller;
use dashgate_adapters::{
    AccountApi, AdapterError, AgeRoute, AgeUpdateRequest, ApiResponse, AvatarFile, Endpoint,
    LoginRequest, RegisterRequest, Url,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

pub const BASE_URL: &str = "http://api.test";

/// Payload `{"email":"a@b.com"}`.
pub const TOKEN: &str = "h.eyJlbWFpbCI6ImFAYi5jb20ifQ.s";

/// One recorded call against the fake API.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: Endpoint,
    pub token: Option<String>,
    pub body: Option<Value>,
}

enum Scripted {
    Respond(ApiResponse),
    Fail,
    /// Waits for the test to release it before answering.
    Gated(oneshot::Receiver<()>, ApiResponse),
}

/// Fake account API answering from per-endpoint scripts.
pub struct ScriptedApi {
    base_url: Url,
    scripts: Mutex<HashMap<Endpoint, VecDeque<Scripted>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            base_url: Url::parse(BASE_URL).unwrap(),
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn push(&self, endpoint: Endpoint, scripted: Scripted) {
        self.scripts
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(scripted);
    }

    pub fn respond(&self, endpoint: Endpoint, status: u16, body: Value) {
        self.push(endpoint, Scripted::Respond(ApiResponse::new(status, Some(body))));
    }

    pub fn respond_without_body(&self, endpoint: Endpoint, status: u16) {
        self.push(endpoint, Scripted::Respond(ApiResponse::new(status, None)));
    }

    pub fn fail(&self, endpoint: Endpoint) {
        self.push(endpoint, Scripted::Fail);
    }

    /// Queues a response that is only delivered once the returned sender fires.
    pub fn respond_gated(&self, endpoint: Endpoint, status: u16, body: Value) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(endpoint, Scripted::Gated(rx, ApiResponse::new(status, Some(body))));
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint == endpoint)
            .collect()
    }

    async fn answer(
        &self,
        endpoint: Endpoint,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<ApiResponse, AdapterError> {
        self.calls.lock().unwrap().push(Call {
            endpoint,
            token: token.map(str::to_string),
            body,
        });
        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&endpoint)
            .and_then(|queue| queue.pop_front());
        match scripted {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail) => Err(AdapterError::transport(endpoint.path(), "connection reset")),
            Some(Scripted::Gated(gate, response)) => {
                let _ = gate.await;
                Ok(response)
            }
            None => panic!("unexpected call to {}", endpoint.path()),
        }
    }
}

#[async_trait]
impl AccountApi for ScriptedApi {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn register(&self, request: &RegisterRequest) -> Result<ApiResponse, AdapterError> {
        let body = serde_json::to_value(request).unwrap();
        self.answer(Endpoint::Register, None, Some(body)).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<ApiResponse, AdapterError> {
        let body = serde_json::to_value(request).unwrap();
        self.answer(Endpoint::Login, None, Some(body)).await
    }

    async fn fetch_profile(&self, token: &str) -> Result<ApiResponse, AdapterError> {
        self.answer(Endpoint::Profile, Some(token), None).await
    }

    async fn update_age(
        &self,
        token: &str,
        route: AgeRoute,
        request: &AgeUpdateRequest,
    ) -> Result<ApiResponse, AdapterError> {
        let body = serde_json::to_value(request).unwrap();
        self.answer(route.endpoint(), Some(token), Some(body)).await
    }

    async fn upload_avatar(
        &self,
        token: &str,
        file: &AvatarFile,
    ) -> Result<ApiResponse, AdapterError> {
        let body = json!({"file_name": file.file_name, "size": file.bytes.len()});
        self.answer(Endpoint::UploadAvatar, Some(token), Some(body)).await
    }
}

pub struct Harness {
    pub api: Arc<ScriptedApi>,
    pub store: Arc<MemorySessionStore>,
    pub controller: Controller,
}

pub fn harness(config: ControllerConfig, store: MemorySessionStore) -> Harness {
    let api = ScriptedApi::new();
    let store = Arc::new(store);
    let controller = Controller::new(&config, api.clone(), store.clone());
    Harness {
        api,
        store,
        controller,
    }
}

pub fn logged_out() -> Harness {
    harness(ControllerConfig::default(), MemorySessionStore::new())
}

pub fn logged_in() -> Harness {
    harness(ControllerConfig::default(), MemorySessionStore::with_token(TOKEN))
}
