//! In-process stand-in for the question-answering service.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use newschat::remote::AskRequest;
use tokio::net::TcpListener;

/// Canned reply plus a log of received requests.
#[derive(Clone)]
pub struct QaStub {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Arc<Mutex<Vec<AskRequest>>>,
}

impl QaStub {
    pub fn answering(body: serde_json::Value) -> Self {
        Self::raw(StatusCode::OK, body.to_string())
    }

    pub fn failing(status: StatusCode) -> Self {
        Self::raw(status, r#"{"detail":"boom"}"#.to_string())
    }

    pub fn raw(status: StatusCode, body: String) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Hold every reply for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<AskRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/news-chat", post(handle))
            .with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn handle(
    State(stub): State<QaStub>,
    Json(req): Json<AskRequest>,
) -> (StatusCode, [(&'static str, &'static str); 1], String) {
    stub.requests.lock().unwrap().push(req);
    tokio::time::sleep(stub.delay).await;
    (
        stub.status,
        [("content-type", "application/json")],
        stub.body.clone(),
    )
}

/// Base URL of a port nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
