//! Newschat server - exposes the chat state to a browser view.
//!
//! The browser renders the sidebar and transcript and turns clicks into the
//! intents below. All state lives in one shared `ChatApp`.
//!
//! Endpoints:
//! - GET /api/state - Full state snapshot
//! - POST /api/chats - Create a chat
//! - DELETE /api/chats/:id - Delete a chat
//! - POST /api/chats/:id/switch - Select a chat
//! - POST /api/messages - Ask a question in the current chat
//! - POST /api/sidebar/toggle - Toggle the sidebar
//! - POST /api/events - Any intent as tagged JSON
//! - WS /ws - Snapshot pushed after every change

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app::{AppSnapshot, ChatApp, SendOutcome, ViewEvent};
use crate::config::Config;
use crate::remote::AskBackend;
use crate::storage::KeyValueStore;

type SharedApp<S, C> = Arc<ChatApp<S, C>>;

// === Request/Response Types ===

/// Request to ask a question.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub text: String,
}

/// Result of a question plus the state after it settled.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub outcome: SendOutcome,
    pub state: AppSnapshot,
}

/// Result of a generic intent.
#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub outcome: Option<SendOutcome>,
    pub state: AppSnapshot,
}

// === Server Lifecycle ===

/// Start the server on `port` using the on-disk store.
pub async fn start_server(config: &Config, port: u16) -> Result<()> {
    let app = Arc::new(crate::cli::build_app(config));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    println!("Newschat server starting on http://{addr}");
    println!("Chats stored in {}", config.data_dir.display());
    tracing::info!(%addr, api = %config.api_base_url, model = %config.model, "server started");

    serve(listener, app).await
}

/// Serve `app` on an already bound listener until the server stops.
pub async fn serve<S, C>(listener: TcpListener, app: SharedApp<S, C>) -> Result<()>
where
    S: KeyValueStore + 'static,
    C: AskBackend + 'static,
{
    axum::serve(listener, router(app))
        .await
        .context("Server error")
}

/// Build the HTTP routes over a shared app.
pub fn router<S, C>(app: SharedApp<S, C>) -> Router
where
    S: KeyValueStore + 'static,
    C: AskBackend + 'static,
{
    Router::new()
        .route("/api/state", get(get_state::<S, C>))
        .route("/api/chats", post(create_chat::<S, C>))
        .route("/api/chats/{chat_id}", delete(delete_chat::<S, C>))
        .route("/api/chats/{chat_id}/switch", post(switch_chat::<S, C>))
        .route("/api/messages", post(send_message::<S, C>))
        .route("/api/sidebar/toggle", post(toggle_sidebar::<S, C>))
        .route("/api/events", post(dispatch_event::<S, C>))
        .route("/ws", get(websocket_handler::<S, C>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

// === Handlers ===

async fn get_state<S, C>(State(app): State<SharedApp<S, C>>) -> Json<AppSnapshot>
where
    S: KeyValueStore,
    C: AskBackend,
{
    Json(app.snapshot().await)
}

async fn create_chat<S, C>(State(app): State<SharedApp<S, C>>) -> Json<AppSnapshot>
where
    S: KeyValueStore,
    C: AskBackend,
{
    app.create_chat().await;
    Json(app.snapshot().await)
}

async fn delete_chat<S, C>(
    State(app): State<SharedApp<S, C>>,
    Path(chat_id): Path<String>,
) -> Json<AppSnapshot>
where
    S: KeyValueStore,
    C: AskBackend,
{
    app.delete_chat(&chat_id).await;
    Json(app.snapshot().await)
}

async fn switch_chat<S, C>(
    State(app): State<SharedApp<S, C>>,
    Path(chat_id): Path<String>,
) -> Result<Json<AppSnapshot>, StatusCode>
where
    S: KeyValueStore,
    C: AskBackend,
{
    if !app.switch_chat(&chat_id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(app.snapshot().await))
}

async fn send_message<S, C>(
    State(app): State<SharedApp<S, C>>,
    Json(req): Json<SendRequest>,
) -> Json<SendResponse>
where
    S: KeyValueStore + 'static,
    C: AskBackend + 'static,
{
    let outcome = app.send_message(&req.text).await;
    Json(SendResponse {
        outcome,
        state: app.snapshot().await,
    })
}

async fn toggle_sidebar<S, C>(State(app): State<SharedApp<S, C>>) -> Json<AppSnapshot>
where
    S: KeyValueStore,
    C: AskBackend,
{
    app.toggle_sidebar();
    Json(app.snapshot().await)
}

async fn dispatch_event<S, C>(
    State(app): State<SharedApp<S, C>>,
    Json(event): Json<ViewEvent>,
) -> Json<DispatchResponse>
where
    S: KeyValueStore + 'static,
    C: AskBackend + 'static,
{
    let outcome = app.dispatch(event).await;
    Json(DispatchResponse {
        outcome,
        state: app.snapshot().await,
    })
}

async fn websocket_handler<S, C>(
    ws: WebSocketUpgrade,
    State(app): State<SharedApp<S, C>>,
) -> impl IntoResponse
where
    S: KeyValueStore + 'static,
    C: AskBackend + 'static,
{
    ws.on_upgrade(|socket| handle_websocket(socket, app))
}

async fn handle_websocket<S, C>(mut socket: WebSocket, app: SharedApp<S, C>)
where
    S: KeyValueStore,
    C: AskBackend,
{
    let mut events = app.subscribe();
    let mut loading = app.subscribe_loading();

    if !push_snapshot(&mut socket, &app).await {
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => {
                if let Err(RecvError::Closed) = event {
                    break;
                }
            }
            changed = loading.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        if !push_snapshot(&mut socket, &app).await {
            break;
        }
    }
}

/// Send the current snapshot. Returns `false` once the socket is gone.
async fn push_snapshot<S, C>(socket: &mut WebSocket, app: &ChatApp<S, C>) -> bool
where
    S: KeyValueStore,
    C: AskBackend,
{
    let snapshot = app.snapshot().await;
    match serde_json::to_string(&snapshot) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize snapshot");
            true
        }
    }
}
