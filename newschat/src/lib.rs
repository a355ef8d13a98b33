//! Newschat - a chat client for a news question-answering service.
//!
//! Architecture:
//! - `session` owns the chat collection and writes it through `storage`
//!   after every change
//! - `remote` asks the service one question per call
//! - `app` orchestrates a send (user message, remote call, reply) and
//!   exposes view intents and change notifications
//! - `cli` and `server` are the terminal and browser views

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod remote;
pub mod server;
pub mod session;
pub mod storage;
pub mod view;

pub use app::{ChatApp, SendOutcome, ViewEvent};
pub use config::Config;
pub use error::{PersistenceError, RemoteError};
