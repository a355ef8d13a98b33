//! Remote question-answering service.

mod client;
mod types;

pub use client::{AskBackend, NewsChatClient, ASK_PATH};
pub use types::{Answer, AskRequest, AskResponse};
