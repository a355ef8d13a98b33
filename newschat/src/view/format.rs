//! Presentation helpers shared by the terminal and browser views.

use chrono::{DateTime, Local, Utc};

use crate::models::{Chat, Message, ResolvedSource, Sender};

/// Clock time of a message, e.g. `14:05`, in local time.
pub fn format_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

/// Calendar date of a chat, e.g. `2024-06-10`, in local time.
pub fn format_date(created: &DateTime<Utc>) -> String {
    created.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// Resolved title and link for every source of a message, in order.
pub fn source_links(message: &Message) -> Vec<ResolvedSource> {
    message
        .sources
        .iter()
        .enumerate()
        .map(|(index, source)| source.resolve(index))
        .collect()
}

/// Render one message as terminal text.
pub fn render_message(message: &Message) -> String {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Bot => "bot",
    };
    let mut out = format!("[{}] {who}: {}", format_time(&message.timestamp), message.text);

    let links = source_links(message);
    if !links.is_empty() {
        out.push_str("\n    Sources:");
        for (i, link) in links.iter().enumerate() {
            out.push_str(&format!("\n    {}. {} <{}>", i + 1, link.title, link.url));
        }
    }
    out
}

/// Render one sidebar row. `active` marks the current chat.
pub fn render_chat_row(chat: &Chat, active: bool, expanded: bool) -> String {
    let marker = if active { '*' } else { ' ' };
    if expanded {
        format!(
            "{marker} {}  {}  ({})",
            chat.id,
            chat.title,
            format_date(&chat.created)
        )
    } else {
        format!("{marker} {}", chat.title)
    }
}

/// Whether a view should let the user submit `text` right now.
pub fn can_submit(text: &str, loading: bool) -> bool {
    !loading && !text.trim().is_empty()
}
