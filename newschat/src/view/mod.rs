//! View-layer helpers.

mod format;

pub use format::{
    can_submit, format_date, format_time, render_chat_row, render_message, source_links,
};
