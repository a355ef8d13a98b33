//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default port for `newschat serve`.
pub const DEFAULT_PORT: u16 = 58232;

/// Newschat - ask questions about recent news, one conversation per chat
#[derive(Parser, Debug)]
#[command(name = "newschat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the question-answering service
    #[arg(long, env = "NEWSCHAT_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Model identifier sent with each question
    #[arg(short, long, env = "NEWSCHAT_MODEL", global = true)]
    pub model: Option<String>,

    /// Directory where chats are stored
    #[arg(long, env = "NEWSCHAT_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List chats, newest first
    List,

    /// Start a new chat
    New,

    /// Delete a chat
    Delete {
        /// Chat ID to delete
        id: String,
    },

    /// Show the messages of a chat
    Show {
        /// Chat ID (defaults to the newest chat)
        id: Option<String>,
    },

    /// Ask a question
    Ask {
        /// Chat to ask in (defaults to the newest chat)
        #[arg(short, long)]
        chat: Option<String>,

        /// Question text
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,
    },

    /// Interactive chat session (default)
    Chat,

    /// Serve the chat state to a browser view
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ask_with_chat() {
        let cli = Cli::parse_from(["newschat", "ask", "--chat", "abc", "what", "happened?"]);
        match cli.command {
            Some(Commands::Ask { chat, question }) => {
                assert_eq!(chat.as_deref(), Some("abc"));
                assert_eq!(question.join(" "), "what happened?");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::parse_from(["newschat", "list", "--model", "m1"]);
        assert_eq!(cli.model.as_deref(), Some("m1"));
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn serve_default_port() {
        let cli = Cli::parse_from(["newschat", "serve"]);
        assert!(matches!(cli.command, Some(Commands::Serve { port: DEFAULT_PORT })));
    }
}
