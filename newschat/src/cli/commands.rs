//! CLI command execution.
//!
//! Each invocation loads the stored chats, acts, and exits. The `chat`
//! command keeps one session open and reads intents from stdin.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::{ChatApp, SendOutcome, ViewEvent};
use crate::config::Config;
use crate::remote::{AskBackend, NewsChatClient};
use crate::storage::{ChatPersistence, FileStore, KeyValueStore};
use crate::view;

use super::args::{Cli, Commands};

/// Application wired to the on-disk store and the HTTP client.
pub type CliApp = ChatApp<FileStore, NewsChatClient>;

/// How often the pending indicator ticks while waiting for an answer.
const PENDING_TICK: Duration = Duration::from_millis(500);

/// Build the application from resolved configuration.
pub fn build_app(config: &Config) -> CliApp {
    let store = FileStore::new(&config.data_dir);
    let persistence = ChatPersistence::with_key(store, config.storage_key.clone());
    let client = NewsChatClient::new(&config.api_base_url);
    ChatApp::new(persistence, client, config.model.clone())
}

pub async fn execute(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.api_url, cli.model, cli.data_dir)?;
    tracing::debug!(?config, "resolved configuration");

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Serve { port } => crate::server::start_server(&config, port).await,
        command => {
            let app = Arc::new(build_app(&config));
            run_command(&app, command).await
        }
    }
}

async fn run_command<S: KeyValueStore + 'static, C: AskBackend + 'static>(
    app: &Arc<ChatApp<S, C>>,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::List => {
            print_chats(app, true).await;
            Ok(())
        }
        Commands::New => {
            let id = app.create_chat().await;
            println!("Created chat {id}");
            Ok(())
        }
        Commands::Delete { id } => {
            if !app.delete_chat(&id).await {
                bail!("No chat with id {id}");
            }
            println!("Deleted chat {id}");
            Ok(())
        }
        Commands::Show { id } => {
            if let Some(id) = id {
                switch_or_fail(app, &id).await?;
            }
            print_current_chat(app).await;
            Ok(())
        }
        Commands::Ask { chat, question } => {
            if let Some(id) = chat {
                switch_or_fail(app, &id).await?;
            }
            let question = question.join(" ");
            let outcome = send_with_indicator(app, &question).await;
            if outcome == SendOutcome::Ignored {
                bail!("Question is empty");
            }
            print_last_reply(app).await;
            Ok(())
        }
        Commands::Chat => interactive(app).await,
        Commands::Serve { .. } => bail!("serve runs on its own and cannot be combined"),
    }
}

async fn switch_or_fail<S: KeyValueStore, C: AskBackend>(
    app: &ChatApp<S, C>,
    id: &str,
) -> Result<()> {
    if !app.switch_chat(id).await {
        bail!("No chat with id {id}");
    }
    Ok(())
}

// === Interactive Session ===

/// A line typed in the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    View(ViewEvent),
    List,
    Help,
    Quit,
    Unknown(String),
}

/// Parse one input line. Lines not starting with `/` are questions.
fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::View(ViewEvent::Send {
            text: line.to_string(),
        });
    };

    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(n, a)| (n, a.trim()));

    match (name, arg) {
        ("new", _) => Input::View(ViewEvent::Create),
        ("delete", id) if !id.is_empty() => Input::View(ViewEvent::Delete {
            id: id.to_string(),
        }),
        ("switch", id) if !id.is_empty() => Input::View(ViewEvent::Switch {
            id: id.to_string(),
        }),
        ("sidebar", _) => Input::View(ViewEvent::ToggleSidebar),
        ("list", _) => Input::List,
        ("help", _) => Input::Help,
        ("quit" | "exit", _) => Input::Quit,
        _ => Input::Unknown(trimmed.to_string()),
    }
}

async fn interactive<S: KeyValueStore + 'static, C: AskBackend + 'static>(
    app: &Arc<ChatApp<S, C>>,
) -> Result<()> {
    print_help();
    print_current_chat(app).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match parse_input(&line) {
            Input::View(ViewEvent::Send { text }) => {
                if !view::can_submit(&text, app.is_loading()) {
                    continue;
                }
                send_with_indicator(app, &text).await;
                print_last_reply(app).await;
            }
            Input::View(
                event @ (ViewEvent::Switch { .. } | ViewEvent::Delete { .. } | ViewEvent::Create),
            ) => {
                app.dispatch(event).await;
                print_current_chat(app).await;
            }
            Input::View(event) => {
                app.dispatch(event).await;
                print_chats(app, app.sidebar_expanded()).await;
            }
            Input::List => print_chats(app, app.sidebar_expanded()).await,
            Input::Help => print_help(),
            Input::Quit => break,
            Input::Unknown(cmd) => println!("Unknown command: {cmd} (try /help)"),
        }
    }

    Ok(())
}

/// Send a question, ticking a pending indicator on stderr until it settles.
async fn send_with_indicator<S: KeyValueStore + 'static, C: AskBackend + 'static>(
    app: &Arc<ChatApp<S, C>>,
    text: &str,
) -> SendOutcome {
    let send = app.send_message(text);
    tokio::pin!(send);

    let mut ticker = tokio::time::interval(PENDING_TICK);
    ticker.tick().await;

    let mut ticked = false;
    let outcome = loop {
        tokio::select! {
            outcome = &mut send => break outcome,
            _ = ticker.tick() => {
                if app.is_loading() {
                    eprint!(".");
                    ticked = true;
                }
            }
        }
    };
    if ticked {
        eprintln!();
    }
    outcome
}

// === Output ===

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!("Type a question and press Enter.");
    println!("Commands:");
    println!("  /new            Start a new chat");
    println!("  /switch <ID>    Switch to a chat");
    println!("  /delete <ID>    Delete a chat");
    println!("  /list           List chats");
    println!("  /sidebar        Show or hide chat ids and dates in /list");
    println!("  /quit           Leave");
}

async fn print_chats<S: KeyValueStore, C: AskBackend>(app: &ChatApp<S, C>, expanded: bool) {
    let snapshot = app.snapshot().await;
    for chat in &snapshot.chats {
        let active = snapshot.current_chat_id.as_deref() == Some(chat.id.as_str());
        println!("{}", view::render_chat_row(chat, active, expanded));
    }
}

async fn print_current_chat<S: KeyValueStore, C: AskBackend>(app: &ChatApp<S, C>) {
    let Some(chat) = app.current_chat().await else {
        return;
    };
    println!("== {} ==", chat.title);
    for message in &chat.messages {
        println!("{}", view::render_message(message));
    }
}

async fn print_last_reply<S: KeyValueStore, C: AskBackend>(app: &ChatApp<S, C>) {
    let reply = app
        .current_chat()
        .await
        .and_then(|chat| chat.messages.last().cloned());
    if let Some(message) = reply {
        println!("{}", view::render_message(&message));
    }
}
