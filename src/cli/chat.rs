// src/cli/chat.rs — Interactive REPL

use super::render;
use super::sessions::{id_at, print_outcome};
use crate::app::App;
use crate::core::Analyst;
use crate::infra::errors::{SessionError, SubmitError};
use crate::session::SessionManager;

/// Run the interactive chat REPL for the logged-in user.
pub async fn run_chat(app: &App) -> anyhow::Result<()> {
    let user = app.require_user()?;
    let analyst = app.analyst()?;
    let mut sessions = app.sessions_for(user)?;

    eprintln!(
        "reqanalyzer v{} | {} | {} <{}>",
        env!("CARGO_PKG_VERSION"),
        analyst.client().model(),
        sessions.user().name,
        sessions.user().email,
    );
    eprintln!("Type a requirement, or /help for commands.\n");

    if let Some(active) = sessions.active() {
        print!("{}", render::render_transcript(active));
    }

    while let Some(input) = read_input() {
        let trimmed = input.trim();

        if trimmed == "quit" || trimmed == "exit" || trimmed == "/quit" {
            break;
        }

        if trimmed.starts_with('/') {
            handle_slash_command(trimmed, &mut sessions);
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }

        send(&analyst, &mut sessions, trimmed).await;
    }

    Ok(())
}

async fn send(analyst: &Analyst, sessions: &mut SessionManager, text: &str) {
    let Some(session_id) = sessions.active_id().map(str::to_string) else {
        eprintln!("  No active session. Use /new.");
        return;
    };

    eprintln!("  analyzing...");
    match analyst.submit(sessions, &session_id, text).await {
        Ok(outcome) => print_outcome(&outcome),
        Err(SubmitError::Busy) => eprintln!("  Still analyzing the previous requirement."),
        Err(e) => eprintln!("[error] {e}"),
    }
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}

fn warn_unsaved(result: Result<(), SessionError>) {
    match result {
        Ok(()) => {}
        Err(SessionError::Persistence(e)) => {
            eprintln!("  (warning: changes were not saved: {e})");
        }
        Err(e) => eprintln!("  {e}"),
    }
}

fn handle_slash_command(input: &str, sessions: &mut SessionManager) {
    let (cmd, arg) = match input.split_once(' ') {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (input, ""),
    };

    match cmd {
        "/new" => {
            warn_unsaved(sessions.create_session().map(|_| ()));
            if let Some(active) = sessions.active() {
                print!("{}", render::render_transcript(active));
            }
        }

        "/list" => {
            print!(
                "{}",
                render::render_session_list(sessions.sessions(), sessions.active_id())
            );
        }

        "/switch" => match arg.parse::<usize>() {
            Ok(n) => match id_at(sessions, n) {
                Ok(id) => {
                    warn_unsaved(sessions.select_session(&id));
                    if let Some(active) = sessions.active() {
                        print!("{}", render::render_transcript(active));
                    }
                }
                Err(e) => eprintln!("  {e}"),
            },
            Err(_) => eprintln!("  Usage: /switch <n>  (see /list)"),
        },

        "/delete" => {
            let target = if arg.is_empty() {
                sessions.active_id().map(str::to_string)
            } else {
                match arg.parse::<usize>().map(|n| id_at(sessions, n)) {
                    Ok(Ok(id)) => Some(id),
                    Ok(Err(e)) => {
                        eprintln!("  {e}");
                        None
                    }
                    Err(_) => {
                        eprintln!("  Usage: /delete [n]");
                        None
                    }
                }
            };
            if let Some(id) = target {
                warn_unsaved(sessions.delete_session(&id));
                eprintln!("  Session deleted.");
            }
        }

        "/rename" => {
            if arg.is_empty() {
                eprintln!("  Usage: /rename <title>");
            } else if let Some(id) = sessions.active_id().map(str::to_string) {
                warn_unsaved(sessions.rename_session(&id, arg));
            }
        }

        "/show" => {
            if let Some(active) = sessions.active() {
                print!("{}", render::render_transcript(active));
            }
        }

        "/help" => {
            eprintln!("  /new            Start a new analysis");
            eprintln!("  /list           List sessions");
            eprintln!("  /switch <n>     Switch to session n");
            eprintln!("  /delete [n]     Delete session n (default: current)");
            eprintln!("  /rename <title> Rename the current session");
            eprintln!("  /show           Reprint the current conversation");
            eprintln!("  /quit           Exit");
            eprintln!();
            eprint!("{}", render::render_tips());
        }

        _ => {
            eprintln!("  Unknown command: {cmd}. Type /help for commands.");
        }
    }
}
