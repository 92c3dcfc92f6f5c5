// src/cli/sessions.rs — Session subcommands and one-shot analysis

use anyhow::bail;

use super::render;
use super::SessionsAction;
use crate::app::App;
use crate::core::SubmitOutcome;
use crate::session::SessionManager;

/// Session id at a 1-based list position.
pub fn id_at(sessions: &SessionManager, index: usize) -> anyhow::Result<String> {
    match index.checked_sub(1).and_then(|i| sessions.sessions().get(i)) {
        Some(session) => Ok(session.id.clone()),
        None => bail!(
            "No session #{index}. There are {} session(s).",
            sessions.sessions().len()
        ),
    }
}

pub fn run_sessions(app: &App, action: Option<SessionsAction>) -> anyhow::Result<()> {
    let user = app.require_user()?;
    let mut sessions = app.sessions_for(user)?;

    match action.unwrap_or(SessionsAction::List) {
        SessionsAction::List => {
            print!(
                "{}",
                render::render_session_list(sessions.sessions(), sessions.active_id())
            );
        }
        SessionsAction::New => {
            sessions.create_session()?;
            println!("Started a new session.");
        }
        SessionsAction::Show { index } => {
            let id = id_at(&sessions, index.unwrap_or(1))?;
            if let Some(session) = sessions.get(&id) {
                print!("{}", render::render_transcript(session));
            }
        }
        SessionsAction::Delete { index } => {
            let id = id_at(&sessions, index)?;
            sessions.delete_session(&id)?;
            println!("Deleted session #{index}.");
        }
        SessionsAction::Rename { index, title } => {
            let id = id_at(&sessions, index)?;
            sessions.rename_session(&id, &title.join(" "))?;
            println!("Renamed session #{index}.");
        }
    }
    Ok(())
}

pub async fn run_analyze(
    app: &App,
    text: &str,
    new_session: bool,
    index: Option<usize>,
) -> anyhow::Result<()> {
    let user = app.require_user()?;
    let analyst = app.analyst()?;
    let mut sessions = app.sessions_for(user)?;

    let session_id = if new_session {
        sessions.create_session()?
    } else {
        id_at(&sessions, index.unwrap_or(1))?
    };

    let outcome = analyst.submit(&mut sessions, &session_id, text).await?;
    print_outcome(&outcome);
    Ok(())
}

/// Print the AI reply and any non-blocking notices.
pub fn print_outcome(outcome: &SubmitOutcome) {
    println!("{}", render::render_message(&outcome.reply));
    if let Some(ref e) = outcome.save_error {
        eprintln!("  (warning: this conversation was not saved: {e})");
    }
}
