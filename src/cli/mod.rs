// src/cli/mod.rs — CLI definition (clap derive)

pub mod account;
pub mod chat;
pub mod render;
pub mod sessions;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "reqanalyzer",
    about = "Turn vague requirements into clear user stories",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat (default when no subcommand given)
    Chat,
    /// Analyze one requirement in the active (newest) session
    Analyze {
        /// Requirement text
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
        /// Start a new session for this requirement
        #[arg(long)]
        new: bool,
        /// Use the session at this list position instead (1-based)
        #[arg(short, long, conflicts_with = "new")]
        session: Option<usize>,
    },
    /// List and manage chat sessions
    Sessions {
        #[command(subcommand)]
        action: Option<SessionsAction>,
    },
    /// Log in with the demo account
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Request a password reset link
    ResetPassword {
        #[arg(long)]
        email: Option<String>,
    },
    /// Log out the current user
    Logout,
    /// Show the logged-in user
    Whoami,
}

#[derive(Subcommand, Clone)]
pub enum SessionsAction {
    /// List sessions, newest first
    List,
    /// Start a new session
    New,
    /// Print a session transcript (defaults to the newest)
    Show { index: Option<usize> },
    /// Delete a session by list position
    Delete { index: usize },
    /// Rename a session
    Rename {
        index: usize,
        #[arg(trailing_var_arg = true, required = true)]
        title: Vec<String>,
    },
}
