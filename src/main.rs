// src/main.rs — reqanalyzer entry point

use clap::Parser;

use reqanalyzer::app::App;
use reqanalyzer::cli::{account, chat, sessions, Cli, Commands};
use reqanalyzer::infra::config::Config;
use reqanalyzer::infra::logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG overrides the level
    logger::init_logging(if cli.verbose { "debug" } else { "warn" });

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Falls back to defaults if no config.toml
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    let app = App::from_config(config);

    match cli.command {
        None | Some(Commands::Chat) => chat::run_chat(&app).await,
        Some(Commands::Analyze {
            text,
            new,
            session,
        }) => sessions::run_analyze(&app, &text.join(" "), new, session).await,
        Some(Commands::Sessions { action }) => sessions::run_sessions(&app, action),
        Some(Commands::Login { email }) => account::run_login(&app, email),
        Some(Commands::Signup { email, name }) => account::run_signup(&app, email, name),
        Some(Commands::ResetPassword { email }) => account::run_reset_password(&app, email),
        Some(Commands::Logout) => account::run_logout(&app),
        Some(Commands::Whoami) => account::run_whoami(&app),
    }
}
