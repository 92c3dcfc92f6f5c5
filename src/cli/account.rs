// src/cli/account.rs — login, signup, password reset, logout, whoami

use crate::app::App;
use crate::infra::errors::AuthError;

fn prompt_text(label: &str, given: Option<String>) -> anyhow::Result<String> {
    match given {
        Some(value) => Ok(value),
        None => Ok(inquire::Text::new(label).prompt()?),
    }
}

fn prompt_password() -> anyhow::Result<String> {
    Ok(inquire::Password::new("Password:")
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?)
}

/// Auth failures are reported inline and are not process errors.
fn report(result: Result<crate::auth::User, AuthError>) -> anyhow::Result<()> {
    match result {
        Ok(user) => {
            println!("Welcome, {}! Run `reqanalyzer` to start analyzing.", user.name);
            Ok(())
        }
        Err(AuthError::Persistence(e)) => Err(e.into()),
        Err(e) => {
            eprintln!("  {e}");
            Ok(())
        }
    }
}

pub fn run_login(app: &App, email: Option<String>) -> anyhow::Result<()> {
    let email = prompt_text("Email address:", email)?;
    let password = prompt_password()?;
    report(app.auth.login(&email, &password))
}

pub fn run_signup(app: &App, email: Option<String>, name: Option<String>) -> anyhow::Result<()> {
    let name = prompt_text("Full name:", name)?;
    let email = prompt_text("Email address:", email)?;
    let password = prompt_password()?;
    report(app.auth.signup(&email, &password, &name))
}

pub fn run_reset_password(app: &App, email: Option<String>) -> anyhow::Result<()> {
    let email = prompt_text("Email address:", email)?;
    let ack = app.auth.request_password_reset(&email);
    println!("{}", ack.message());
    Ok(())
}

pub fn run_logout(app: &App) -> anyhow::Result<()> {
    app.auth.logout()?;
    println!("Logged out.");
    Ok(())
}

pub fn run_whoami(app: &App) -> anyhow::Result<()> {
    match app.auth.restore_session() {
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("Not logged in."),
    }
    Ok(())
}
