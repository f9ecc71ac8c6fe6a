//! DriveMate CLI - log in, log out and inspect the saved session.
//!
//! Usage: `drivemate [status|login|logout]` (default: `status`).

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use drivemate_core::auth::{AuthHelper, StaticCredentialStore};
use drivemate_core::config::Config;
use drivemate_core::session::{
    KeyringSecretStore, SessionController, SessionFailure, SessionState, SessionStore,
};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Status,
    Login,
    Logout,
}

impl Command {
    fn parse(arg: Option<&str>) -> Result<Self> {
        match arg {
            None | Some("status") => Ok(Command::Status),
            Some("login") => Ok(Command::Login),
            Some("logout") => Ok(Command::Logout),
            Some(other) => bail!("Unknown command '{}'. Usage: drivemate [status|login|logout]", other),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let command = Command::parse(args.get(1).map(String::as_str))?;

    let mut config = match Config::load() {
        Ok(c) => CliConfig::loaded(c),
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            eprintln!("Warning: config file is unreadable; it will be left untouched ({:#})", e);
            CliConfig::fallback()
        }
    };

    let auth = AuthHelper::new(Arc::new(StaticCredentialStore::seeded()));
    let store = SessionStore::new(Arc::new(KeyringSecretStore::new(
        config.settings.keyring_service(),
        config.settings.keyring_account(),
    )));
    let session = SessionController::start(auth, store, config.settings.persistence_policy);

    eprintln!("Checking saved session...");
    let state = session.wait_ready().await;

    match command {
        Command::Status => print_status(&state),
        Command::Login => login(&session, &mut config).await?,
        Command::Logout => {
            if let Err(e) = session.logout().await {
                eprintln!("Warning: {}", e);
            }
            print_status(&session.state());
        }
    }

    Ok(())
}

/// Config plus whether it came from a readable file.
struct CliConfig {
    settings: Config,
    writable: bool,
}

impl CliConfig {
    fn loaded(settings: Config) -> Self {
        Self { settings, writable: true }
    }

    /// Defaults standing in for an unreadable file, which must not be overwritten.
    fn fallback() -> Self {
        Self {
            settings: Config::default(),
            writable: false,
        }
    }

    /// Record the last email and save. Returns `Ok(false)` when saving is skipped.
    fn remember_email(&mut self, email: &str) -> Result<bool> {
        self.settings.last_email = Some(email.to_string());
        if !self.writable {
            warn!("Not saving config: the existing file could not be read");
            return Ok(false);
        }
        self.settings.save()?;
        Ok(true)
    }
}

async fn login(session: &SessionController, config: &mut CliConfig) -> Result<()> {
    if let Some(user) = session.current_user() {
        println!("Already logged in as {} ({}).", user.email(), user.role());
        return Ok(());
    }

    println!("\n=== DriveMate Login ===\n");

    let email = match std::env::var("DRIVEMATE_EMAIL") {
        Ok(email) => email,
        Err(_) => prompt_email(config.settings.last_email.as_deref())?,
    };
    let password = match std::env::var("DRIVEMATE_PASSWORD") {
        Ok(password) => password,
        Err(_) => rpassword::prompt_password("Password: ")?,
    };

    match session.login(email.trim(), &password).await {
        Ok(user) => {
            if let Err(e) = config.remember_email(user.email()) {
                warn!(error = %e, "Failed to save config");
            }
            info!(email = %user.email(), "Logged in from CLI");
            print_status(&session.state());
            Ok(())
        }
        Err(SessionFailure::AlreadyLoggedIn(email)) => {
            println!("Already logged in as {}.", email);
            Ok(())
        }
        Err(e) => bail!("Login failed: {}", e),
    }
}

fn prompt_email(last: Option<&str>) -> Result<String> {
    match last {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match last {
        Some(last) if input.is_empty() => last.to_string(),
        _ => input.to_string(),
    })
}

fn print_status(state: &SessionState) {
    match &state.current_user {
        Some(user) if state.is_logged_in() => {
            let dashboard = if user.role().is_admin() { "admin" } else { "driver" };
            println!("Logged in as {} ({})", user.email(), user.role());
            println!("Dashboard: {}", dashboard);
            if let Some(at) = state.logged_in_at {
                println!("Session since: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
        _ => println!("Not logged in."),
    }

    if let Some(message) = state.error_message() {
        println!("Note: {}", message);
    }
}
