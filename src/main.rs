use anyhow::{Result, anyhow, bail};
use clap::Parser;
use petmatch_notifications::{
    app_state::SharedAppState,
    navigation::{InMemoryNavigator, Navigator, RouteParams},
    notifications::{
        entities::{ForegroundState, NotificationEnvelope, NotificationKind},
        gateway::dummy::DummyNotificationGateway,
    },
    session::{InMemorySessionStore, SessionStore},
    settings::Settings,
    startup::{ClientContext, start_application},
};
use serde_json::json;
use std::{error::Error, path::PathBuf, str::FromStr, sync::Arc};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Development console for the PetMatch notification lifecycle
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Settings file, defaults to ./settings.toml
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Login(Option<String>),
    Logout,
    Foreground(ForegroundState),
    Ready,
    Open(String, Option<String>),
    Receive(NotificationEnvelope),
    Tap(NotificationEnvelope),
    Status,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            bail!("empty command");
        };
        let first = words.next().map(str::to_string);
        let second = words.next().map(str::to_string);

        let command = match name {
            "login" => Command::Login(first),
            "logout" => Command::Logout,
            "foreground" => Command::Foreground(parse_foreground(first.as_deref())?),
            "ready" => Command::Ready,
            "open" => Command::Open(first.ok_or_else(|| anyhow!("open needs a screen"))?, second),
            "receive" => Command::Receive(parse_envelope(first.as_deref(), second)?),
            "tap" => Command::Tap(parse_envelope(first.as_deref(), second)?),
            "status" => Command::Status,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command '{}'", other),
        };
        Ok(command)
    }
}

fn parse_foreground(state: Option<&str>) -> Result<ForegroundState> {
    match state {
        Some("active") => Ok(ForegroundState::Active),
        Some("background") => Ok(ForegroundState::Background),
        Some("inactive") => Ok(ForegroundState::Inactive),
        _ => bail!("foreground needs one of active, background, inactive"),
    }
}

fn parse_envelope(kind: Option<&str>, chat_id: Option<String>) -> Result<NotificationEnvelope> {
    let kind = match kind {
        Some("match") => NotificationKind::Match,
        Some("chat") => NotificationKind::Chat,
        _ => bail!("notification kind must be match or chat"),
    };
    Ok(NotificationEnvelope::new(kind, chat_id))
}

struct Console {
    notification_gateway: Arc<DummyNotificationGateway>,
    navigator: Arc<InMemoryNavigator>,
    app_state: Arc<SharedAppState>,
    session_store: Arc<InMemorySessionStore>,
    auth_signal: mpsc::UnboundedSender<bool>,
}

impl Console {
    /// Runs one command, returning false once the console should stop
    async fn execute(&self, command: Command) -> Result<bool> {
        match command {
            Command::Login(token) => {
                let token = token.unwrap_or_else(|| "dev-token".to_string());
                self.session_store.store_auth_token(token).await?;
                self.auth_signal.send(true)?;
            }
            Command::Logout => {
                self.session_store.clear().await?;
                self.auth_signal.send(false)?;
            }
            Command::Foreground(state) => self.app_state.set_foreground_state(state),
            Command::Ready => self.navigator.set_ready(true),
            Command::Open(screen, chat_id) => {
                let mut params = RouteParams::new();
                if let Some(chat_id) = chat_id {
                    params.insert("chatId".to_string(), json!(chat_id));
                }
                self.navigator.navigate(&screen, params);
            }
            Command::Receive(envelope) => {
                let directive = self.notification_gateway.deliver(envelope);
                println!("{}", serde_json::to_string(&directive)?);
            }
            Command::Tap(envelope) => self.notification_gateway.tap(envelope),
            Command::Status => {
                let gateway = &self.notification_gateway;
                println!(
                    "badge={} displayed={} received_listeners={} tapped_listeners={} route={:?}",
                    gateway.badge_count(),
                    gateway.displayed_count(),
                    gateway.live_received_listeners(),
                    gateway.live_tapped_listeners(),
                    self.navigator.current_route(),
                );
            }
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("RUST_LOG"))
        .init();

    let args = Args::parse();
    let settings = match &args.settings {
        Some(path) => Settings::load_from_path(path)?,
        None => Settings::load()?,
    };

    let ClientContext {
        notification_gateway,
        navigator,
        app_state,
        session_store,
        lifecycle,
    } = start_application(&settings)?;

    let (auth_tx, auth_rx) = mpsc::unbounded_channel();
    let lifecycle_handle = lifecycle.spawn(auth_rx);

    let console = Console {
        notification_gateway,
        navigator,
        app_state,
        session_store,
        auth_signal: auth_tx,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };
        debug!("Executing {:?}", command);
        match console.execute(command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => warn!("Command failed: {}", e),
        }
    }

    drop(console);
    if let Err(e) = lifecycle_handle.await {
        log::error!("Notification lifecycle task failed: {:?}", e);
    }

    Ok(())
}
