use clap::{Parser, Subcommand};
use portal_client::{converse, ChatClient, ClientConfig, TurnOutcome};
use portal_core::activity::{ActivityEntry, ActivityResult};
use portal_core::chat::{ChatReply, Transcript};
use portal_core::incident::format_elapsed;
use portal_core::metrics::{portal_sections, PanelSection};
use portal_core::{PortalError, Role, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "portal-chat", about = "Department chat console for the incident portal demo")]
struct Cli {
    /// Department to act as (IT, OPS, FINANCE, CSM)
    #[arg(long, default_value = "IT", value_parser = parse_role)]
    role: Role,

    /// Chat backend base URL; overrides PORTAL_API_URL
    #[arg(long)]
    url: Option<String>,

    /// Raise the demo incident before the first message
    #[arg(long)]
    trigger: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat on stdin (default)
    Chat,
    /// Show the permissions the backend grants the role
    Permissions,
    /// Check backend health
    Health,
    /// Send one raw request body to the full chat protocol endpoint
    Send {
        /// JSON request body
        body: String,
    },
}

fn parse_role(raw: &str) -> Result<Role, String> {
    raw.parse::<Role>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), PortalError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.url {
        config = config.with_base_url(url)?;
    }
    tracing::info!(base_url = %config.base_url, role = %cli.role, "portal-chat starting");
    let client = ChatClient::new(config)?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Health => {
            let health = client.health().await?;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
        Command::Permissions => {
            let perms = client.permissions(cli.role).await?;
            println!("{}", serde_json::to_string_pretty(&perms)?);
        }
        Command::Send { body } => {
            let body: serde_json::Value = serde_json::from_str(&body)?;
            match client.chat(cli.role, &body).await? {
                ChatReply::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                ChatReply::Events(events) => {
                    for event in events {
                        println!("{event}");
                    }
                }
            }
        }
        Command::Chat => run_chat(&client, cli.role, cli.trigger).await?,
    }
    Ok(())
}

async fn run_chat(client: &ChatClient, role: Role, trigger: bool) -> Result<(), PortalError> {
    let session = Session::new();
    let _banner = session.incident().subscribe(|state| match state.headline() {
        Some(headline) => println!("** Active Incident: {headline} [{} / {}]", state.priority, state.status),
        None => println!("** No active incident"),
    });

    if trigger {
        session.trigger_incident();
    }

    let cfg = role.config();
    println!("{} {} ({})", cfg.icon, cfg.portal_title, cfg.user_id);
    print_sections(role, &session);
    println!("Commands: /trigger /reset /feed /clear /quit");

    let mut transcript = Transcript::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/trigger" => {
                session.trigger_incident();
                print_sections(role, &session);
            }
            "/reset" => {
                session.reset_demo();
            }
            "/clear" => session.activity().clear(),
            "/feed" => print_feed(&session),
            message => match converse(&session, client, role, message, &mut transcript).await {
                TurnOutcome::Replied(entries) => {
                    if let Some(reply) = transcript.last() {
                        println!("Agent: {}", reply.content);
                    }
                    for entry in entries {
                        print_entry(&entry);
                    }
                }
                TurnOutcome::Stale => {}
                TurnOutcome::Failed(PortalError::EmptyMessage) => {}
                TurnOutcome::Failed(_) => {
                    if let Some(reply) = transcript.last() {
                        println!("Agent: {}", reply.content);
                    }
                }
            },
        }
    }

    if let Some(elapsed) = session.incident().snapshot().elapsed(chrono::Utc::now()) {
        println!("Incident open for {}", format_elapsed(elapsed));
    }
    Ok(())
}

fn print_sections(role: Role, session: &Session) {
    for section in portal_sections(role, &session.incident().snapshot()) {
        println!("-- {} --", section.title());
        match section {
            PanelSection::Tiles { tiles, .. } => {
                for tile in tiles {
                    match tile.subtext {
                        Some(sub) => println!("  {:<22} {:>10}  {sub}", tile.label, tile.value),
                        None => println!("  {:<22} {:>10}", tile.label, tile.value),
                    }
                }
            }
            PanelSection::Alerts { summary, items, .. } => {
                println!("  ({summary})");
                for alert in items {
                    println!("  ! {}", alert.text);
                }
            }
            PanelSection::Progress { left, right, percent, markers, footnote, .. } => {
                println!("  {left} [{percent:>3}%] {right}");
                if !markers.is_empty() {
                    println!("  {}", markers.join(" > "));
                }
                if let Some(note) = footnote {
                    println!("  {note}");
                }
            }
            PanelSection::Approvals { items, .. } => {
                for a in items {
                    println!("  {} {} {} ({})", a.title, a.amount, a.urgency, a.requested_by);
                }
            }
            PanelSection::Customers { items, .. } => {
                for c in items {
                    println!("  [{}] {:<16} {:<10} {}", c.initials, c.name, c.sla, c.status);
                }
            }
        }
    }
}

fn print_feed(session: &Session) {
    let entries = session.activity().entries();
    println!("Live Activity Feed ({} events)", entries.len());
    if entries.is_empty() {
        println!("  No activity yet. Trigger an incident to see actions");
    }
    for entry in &entries {
        print_entry(entry);
    }
}

fn print_entry(entry: &ActivityEntry) {
    let mark = match entry.result {
        ActivityResult::Success => "ok",
        ActivityResult::Error => "ERR",
        ActivityResult::Pending => "..",
    };
    println!(
        "  {} [{}] {:<3} {} - {}",
        entry.time_of_day(),
        entry.role_display,
        mark,
        entry.action,
        entry.details
    );
}
