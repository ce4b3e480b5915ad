use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use spinwin_miniapp::{
    repositories::api::ApiClient,
    services::{
        controller::{Collaborators, InteractionController},
        view_model::ViewModelDeriver,
        EventService, Service,
    },
    settings::Settings,
    terminal::{
        route_input, Console, PendingPrompt, StaticHost, TerminalClipboard, TerminalDialog,
        TerminalSurface,
    },
};
use tokio::io::BufReader;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "miniapp.toml")]
    config: String,
    #[arg(long, default_value = "log4rs.yaml")]
    log4rs: String,
    #[arg(long)]
    backend_url: Option<String>,
    #[arg(long)]
    user_id: Option<i64>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let mut settings = Settings::new(&args.config)?;

    init_logging(&args.log4rs)?;
    log::info!("Starting Spin & Win mini app.");

    if let Some(url) = args.backend_url {
        settings.backend.url = url;
    }
    if args.user_id.is_some() {
        settings.host.user_id = args.user_id;
    }
    if args.username.is_some() {
        settings.host.username = args.username;
    }
    if args.first_name.is_some() {
        settings.host.first_name = args.first_name;
    }

    let console = Console::stdout();
    let pending = PendingPrompt::default();
    let collaborators = Collaborators {
        backend: Arc::new(ApiClient::new(&settings.backend.url)),
        surface: Arc::new(TerminalSurface::new(console.clone())),
        dialog: Arc::new(TerminalDialog::new(console.clone(), pending.clone())),
        clipboard: Arc::new(TerminalClipboard::new(console.clone())),
    };

    let host = StaticHost::new(&settings.host);
    let controller = InteractionController::attach(
        &host,
        collaborators,
        ViewModelDeriver::new(&settings.referral.bot_username, settings.eligibility),
        Duration::from_millis(settings.spin.animation_ms),
    );

    if controller.init().await.is_err() && !controller.identity().is_authenticated() {
        return Ok(());
    }

    let (event_tx, mut event_rx) = mpsc::channel(64);
    let mut event_service = EventService::new();
    let handler = controller.clone();
    let events = tokio::spawn(async move {
        event_service.run(handler, &mut event_rx).await;
    });

    route_input(BufReader::new(tokio::io::stdin()), pending, event_tx, console).await?;
    events.await?;

    log::info!("Input closed, shutting down.");
    Ok(())
}

fn init_logging(path: &str) -> Result<(), anyhow::Error> {
    if !Path::new("logs").exists() {
        fs::create_dir("logs")?;
    }

    match log4rs::init_file(path, Default::default()) {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("[ERROR] Failed to initialize logging: {}", e);
            Err(anyhow::anyhow!("Could not initialize logging: {}", e))
        }
    }
}
