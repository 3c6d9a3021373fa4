use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use eframe::egui;
use feed_client::auth::Session;
use feed_client::cli::{Cli, run_command};
use feed_client::network::{ApiClient, ApiWorker};
use feed_client::ui::FeedApp;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> ExitCode {
    // .env must be loaded before clap reads env-backed flags
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let settings = cli.settings();

    let session = match cli.open_session(&settings) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let client = ApiClient::new(settings.endpoints.clone(), session.clone());

    match cli.command {
        Some(command) => {
            let mut stdout = std::io::stdout().lock();
            match run_command(command, &client, &mut stdout).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    log::debug!("Command failed: {err:?}");
                    eprintln!("{err}");
                    ExitCode::FAILURE
                }
            }
        }
        None => match run_window(client, session) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                log::error!("Window terminated: {err}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run_window(client: ApiClient, session: Session) -> Result<(), eframe::Error> {
    // UI -> API worker
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // API worker -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    log::info!("Using API at {}", client.endpoints().api_url);
    tokio::spawn(ApiWorker::new(client, event_tx, cmd_rx).run());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 760.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rust Feed",
        options,
        Box::new(move |cc| Ok(Box::new(FeedApp::new(cc, session, cmd_tx, event_rx)))),
    )
}
