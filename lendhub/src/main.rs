mod api;
mod app_state;
mod http;
mod init_telemetry;
mod notification;
mod services;
mod settings;
mod stop_flag;
mod tasks;

use http::setup_http_server;
use tasks::scheduler::setup_scheduler;
use tokio::time::sleep;
use tracing::info;

use clap::Parser;

#[derive(Parser)]
#[command(name = "lendhub")]
#[command(about = "Administrative API server for a lending operation")]
#[clap(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser)]
enum Commands {
    /// Show current configuration and exit
    Config,
    /// Start the lendhub server (default)
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Config => {
            let app_state = app_state::AppState::new_for_config_only().await?;
            println!("{:#?}", &app_state.settings);
            return Ok(());
        }
        Commands::Run => {
            // Continue with the normal server startup
        }
    }

    let mut handles = vec![];

    let app_state = app_state::AppState::new().await?;
    init_telemetry::init_telemetry_and_tracing(&app_state.settings.telemetry)?;

    // Setup http server.
    {
        let handle =
            setup_http_server(app_state.clone(), &app_state.settings.api.bind_address.clone())
                .await?;

        handles.push(handle);
    }

    // Setup background jobs (overdue check, retention sweep).
    {
        let handle = setup_scheduler(app_state.clone()).await?;
        handles.push(handle);
    }

    sleep(std::time::Duration::from_millis(100)).await;

    loop {
        // Remove and await completed handles
        handles.retain(|handle| !handle.is_finished());

        // Break the loop if no more handles are running
        if handles.is_empty() {
            info!("All tasks are done");
            break;
        }

        // Sleep for a short duration to avoid busy-waiting
        tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;
    }

    Ok(())
}
