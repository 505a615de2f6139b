use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, Server};

use membership_backend::api::build_app;
use membership_backend::cli::{self, Cli, Commands};
use membership_backend::config::{init_database, init_logging, migrate_database, Settings};
use membership_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    tracing::debug!("Loaded settings: {:?}", settings);

    let db = init_database(&settings).await?;
    migrate_database(&db).await?;

    let command = cli.command.unwrap_or(Commands::Serve);
    match command {
        Commands::Migrate => {
            tracing::info!("Database migrations completed");
            Ok(())
        }
        Commands::Serve => serve(Arc::new(AppData::init(db, settings))).await,
        other => cli::execute_command(other, Arc::new(AppData::init(db, settings))).await,
    }
}

async fn serve(app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    let address = app_data.settings.server_address();
    let app = build_app(app_data);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger", address);

    Server::new(TcpListener::bind(address)).run(app).await?;

    Ok(())
}
