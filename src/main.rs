use domain::gateway::{GoogleOAuthClient, GoogleOAuthConfig};
use domain::oauth_login::LoginFlow;
use domain::scoreboard::DbScoreboardStore;
use domain::user::DbUserStore;
use log::*;
use migration::{Migrator, MigratorTrait};
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
        std::process::exit(1);
    }

    info!(
        "Starting scoreboard_api in {} mode",
        config.runtime_env()
    );

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(db.as_ref(), None).await {
        error!("Failed to apply database migrations: {e}");
        std::process::exit(1);
    }

    let provider = match GoogleOAuthConfig::from_config(&config).and_then(GoogleOAuthClient::new) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to configure Google OAuth: {e}");
            std::process::exit(1);
        }
    };

    let login_flow = LoginFlow::new(
        provider,
        Arc::new(DbUserStore::new(Arc::clone(&db))),
        config.default_callback_url(),
    );
    let scoreboards = Arc::new(DbScoreboardStore::new(Arc::clone(&db)));

    let app_state = web::AppState::new(config, Arc::new(login_flow), scoreboards);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
