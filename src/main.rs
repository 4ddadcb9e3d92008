use dotenv::dotenv;
use tracing::{error, info, warn};

use nas_backend::app::App;
use nas_backend::util::logger::Logger;

#[tokio::main]
async fn main() {
    // Load .env before the logger reads LOG_DIR and the level variables
    let dotenv_result = dotenv();

    let _logger = match Logger::new() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e}");
            std::process::exit(1);
        }
    };

    info!("Starting NAS scholarship backend");
    match dotenv_result {
        Ok(_) => info!("Loaded .env file"),
        Err(e) => warn!("Failed to load .env file: {} (using system env vars)", e),
    }

    let app = match App::new().await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialise application: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = app.start().await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
