// Standard library imports
use std::sync::Arc;

// Third party imports
use anyhow::Result;
use tracing::info;

// Internal imports
use feed_analyzer::api::{create_api_server, AppState};
use feed_analyzer::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Thiết lập cấu hình và logging
    let config = Config::from_env()?;
    feed_common::logger::init_logging(&config.log_level)?;

    info!("Khởi động feed analyzer service");

    let app_state = Arc::new(AppState { config });
    create_api_server(app_state).await
}
