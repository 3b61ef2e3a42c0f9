use dotenvy::dotenv;
use env_logger::Builder;
use log::{info, warn, LevelFilter};
use std::sync::Arc;

use mafia_server::{
    app,
    models::config::BotConfig,
    services::{delivery::HttpDelivery, store::JsonFileStore, sync_loop},
    state::AppState,
};

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .filter_module("tower_http", level)
        .filter_module("axum", level)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .format_target(true)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_result = dotenv();
    let config = BotConfig::from_env();
    init_logger(config.verbose_logging);
    if let Err(e) = dotenv_result {
        warn!("No .env file loaded: {}", e);
    }

    let store = Arc::new(JsonFileStore::new(config.data_path.clone()));
    let delivery = Arc::new(HttpDelivery::new(config.delivery_url.clone()));
    let addr = config.bind_addr;
    let state = AppState::new(config, store, delivery);

    tokio::spawn(sync_loop::run(state.clone()));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("MafiaBot listening on http://{}", addr);
    axum::serve(listener, app::create_app(state)).await?;
    Ok(())
}
