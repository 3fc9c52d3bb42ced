#![allow(non_snake_case)]

use barberTrack::cli;
use barberTrack::config::AppConfig;

#[tokio::main]
async fn main() {
    let config = AppConfig::load();
    cli::cli(&config).await;
}
