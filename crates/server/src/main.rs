//! namematch server binary.

use server::{load_settings, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;
    let settings = load_settings()?;

    server::start_server(config, settings).await?;

    Ok(())
}
