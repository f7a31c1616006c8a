// ABOUTME: Server binary for the Groomdesk scheduling API
// ABOUTME: Loads configuration, wires resources, and serves the axum router
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Groomdesk API Server Binary
//!
//! Starts the multi-tenant scheduling API with user authentication,
//! invitation email delivery, and database management.

use anyhow::Result;
use clap::Parser;
use groomdesk_server::{
    auth::AuthManager,
    config::environment::ServerConfig,
    context::ServerResources,
    database::Database,
    logging,
    notifications::{EmailGateway, HttpEmailGateway, LogOnlyEmailGateway},
    routes,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "groomdesk-server")]
#[command(about = "Groomdesk - multi-tenant scheduling API for dog-grooming shops")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;

    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting Groomdesk API");
    info!("{}", config.summary());

    let database = Database::new(&config.database_url.to_connection_string()).await?;
    info!("Database initialized successfully");

    let auth_manager = AuthManager::new(
        config.auth.jwt_secret.as_bytes().to_vec(),
        config.auth.jwt_expiry_hours,
    );
    info!("Authentication manager initialized");

    let email: Arc<dyn EmailGateway> = match (&config.email.api_url, &config.email.api_key) {
        (Some(api_url), Some(api_key)) => Arc::new(HttpEmailGateway::new(
            api_url.clone(),
            api_key.clone(),
            config.email.from_address.clone(),
        )),
        _ => {
            warn!("no email provider configured; invitation emails will only be logged");
            Arc::new(LogOnlyEmailGateway)
        }
    };

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        email,
        Arc::new(config),
    ));

    let app = routes::router(resources);
    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to install ctrl-c handler: {e}");
        return;
    }
    info!("shutdown signal received");
}
