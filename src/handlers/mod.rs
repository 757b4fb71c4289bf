//! NATS message handlers

pub mod import;
pub mod ping;

use std::sync::Arc;

use anyhow::Result;
use async_nats::Client;
use tokio::select;
use tracing::{error, info};

use crate::config::Config;
use crate::store::DocumentStore;

/// Start all message handlers
pub async fn start_handlers(
    client: Client,
    store: Arc<dyn DocumentStore>,
    config: &Config,
) -> Result<()> {
    info!("Starting message handlers...");

    // Subscribe to all subjects
    let ping_sub = client.subscribe("avsar.ping").await?;
    let template_sub = client.subscribe("avsar.import.template").await?;
    let preview_sub = client.subscribe("avsar.import.preview").await?;
    let commit_sub = client.subscribe("avsar.import.commit").await?;

    info!("Subscribed to NATS subjects");

    // Clone for each handler
    let client_ping = client.clone();
    let client_template = client.clone();
    let client_preview = client.clone();
    let client_commit = client.clone();

    let store_preview = Arc::clone(&store);
    let store_commit = Arc::clone(&store);

    let jwt_secret_preview = config.jwt_secret.clone();
    let jwt_secret_commit = config.jwt_secret.clone();

    // Spawn handlers
    let ping_handle = tokio::spawn(async move {
        ping::handle_ping(client_ping, ping_sub).await
    });

    let template_handle = tokio::spawn(async move {
        import::handle_template(client_template, template_sub).await
    });

    let preview_handle = tokio::spawn(async move {
        import::handle_preview(client_preview, preview_sub, store_preview, jwt_secret_preview).await
    });

    let commit_handle = tokio::spawn(async move {
        import::handle_commit(client_commit, commit_sub, store_commit, jwt_secret_commit).await
    });

    info!("All handlers started, waiting for messages...");

    // Wait for any handler to finish (which means an error occurred)
    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = template_handle => {
            error!("Template handler finished: {:?}", result);
        }
        result = preview_handle => {
            error!("Preview handler finished: {:?}", result);
        }
        result = commit_handle => {
            error!("Commit handler finished: {:?}", result);
        }
    }

    Ok(())
}
