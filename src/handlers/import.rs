//! Bulk import message handlers: template, preview and commit.

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::auth;
use crate::services::import::{commit_batch, preview_batch};
use crate::services::template::{template_csv, template_filename};
use crate::store::DocumentStore;
use crate::types::{
    BulkEntity, CommitRequest, ErrorResponse, PreviewRequest, Request, SuccessResponse,
    TemplateRequest, TemplateResponse,
};

/// Handle import.template messages. Templates are public: they contain
/// only sample data, so no token is required (matching the portal UI,
/// which offers the download before login state is known).
pub async fn handle_template(client: Client, mut subscriber: Subscriber) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received import.template message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<TemplateRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let entity = match BulkEntity::parse(&request.payload.entity) {
            Some(entity) => entity,
            None => {
                let error = ErrorResponse::new(
                    request.id,
                    "UNSUPPORTED_ENTITY",
                    format!("Unsupported entity \"{}\"", request.payload.entity),
                );
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match template_csv(entity) {
            Ok(content) => {
                let response = SuccessResponse::new(
                    request.id,
                    TemplateResponse { filename: template_filename(entity), content },
                );
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                error!("Failed to generate template: {}", e);
                let error = ErrorResponse::new(request.id, "TEMPLATE_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Authorize an import request: valid token with the admin role.
fn authorize<T>(request: &Request<T>, jwt_secret: &str) -> Result<auth::AuthInfo, ErrorResponse> {
    match auth::extract_auth(request, jwt_secret) {
        Ok(info) if info.is_admin() => Ok(info),
        Ok(_) => Err(ErrorResponse::new(
            request.id,
            "UNAUTHORIZED",
            "Admin role required for bulk imports",
        )),
        Err(e) => Err(ErrorResponse::new(request.id, "UNAUTHORIZED", e.to_string())),
    }
}

/// Handle import.preview messages: full validation report, no writes.
pub async fn handle_preview(
    client: Client,
    mut subscriber: Subscriber,
    store: Arc<dyn DocumentStore>,
    jwt_secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received import.preview message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<PreviewRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let auth_info = match authorize(&request, &jwt_secret) {
            Ok(info) => info,
            Err(error) => {
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let entity = match BulkEntity::parse(&request.payload.entity) {
            Some(entity) => entity,
            None => {
                let error = ErrorResponse::new(
                    request.id,
                    "UNSUPPORTED_ENTITY",
                    format!("Unsupported entity \"{}\"", request.payload.entity),
                );
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match preview_batch(entity, &request.payload.file_content, store.as_ref()).await {
            Ok(report) => {
                info!(
                    user_id = %auth_info.user_id,
                    entity = %entity,
                    total = report.totals.total,
                    invalid = report.totals.invalid,
                    "Import preview served"
                );
                let response = SuccessResponse::new(request.id, report);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                let error = ErrorResponse::new(request.id, e.code(), e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle import.commit messages: re-validate and persist row by row.
pub async fn handle_commit(
    client: Client,
    mut subscriber: Subscriber,
    store: Arc<dyn DocumentStore>,
    jwt_secret: String,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received import.commit message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<CommitRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let auth_info = match authorize(&request, &jwt_secret) {
            Ok(info) => info,
            Err(error) => {
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let entity = match BulkEntity::parse(&request.payload.entity) {
            Some(entity) => entity,
            None => {
                let error = ErrorResponse::new(
                    request.id,
                    "UNSUPPORTED_ENTITY",
                    format!("Unsupported entity \"{}\"", request.payload.entity),
                );
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match commit_batch(entity, &request.payload.rows, store.as_ref()).await {
            Ok(report) => {
                info!(
                    user_id = %auth_info.user_id,
                    entity = %entity,
                    total = report.summary.total,
                    created = report.summary.created,
                    updated = report.summary.updated,
                    failed = report.summary.failed,
                    "Import commit finished"
                );
                let response = SuccessResponse::new(request.id, report);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                let error = ErrorResponse::new(request.id, e.code(), e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}
