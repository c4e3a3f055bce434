//! HTTP request handlers.

use super::types::{HealthResponse, ProvisionConversationRequest};
use super::AppState;
use crate::workflow;
use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let proxy_healthy = state.proxy_client.health_check().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        proxy_api_healthy: proxy_healthy,
    })
}

/// Provision a number-masked conversation.
///
/// Acknowledges with 202 and runs the workflow as a detached task; the
/// caller never learns its outcome. The body is not validated here; bad
/// input surfaces as a remote-call failure in the logs.
pub async fn create_conversation(
    State(state): State<AppState>,
    Json(request): Json<ProvisionConversationRequest>,
) -> StatusCode {
    info!(
        number_count = request.proxy_number_sids.len(),
        participant_count = request.participants.len(),
        "Conversation provisioning request received"
    );

    tokio::spawn(workflow::provision(
        state.proxy_client.clone(),
        request.service_parameters,
        request.proxy_number_sids,
        request.participants.into_iter().map(Into::into).collect(),
    ));

    StatusCode::ACCEPTED
}

/// Delete every existing proxy service on the account.
///
/// Same trigger-and-forget contract as provisioning.
pub async fn delete_conversations(State(state): State<AppState>) -> StatusCode {
    info!("Teardown request received");

    tokio::spawn(workflow::teardown_all(state.proxy_client.clone()));

    StatusCode::ACCEPTED
}
