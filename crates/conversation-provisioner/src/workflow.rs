//! Provisioning and teardown workflows against the Twilio Proxy API.
//!
//! Both workflows run as detached tasks behind an already-acknowledged HTTP
//! request: failures are logged, never retried, and never rolled back. Steps
//! that completed before a failure stay completed.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info, warn};
use twilio_proxy_client::{ParticipantParams, ProxyClient, ServiceParameters};

/// Page bound for service listings. Only the first page is consulted, so a
/// teardown leaves services beyond this bound in place until the next run.
pub const LIST_PAGE_SIZE: u32 = 20;

/// Provision a number-masked conversation.
///
/// Creates a proxy service, then concurrently builds its phone number pool
/// and runs the session chain (create session, add participants). A failed
/// service creation aborts the whole workflow; a failed session creation
/// skips the participants while the number pool proceeds; a failure inside a
/// fan-out leaves its sibling branches untouched.
pub async fn provision(
    client: Arc<ProxyClient>,
    service_parameters: ServiceParameters,
    number_sids: Vec<String>,
    participants: Vec<ParticipantParams>,
) {
    info!("Creating proxy service");
    let service = match client.create_service(&service_parameters).await {
        Ok(service) => service,
        Err(e) => {
            error!(error = %e, "Proxy service creation failed, aborting workflow");
            return;
        }
    };
    info!(service_sid = %service.sid, "Proxy service created");

    tokio::join!(
        build_number_pool(&client, &service.sid, &number_sids),
        run_session(&client, &service.sid, &participants),
    );
}

/// Attach each phone number to the service's masking pool. Unordered
/// fan-out; an empty list is a no-op.
async fn build_number_pool(client: &ProxyClient, service_sid: &str, number_sids: &[String]) {
    info!(
        service_sid = %service_sid,
        count = number_sids.len(),
        "Building proxy number pool"
    );

    join_all(number_sids.iter().map(|number_sid| async move {
        match client.add_phone_number(service_sid, number_sid).await {
            Ok(number) => info!(number_sid = %number.sid, "Number added to pool"),
            Err(e) => {
                warn!(number_sid = %number_sid, error = %e, "Failed to add number to pool")
            }
        }
    }))
    .await;
}

/// Create the conversation session, then add its participants (unordered
/// fan-out; an empty list is a no-op).
async fn run_session(client: &ProxyClient, service_sid: &str, participants: &[ParticipantParams]) {
    info!(service_sid = %service_sid, "Creating conversation session");
    let session = match client.create_session(service_sid).await {
        Ok(session) => session,
        Err(e) => {
            error!(
                service_sid = %service_sid,
                error = %e,
                "Session creation failed, skipping participants"
            );
            return;
        }
    };
    info!(session_sid = %session.sid, "Conversation session created");

    let session_sid = session.sid.as_str();
    join_all(participants.iter().map(|participant| async move {
        match client
            .add_participant(service_sid, session_sid, participant)
            .await
        {
            Ok(_) => info!(
                session_sid = %session_sid,
                identifier = %participant.identifier,
                "Participant added to session"
            ),
            Err(e) => warn!(
                identifier = %participant.identifier,
                error = %e,
                "Failed to add participant"
            ),
        }
    }))
    .await;
}

/// Delete every proxy service on the account. Unordered fan-out over the
/// first listing page; no verification of completion.
pub async fn teardown_all(client: Arc<ProxyClient>) {
    let services = match client.list_services(LIST_PAGE_SIZE).await {
        Ok(services) => services,
        Err(e) => {
            error!(error = %e, "Failed to list proxy services");
            return;
        }
    };

    if services.is_empty() {
        info!("No proxy services found");
        return;
    }

    info!(count = services.len(), "Deleting proxy services");

    let client = &*client;
    join_all(services.iter().map(|service| async move {
        match client.delete_service(&service.sid).await {
            Ok(()) => info!(service_sid = %service.sid, "Proxy service deleted"),
            Err(e) => {
                warn!(service_sid = %service.sid, error = %e, "Failed to delete proxy service")
            }
        }
    }))
    .await;
}
