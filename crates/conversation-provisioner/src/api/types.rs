//! API request and response types.

use serde::{Deserialize, Serialize};
use twilio_proxy_client::{ParticipantParams, ServiceParameters};

/// Request to provision a number-masked conversation.
///
/// Every field defaults when absent; the payload is forwarded to the
/// provider without validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionConversationRequest {
    /// Sids of provider phone numbers to place in the masking pool
    #[serde(default)]
    pub proxy_number_sids: Vec<String>,

    /// Participants to add to the conversation session
    #[serde(default)]
    pub participants: Vec<ParticipantRequest>,

    /// Opaque parameters for service creation (e.g. `uniqueName`)
    #[serde(default)]
    pub service_parameters: ServiceParameters,
}

/// A conversation participant.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRequest {
    /// Display label shown alongside the masked number
    #[serde(default)]
    pub friendly_name: Option<String>,

    /// Contact identifier, e.g. a phone number
    #[serde(default)]
    pub identifier: String,
}

impl From<ParticipantRequest> for ParticipantParams {
    fn from(request: ParticipantRequest) -> Self {
        ParticipantParams {
            identifier: request.identifier,
            friendly_name: request.friendly_name,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub proxy_api_healthy: bool,
}
