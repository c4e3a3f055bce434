//! Twilio Proxy HTTP client.

use crate::error::ProxyApiError;
use crate::types::*;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

/// Default Twilio Proxy API base URL.
pub const DEFAULT_BASE_URL: &str = "https://proxy.twilio.com/v1";

/// Twilio Proxy REST API client.
///
/// The auth token is stored using `SecretString` to prevent accidental
/// exposure in logs or debug output.
#[derive(Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: SecretString,
}

impl ProxyClient {
    /// Create a new Proxy client.
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProxyApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            account_sid: account_sid.into(),
            auth_token: SecretString::new(auth_token.into()),
        })
    }

    /// Get the configured account SID.
    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    /// Check whether the Proxy API is reachable with the configured
    /// credentials. There is no dedicated health resource, so this probes
    /// the service listing with the smallest page.
    pub async fn health_check(&self) -> bool {
        self.list_services(1).await.is_ok()
    }

    /// Create a proxy service.
    #[instrument(skip(self, params))]
    pub async fn create_service(
        &self,
        params: &ServiceParameters,
    ) -> Result<ProxyService, ProxyApiError> {
        let response = self
            .client
            .post(format!("{}/Services", self.base_url))
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&to_form_params(params))
            .send()
            .await?;

        let service: ProxyService = self.handle_response(response).await?;
        debug!(service_sid = %service.sid, "Proxy service created");
        Ok(service)
    }

    /// List proxy services, first page only.
    #[instrument(skip(self))]
    pub async fn list_services(&self, page_size: u32) -> Result<Vec<ProxyService>, ProxyApiError> {
        let response = self
            .client
            .get(format!("{}/Services", self.base_url))
            .query(&[("PageSize", page_size)])
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .send()
            .await?;

        let list: ServiceList = self.handle_response(response).await?;
        debug!(count = list.services.len(), "Listed proxy services");
        Ok(list.services)
    }

    /// Delete a proxy service and everything under it.
    #[instrument(skip(self))]
    pub async fn delete_service(&self, service_sid: &str) -> Result<(), ProxyApiError> {
        let response = self
            .client
            .delete(format!("{}/Services/{}", self.base_url, encode(service_sid)))
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.extract_error(response).await);
        }

        debug!(service_sid = %service_sid, "Proxy service deleted");
        Ok(())
    }

    /// Add a provider phone number to a service's masking pool.
    #[instrument(skip(self))]
    pub async fn add_phone_number(
        &self,
        service_sid: &str,
        number_sid: &str,
    ) -> Result<ProxyPhoneNumber, ProxyApiError> {
        let response = self
            .client
            .post(format!(
                "{}/Services/{}/PhoneNumbers",
                self.base_url,
                encode(service_sid)
            ))
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&[("Sid", number_sid)])
            .send()
            .await?;

        let number: ProxyPhoneNumber = self.handle_response(response).await?;
        debug!(number_sid = %number.sid, "Phone number added to pool");
        Ok(number)
    }

    /// List a service's pool phone numbers, first page only.
    #[instrument(skip(self))]
    pub async fn list_phone_numbers(
        &self,
        service_sid: &str,
        page_size: u32,
    ) -> Result<Vec<ProxyPhoneNumber>, ProxyApiError> {
        let response = self
            .client
            .get(format!(
                "{}/Services/{}/PhoneNumbers",
                self.base_url,
                encode(service_sid)
            ))
            .query(&[("PageSize", page_size)])
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .send()
            .await?;

        let list: PhoneNumberList = self.handle_response(response).await?;
        debug!(count = list.phone_numbers.len(), "Listed pool phone numbers");
        Ok(list.phone_numbers)
    }

    /// Create a conversation session under a service.
    #[instrument(skip(self))]
    pub async fn create_session(&self, service_sid: &str) -> Result<ProxySession, ProxyApiError> {
        let response = self
            .client
            .post(format!(
                "{}/Services/{}/Sessions",
                self.base_url,
                encode(service_sid)
            ))
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .send()
            .await?;

        let session: ProxySession = self.handle_response(response).await?;
        debug!(session_sid = %session.sid, "Session created");
        Ok(session)
    }

    /// List a service's sessions, first page only.
    #[instrument(skip(self))]
    pub async fn list_sessions(
        &self,
        service_sid: &str,
        page_size: u32,
    ) -> Result<Vec<ProxySession>, ProxyApiError> {
        let response = self
            .client
            .get(format!(
                "{}/Services/{}/Sessions",
                self.base_url,
                encode(service_sid)
            ))
            .query(&[("PageSize", page_size)])
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .send()
            .await?;

        let list: SessionList = self.handle_response(response).await?;
        debug!(count = list.sessions.len(), "Listed sessions");
        Ok(list.sessions)
    }

    /// Add a participant to a session.
    #[instrument(skip(self, params))]
    pub async fn add_participant(
        &self,
        service_sid: &str,
        session_sid: &str,
        params: &ParticipantParams,
    ) -> Result<SessionParticipant, ProxyApiError> {
        let mut form = vec![("Identifier", params.identifier.as_str())];
        if let Some(name) = &params.friendly_name {
            form.push(("FriendlyName", name.as_str()));
        }

        let response = self
            .client
            .post(format!(
                "{}/Services/{}/Sessions/{}/Participants",
                self.base_url,
                encode(service_sid),
                encode(session_sid)
            ))
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&form)
            .send()
            .await?;

        let participant: SessionParticipant = self.handle_response(response).await?;
        debug!(participant_sid = %participant.sid, "Participant added");
        Ok(participant)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ProxyApiError> {
        if !response.status().is_success() {
            return Err(self.extract_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn extract_error(&self, response: Response) -> ProxyApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "Proxy API request failed");

        match status {
            StatusCode::UNAUTHORIZED => ProxyApiError::Unauthorized,
            _ => ProxyApiError::Api {
                status: status.as_u16(),
                message: body,
            },
        }
    }
}
