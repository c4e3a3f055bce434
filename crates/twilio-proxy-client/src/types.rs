//! Twilio Proxy API types.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Opaque service-creation parameters, keyed camelCase as received from the
/// caller (e.g. `uniqueName`). Converted to the API's PascalCase form fields
/// on the wire.
pub type ServiceParameters = serde_json::Map<String, Value>;

/// A proxy service: groups a phone number pool and conversation sessions.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyService {
    pub sid: String,
    pub unique_name: Option<String>,
    pub date_created: Option<DateTime<Utc>>,
}

/// A phone number attached to a service's masking pool.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyPhoneNumber {
    pub sid: String,
    pub phone_number: Option<String>,
}

/// A conversation session under a service.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxySession {
    pub sid: String,
    pub status: Option<String>,
    pub date_created: Option<DateTime<Utc>>,
}

/// A participant added to a session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionParticipant {
    pub sid: String,
    pub identifier: Option<String>,
    pub friendly_name: Option<String>,
}

/// Parameters for adding a participant to a session. Submitted as-is; the
/// API is the validator.
#[derive(Debug, Clone)]
pub struct ParticipantParams {
    pub identifier: String,
    pub friendly_name: Option<String>,
}

/// List envelope for `GET /Services`.
#[derive(Debug, Deserialize)]
pub(crate) struct ServiceList {
    pub services: Vec<ProxyService>,
}

/// List envelope for `GET /Services/{sid}/PhoneNumbers`.
#[derive(Debug, Deserialize)]
pub(crate) struct PhoneNumberList {
    pub phone_numbers: Vec<ProxyPhoneNumber>,
}

/// List envelope for `GET /Services/{sid}/Sessions`.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionList {
    pub sessions: Vec<ProxySession>,
}

/// Convert opaque camelCase parameters into the PascalCase form fields the
/// Proxy API expects (`uniqueName` -> `UniqueName`). Non-string values are
/// rendered as their JSON representation.
pub(crate) fn to_form_params(params: &ServiceParameters) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (pascal_case(key), value)
        })
        .collect()
}

fn pascal_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("uniqueName"), "UniqueName");
        assert_eq!(pascal_case("callbackUrl"), "CallbackUrl");
        assert_eq!(pascal_case("sid"), "Sid");
        assert_eq!(pascal_case(""), "");
    }

    #[test]
    fn test_to_form_params() {
        let mut params = ServiceParameters::new();
        params.insert("uniqueName".into(), "MyNumberProxyService".into());
        params.insert("geoMatchLevel".into(), "country".into());
        params.insert("defaultTtl".into(), 3600.into());

        let mut form = to_form_params(&params);
        form.sort();

        assert_eq!(
            form,
            vec![
                ("DefaultTtl".to_string(), "3600".to_string()),
                ("GeoMatchLevel".to_string(), "country".to_string()),
                ("UniqueName".to_string(), "MyNumberProxyService".to_string()),
            ]
        );
    }
}
