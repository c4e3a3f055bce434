//! Workflow tests against a mocked Proxy API.
//!
//! These exercise the causal ordering of the provisioning steps, the
//! fan-out behavior of the number pool / participant / teardown branches,
//! and failure propagation between steps.

use conversation_provisioner::workflow;
use std::sync::Arc;
use twilio_proxy_client::{ParticipantParams, ProxyClient, ServiceParameters};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERVICE_SID: &str = "KS69afbbb6ed74e6b2dd82a8ab1e3c1a7b";
const SESSION_SID: &str = "KC48dd7ac14b4d18f1e963af0cf1934c5e";

fn test_client(mock_server: &MockServer) -> Arc<ProxyClient> {
    Arc::new(ProxyClient::new("ACtest", "test-token", mock_server.uri()).unwrap())
}

fn service_parameters(unique_name: &str) -> ServiceParameters {
    let mut params = ServiceParameters::new();
    params.insert("uniqueName".into(), unique_name.into());
    params
}

fn participant(friendly_name: &str, identifier: &str) -> ParticipantParams {
    ParticipantParams {
        identifier: identifier.into(),
        friendly_name: Some(friendly_name.into()),
    }
}

fn service_body() -> serde_json::Value {
    serde_json::json!({ "sid": SERVICE_SID, "unique_name": "MyNumberProxyService" })
}

fn session_body() -> serde_json::Value {
    serde_json::json!({ "sid": SESSION_SID, "status": "open" })
}

async fn mount_create_service(mock_server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/Services"))
        .respond_with(ResponseTemplate::new(201).set_body_json(service_body()))
        .expect(expected)
        .mount(mock_server)
        .await;
}

async fn mount_add_phone_number(mock_server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/Services/{SERVICE_SID}/PhoneNumbers")))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "sid": "PNcdd02a48f1e963af0cf1934c5e376e58"
        })))
        .expect(expected)
        .mount(mock_server)
        .await;
}

async fn mount_create_session(mock_server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/Services/{SERVICE_SID}/Sessions")))
        .respond_with(ResponseTemplate::new(201).set_body_json(session_body()))
        .expect(expected)
        .mount(mock_server)
        .await;
}

async fn mount_add_participant(mock_server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path(format!(
            "/Services/{SERVICE_SID}/Sessions/{SESSION_SID}/Participants"
        )))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "sid": "KP2f61a3c09d874e1b8a5efc40d3b172a9",
            "identifier": "+447400011223"
        })))
        .expect(expected)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_provision_example_scenario() {
    let mock_server = MockServer::start().await;
    mount_create_service(&mock_server, 1).await;
    mount_add_phone_number(&mock_server, 2).await;
    mount_create_session(&mock_server, 1).await;
    mount_add_participant(&mock_server, 1).await;

    workflow::provision(
        test_client(&mock_server),
        service_parameters("X"),
        vec!["PN1".into(), "PN2".into()],
        vec![participant("A", "+447400011223")],
    )
    .await;

    // Causal ordering: service before session, session before participants.
    // The number pool branch runs concurrently with the session chain, so
    // only its dependency on the service is asserted.
    let requests = mock_server.received_requests().await.unwrap();
    let position_of = |p: String| requests.iter().position(|r| r.url.path() == p).unwrap();

    let create_service = position_of("/Services".to_string());
    let create_session = position_of(format!("/Services/{SERVICE_SID}/Sessions"));
    assert!(create_service < create_session);

    for (i, request) in requests.iter().enumerate() {
        let p = request.url.path();
        if p.ends_with("/PhoneNumbers") {
            assert!(create_service < i);
        }
        if p.ends_with("/Participants") {
            assert!(create_session < i);
        }
    }
}

#[tokio::test]
async fn test_provision_empty_number_pool_issues_no_attach_calls() {
    let mock_server = MockServer::start().await;
    mount_create_service(&mock_server, 1).await;
    mount_add_phone_number(&mock_server, 0).await;
    mount_create_session(&mock_server, 1).await;
    mount_add_participant(&mock_server, 1).await;

    workflow::provision(
        test_client(&mock_server),
        service_parameters("X"),
        vec![],
        vec![participant("A", "+447400011223")],
    )
    .await;
}

#[tokio::test]
async fn test_provision_empty_participants_issues_no_participant_calls() {
    let mock_server = MockServer::start().await;
    mount_create_service(&mock_server, 1).await;
    mount_add_phone_number(&mock_server, 1).await;
    mount_create_session(&mock_server, 1).await;
    mount_add_participant(&mock_server, 0).await;

    workflow::provision(
        test_client(&mock_server),
        service_parameters("X"),
        vec!["PN1".into()],
        vec![],
    )
    .await;
}

#[tokio::test]
async fn test_provision_aborts_when_service_creation_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Services"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    workflow::provision(
        test_client(&mock_server),
        service_parameters("X"),
        vec!["PN1".into(), "PN2".into()],
        vec![participant("A", "+447400011223")],
    )
    .await;

    // Nothing downstream of the failed creation
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_provision_session_failure_skips_participants_not_numbers() {
    let mock_server = MockServer::start().await;
    mount_create_service(&mock_server, 1).await;
    mount_add_phone_number(&mock_server, 2).await;
    mount_add_participant(&mock_server, 0).await;

    Mock::given(method("POST"))
        .and(path(format!("/Services/{SERVICE_SID}/Sessions")))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    workflow::provision(
        test_client(&mock_server),
        service_parameters("X"),
        vec!["PN1".into(), "PN2".into()],
        vec![participant("A", "+447400011223")],
    )
    .await;
}

#[tokio::test]
async fn test_teardown_deletes_each_listed_service() {
    let mock_server = MockServer::start().await;

    let sids = [
        "KS11111111111111111111111111111111",
        "KS22222222222222222222222222222222",
        "KS33333333333333333333333333333333",
    ];

    let services: Vec<serde_json::Value> = sids
        .iter()
        .map(|sid| serde_json::json!({ "sid": sid }))
        .collect();

    Mock::given(method("GET"))
        .and(path("/Services"))
        .and(query_param("PageSize", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "services": services,
            "meta": { "page": 0, "page_size": 20 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    for sid in sids {
        Mock::given(method("DELETE"))
            .and(path(format!("/Services/{sid}")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    workflow::teardown_all(test_client(&mock_server)).await;
}

#[tokio::test]
async fn test_teardown_with_no_services_issues_no_deletes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "services": [],
            "meta": { "page": 0, "page_size": 20 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    workflow::teardown_all(test_client(&mock_server)).await;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_teardown_continues_past_failed_deletes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "services": [
                { "sid": "KS11111111111111111111111111111111" },
                { "sid": "KS22222222222222222222222222222222" }
            ],
            "meta": { "page": 0, "page_size": 20 }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/Services/KS11111111111111111111111111111111"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/Services/KS22222222222222222222222222222222"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    workflow::teardown_all(test_client(&mock_server)).await;
}
