//! Test utilities for integration tests
use std::time::Duration;

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;

use appointy::core::{AppConfig, BusinessScope, Context};
use appointy::scheduling::AppointyClient;

pub const BUSINESS_ID: &str = "g1/c1/l1";

/// Config pointing at a mock server with the test business scope and
/// every action granted.
pub fn test_config(server_url: &str) -> AppConfig {
    let ctx = Context::new(server_url, "test_token")
        .with_business(BusinessScope::parse(BUSINESS_ID).expect("Invalid business id"));
    let mut config = AppConfig::new(ctx);
    config.consumer_id = String::from("consumer-1");
    config.booking_link = Some(String::from("https://book.example.com/acme"));
    config.request_timeout = Duration::from_secs(5);
    config
}

pub fn test_client(server_url: &str) -> AppointyClient {
    AppointyClient::new(&test_config(server_url)).expect("Failed to build client")
}

/// Mocks the two GraphQL calls that populate the employee roster with
/// Ada Lovelace (101) and Grace Hopper (103). Each mock expects to be
/// hit `hits` times.
pub async fn mock_roster(server: &mut ServerGuard, hits: usize) -> (Mock, Mock) {
    // base64({"101":true,"102":false,"103":true})
    let availability = server
        .mock("POST", "/graphql")
        .match_header("authorization", "Bearer test_token")
        .match_body(Matcher::PartialJson(json!({
            "id": "ImprovedAvailableServicesOrEmployeesQuery",
            "variables": {"filter": {"parent": BUSINESS_ID, "listEmployees": true}}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": {"improvedAvailableServicesOrEmployees": {"employeeIds": "eyIxMDEiOnRydWUsIjEwMiI6ZmFsc2UsIjEwMyI6dHJ1ZX0="}}}"#)
        .expect(hits)
        .create_async()
        .await;
    let nodes = server
        .mock("POST", "/graphql")
        .match_body(Matcher::PartialJson(json!({
            "id": "EmployeeNodesQuery",
            "variables": {"groupId": "g1"}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data": {"nodes": [
                {"__typename": "Employee", "id": "101", "staffProfile": {"firstName": "Ada", "lastName": "Lovelace"}},
                {"__typename": "Employee", "id": "102", "staffProfile": {"firstName": "Alan", "lastName": "Turing"}},
                {"__typename": "Employee", "id": "103", "staffProfile": {"firstName": "Grace", "lastName": "Hopper"}}
            ]}}"#,
        )
        .expect(hits)
        .create_async()
        .await;
    (availability, nodes)
}
