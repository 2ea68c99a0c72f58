#![allow(clippy::unwrap_used, dead_code)]
// Fake Omada controller helpers shared by the integration tests.

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use omada_api::model::Site;
use omada_api::{ConnectionConfig, Credentials, OmadaClient, OmadaSiteClient};

pub const CONTROLLER_ID: &str = "c0ffee01";
pub const SITE_ID: &str = "site-default";
pub const TOKEN: &str = "csrf-token-1";

/// Successful `{errorCode, msg, result}` envelope.
pub fn ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "errorCode": 0,
        "msg": "Success.",
        "result": result,
    }))
}

/// Application error envelope with the given HTTP status.
pub fn app_error(status: u16, code: i64, msg: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "errorCode": code,
        "msg": msg,
    }))
}

pub fn api_path(suffix: &str) -> String {
    format!("/{CONTROLLER_ID}/api/v2/{suffix}")
}

pub fn site_path(suffix: &str) -> String {
    format!("/{CONTROLLER_ID}/api/v2/sites/{SITE_ID}/{suffix}")
}

pub fn config(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig::new(
        server.uri(),
        Credentials::new("admin", "secret".to_owned()),
    )
}

/// Mount `/api/info` reporting `version` plus a working login.
pub async fn mount_controller(server: &MockServer, version: &str) {
    Mock::given(method("GET"))
        .and(path("/api/info"))
        .respond_with(ok(json!({
            "controllerVer": version,
            "apiVer": "3",
            "configured": true,
            "omadacId": CONTROLLER_ID,
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .respond_with(ok(json!({"roleType": 0, "token": TOKEN})))
        .mount(server)
        .await;
}

pub async fn setup(version: &str) -> (MockServer, OmadaClient) {
    let server = MockServer::start().await;
    mount_controller(&server, version).await;
    let client = OmadaClient::new(config(&server)).unwrap();
    (server, client)
}

pub async fn setup_site() -> (MockServer, OmadaSiteClient) {
    let (server, client) = setup("5.15.8").await;
    let site = Site {
        name: "Default".into(),
        id: SITE_ID.into(),
    };
    let site_client = client.get_site_client(&site).await.unwrap();
    (server, site_client)
}

/// Requests received so far, excluding the login handshake.
pub async fn non_login_requests(server: &MockServer) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() != "/api/info" && r.url.path() != api_path("login"))
        .collect()
}
