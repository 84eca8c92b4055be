use std::time::Duration;

use medview_core::{EndpointConfig, ErrorKind, IdPolicy, OrdsClient, PatientId, RecordSource};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROFILE_PATH: &str = "/ords/medical_sys_api/basic_sec_api/basic_sec_view_r_profile_patient";

fn config_for(server: &MockServer) -> EndpointConfig {
    EndpointConfig::new(&format!("{}/ords/medical_sys_api", server.uri())).unwrap()
}

fn id(raw: &str) -> PatientId {
    PatientId::parse(raw, IdPolicy::Strict).unwrap()
}

#[tokio::test]
async fn fetch_returns_parsed_body() {
    let server = MockServer::start().await;
    let body = json!({"items": [{"full_name": "Alice", "patientid": 1}]});
    Mock::given(method("GET"))
        .and(path(format!("{PROFILE_PATH}/1")))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = OrdsClient::new(config_for(&server)).unwrap();
    let fetched = client.fetch(&id("1")).await.unwrap();

    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.body, body);
}

#[tokio::test]
async fn not_found_is_http_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PROFILE_PATH}/404")))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such patient"))
        .mount(&server)
        .await;

    let client = OrdsClient::new(config_for(&server)).unwrap();
    let err = client.fetch(&id("404")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn server_error_carries_status_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = OrdsClient::new(config_for(&server)).unwrap();
    let err = client.fetch(&id("1")).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.status_line(), "Error! Status: 503");
}

#[tokio::test]
async fn malformed_body_is_json_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ORDS login</html>"))
        .mount(&server)
        .await;

    let client = OrdsClient::new(config_for(&server)).unwrap();
    let err = client.fetch(&id("1")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::JsonDecode);
}

#[tokio::test]
async fn slow_server_is_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"items": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server)
        .with_timeout(Duration::from_millis(200))
        .unwrap();
    let client = OrdsClient::new(config).unwrap();
    let err = client.fetch(&id("1")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[tokio::test]
async fn refused_connection_is_connection_error() {
    // Grab a free port, then close it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = EndpointConfig::new(&format!("http://127.0.0.1:{port}/ords/medical_sys_api"))
        .unwrap()
        .with_timeout(Duration::from_secs(5))
        .unwrap();

    let client = OrdsClient::new(config).unwrap();
    let err = client.fetch(&id("1")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(err.user_message().contains(&format!("127.0.0.1:{port}")));
}

#[tokio::test]
async fn failure_kinds_are_distinct() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PROFILE_PATH}/slow")))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{PROFILE_PATH}/missing")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = config_for(&server)
        .with_timeout(Duration::from_millis(200))
        .unwrap();
    let client = OrdsClient::new(config).unwrap();

    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let refused = OrdsClient::new(
        EndpointConfig::new(&format!("http://127.0.0.1:{port}/ords/medical_sys_api")).unwrap(),
    )
    .unwrap();

    let timeout = client.fetch(&id("slow")).await.unwrap_err().kind();
    let missing = client.fetch(&id("missing")).await.unwrap_err().kind();
    let connection = refused.fetch(&id("1")).await.unwrap_err().kind();

    assert_eq!(timeout, ErrorKind::Timeout);
    assert_eq!(missing, ErrorKind::HttpStatus);
    assert_eq!(connection, ErrorKind::Connection);
}

#[tokio::test]
async fn basic_auth_credentials_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Basic YWxpY2U6c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server)
        .with_credentials(Some(medview_core::Credentials::new("alice", "secret")));
    let client = OrdsClient::new(config).unwrap();

    let fetched = client.fetch(&id("7")).await.unwrap();
    assert_eq!(fetched.body, json!({"items": []}));
}

#[tokio::test]
async fn free_function_fetch_uses_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PROFILE_PATH}/A1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"email": "a@b.com"}])))
        .mount(&server)
        .await;

    let body = medview_core::fetch(&id("A1"), &config_for(&server)).await.unwrap();
    assert_eq!(body, json!([{"email": "a@b.com"}]));
}
