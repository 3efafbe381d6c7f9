//! Tests for `RemoteClient` against a local `wiremock` server, one per endpoint outcome.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use picontrol_logic::{Coordinate, Coordinator, Credentials, ServoCommand, SyncError};
use picontrol_transport::RemoteClient;

async fn serve(verb: &str, route: &str, response: ResponseTemplate) -> (MockServer, RemoteClient) {
    let server = MockServer::start().await;
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    let client = RemoteClient::new(&server.uri()).expect("failed to build client");
    (server, client)
}

// ---------------------------------------------------------------------------
// /update_hotspot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn publish_hotspot_sends_position() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/update_hotspot"))
        .and(body_json(json!({"latitude": 41.0082, "longitude": 28.9784})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;
    let client = RemoteClient::new(&server.uri()).expect("failed to build client");

    let res = client
        .publish_hotspot(Coordinate::new(41.0082, 28.9784))
        .await;

    assert_eq!(res, Ok(()));
}

#[tokio::test]
async fn publish_hotspot_accepts_localized_success() {
    let (_server, client) = serve(
        "POST",
        "/update_hotspot",
        ResponseTemplate::new(200).set_body_json(json!({"status": "başarılı"})),
    )
    .await;

    assert_eq!(client.publish_hotspot(Coordinate::new(1.0, 2.0)).await, Ok(()));
}

#[tokio::test]
async fn publish_hotspot_surfaces_server_error() {
    let (_server, client) = serve(
        "POST",
        "/update_hotspot",
        ResponseTemplate::new(200)
            .set_body_json(json!({"status": "error", "error": "hotspot locked"})),
    )
    .await;

    let res = client.publish_hotspot(Coordinate::new(1.0, 2.0)).await;

    assert_eq!(
        res,
        Err(SyncError::RemoteRejected("hotspot locked".to_string()))
    );
}

// ---------------------------------------------------------------------------
// /hotspot_info
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hotspot_info_returns_position() {
    let (_server, client) = serve(
        "GET",
        "/hotspot_info",
        ResponseTemplate::new(200).set_body_json(json!({"latitude": 48.8566, "longitude": 2.3522})),
    )
    .await;

    assert_eq!(
        client.hotspot_info().await,
        Ok(Coordinate::new(48.8566, 2.3522))
    );
}

#[tokio::test]
async fn hotspot_info_error_field_is_rejection() {
    let (_server, client) = serve(
        "GET",
        "/hotspot_info",
        ResponseTemplate::new(404).set_body_json(json!({"error": "no hotspot registered"})),
    )
    .await;

    assert_eq!(
        client.hotspot_info().await,
        Err(SyncError::RemoteRejected(
            "no hotspot registered".to_string()
        ))
    );
}

#[tokio::test]
async fn hotspot_info_missing_fields_is_malformed() {
    let (_server, client) = serve(
        "GET",
        "/hotspot_info",
        ResponseTemplate::new(200).set_body_json(json!({"latitude": 48.8566})),
    )
    .await;

    let res = client.hotspot_info().await;
    assert!(
        matches!(res, Err(SyncError::MalformedResponse(_))),
        "got {res:?}"
    );
}

#[tokio::test]
async fn hotspot_info_out_of_range_is_malformed() {
    let (_server, client) = serve(
        "GET",
        "/hotspot_info",
        ResponseTemplate::new(200).set_body_json(json!({"latitude": 123.0, "longitude": 2.0})),
    )
    .await;

    let res = client.hotspot_info().await;
    assert!(
        matches!(res, Err(SyncError::MalformedResponse(_))),
        "got {res:?}"
    );
}

#[tokio::test]
async fn hotspot_info_non_json_is_malformed() {
    let (_server, client) = serve(
        "GET",
        "/hotspot_info",
        ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"),
    )
    .await;

    let res = client.hotspot_info().await;
    assert!(
        matches!(res, Err(SyncError::MalformedResponse(_))),
        "got {res:?}"
    );
}

// ---------------------------------------------------------------------------
// /detection_status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn detection_status_reads_flag() {
    let (_server, client) = serve(
        "GET",
        "/detection_status",
        ResponseTemplate::new(200).set_body_json(json!({"detected": true})),
    )
    .await;

    assert_eq!(client.detection_status().await, Ok(true));
}

#[tokio::test]
async fn detection_status_accepts_legacy_field() {
    let (_server, client) = serve(
        "GET",
        "/detection_status",
        ResponseTemplate::new(200).set_body_json(json!({"hayalet_detected": false})),
    )
    .await;

    assert_eq!(client.detection_status().await, Ok(false));
}

#[tokio::test]
async fn detection_status_server_error_is_rejection() {
    let (_server, client) = serve(
        "GET",
        "/detection_status",
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let res = client.detection_status().await;
    assert!(
        matches!(res, Err(SyncError::RemoteRejected(_))),
        "got {res:?}"
    );
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    // Grab a free port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().expect("no local addr").port();
    drop(listener);
    let client = RemoteClient::new(&format!("http://127.0.0.1:{port}")).expect("failed to build client");

    let res = client.detection_status().await;
    assert!(
        matches!(res, Err(SyncError::NetworkUnreachable(_))),
        "got {res:?}"
    );
}

// ---------------------------------------------------------------------------
// collaborators
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_returns_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "ada", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Welcome ada"})))
        .mount(&server)
        .await;
    let client = RemoteClient::new(&server.uri()).expect("failed to build client");
    let creds = Credentials::for_login("ada", "hunter22").expect("valid form");

    assert_eq!(client.login(&creds).await, Ok("Welcome ada".to_string()));
}

#[tokio::test]
async fn login_failure_uses_server_error() {
    let (_server, client) = serve(
        "POST",
        "/login",
        ResponseTemplate::new(401).set_body_json(json!({"error": "Wrong password"})),
    )
    .await;
    let creds = Credentials::for_login("ada", "nope").expect("valid form");

    assert_eq!(
        client.login(&creds).await,
        Err(SyncError::RemoteRejected("Wrong password".to_string()))
    );
}

#[tokio::test]
async fn register_maps_status_codes() {
    let creds = Credentials::for_registration("ada", "secret1", "secret1").expect("valid form");

    let (_server, client) = serve("POST", "/register", ResponseTemplate::new(201)).await;
    assert_eq!(client.register(&creds).await, Ok(()));

    let (_server, client) = serve("POST", "/register", ResponseTemplate::new(400)).await;
    assert_eq!(
        client.register(&creds).await,
        Err(SyncError::RemoteRejected(
            "Username or password already taken.".to_string()
        ))
    );

    let (_server, client) = serve("POST", "/register", ResponseTemplate::new(409)).await;
    assert_eq!(
        client.register(&creds).await,
        Err(SyncError::RemoteRejected(
            "An unknown error occurred.".to_string()
        ))
    );
}

#[tokio::test]
async fn set_servo_sends_command() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/set_servo"))
        .and(body_json(json!({"servo": 2, "angle": 45})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;
    let client = RemoteClient::new(&server.uri()).expect("failed to build client");
    let command = ServoCommand::parse(2, "45").expect("valid angle");

    assert_eq!(client.set_servo(&command).await, Ok(()));
}

#[tokio::test]
async fn set_servo_failure_uses_server_error() {
    let (_server, client) = serve(
        "POST",
        "/set_servo",
        ResponseTemplate::new(200).set_body_json(json!({"status": "error", "error": "servo jammed"})),
    )
    .await;
    let command = ServoCommand::parse(1, "90").expect("valid angle");

    assert_eq!(
        client.set_servo(&command).await,
        Err(SyncError::RemoteRejected("servo jammed".to_string()))
    );
}
