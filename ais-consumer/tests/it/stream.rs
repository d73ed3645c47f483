use std::str::FromStr;

use ais_consumer::error::Error;
use ais_consumer::stream::AisStreamClient;
use reqwest::Url;
use vessel_core::ConnectionState;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_connect_is_guarded_against_double_connect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut client = AisStreamClient::new(
        "test-key".to_string(),
        Url::from_str(&server.uri()).unwrap(),
    );

    let _stream = client.connect().await.unwrap();
    assert_eq!(ConnectionState::Connected, client.state());

    // A second connect while the first is open must be rejected, not opened
    // concurrently.
    let err = client.connect().await.err().expect("second connect must fail");
    match err {
        Error::AlreadyConnected { .. } => {}
        other => panic!("expected AlreadyConnected, got {other:?}"),
    }

    client.reset();
    assert_eq!(ConnectionState::Disconnected, client.state());
    assert!(client.connect().await.is_ok());
}

#[tokio::test]
async fn test_failed_subscription_reports_the_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let mut client = AisStreamClient::new(
        "bad-key".to_string(),
        Url::from_str(&server.uri()).unwrap(),
    );

    let err = client.connect().await.err().expect("subscription must fail");
    match err {
        Error::FailedRequest { status, body, .. } => {
            assert_eq!(401, status.as_u16());
            assert_eq!("invalid api key", body);
        }
        other => panic!("expected FailedRequest, got {other:?}"),
    }
    assert_eq!(ConnectionState::Error, client.state());
}
