use std::str::FromStr;
use std::time::Duration;

use ais_consumer::consumer::Consumer;
use ais_consumer::error::Error;
use ais_consumer::subscription::SubscriptionClient;
use reqwest::Url;
use vessel_core::{ReconnectPolicy, StreamEvent};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_bounded_reconnect_gives_up_with_a_terminal_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut client = SubscriptionClient::with_policy(
        Url::from_str(&server.uri()).unwrap(),
        ReconnectPolicy::bounded(Duration::ZERO, 3),
    );

    let consumer = Consumer::new(Duration::from_millis(5));
    let (sender, _receiver) = async_channel::bounded::<StreamEvent>(10);

    match client.run(&consumer, sender).await {
        Err(Error::ReconnectExhausted { attempts, .. }) => assert_eq!(3, attempts),
        other => panic!("expected ReconnectExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_subscription_channel_forwards_updates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "{\"type\": \"vessel_update\", \"data\": {\"mmsi\": \"42\", \"latitude\": 1.0, \"longitude\": 2.0}}\n",
        ))
        .mount(&server)
        .await;

    let mut client = SubscriptionClient::with_policy(
        Url::from_str(&server.uri()).unwrap(),
        ReconnectPolicy::bounded(Duration::ZERO, 1),
    );

    let consumer = Consumer::new(Duration::from_millis(5));
    let (sender, receiver) = async_channel::bounded::<StreamEvent>(10);

    tokio::spawn(async move {
        let _ = client.run(&consumer, sender).await;
    });

    loop {
        match receiver.recv().await.unwrap() {
            StreamEvent::Connected => {}
            StreamEvent::Batch(batch) => {
                assert_eq!("42", batch.vessels[0].mmsi.as_str());
                break;
            }
        }
    }
}
