use vessel_core::ShipCategory;

use crate::helper::spawn_consumer;

#[tokio::test(flavor = "multi_thread")]
async fn test_vessel_updates_are_forwarded_with_normalized_identifiers() {
    let helper = spawn_consumer();

    helper
        .source
        .send_line(
            r#"{"type": "vessel_update", "data": {"mmsi": 111222333, "name": "EVER GIVEN", "latitude": 41.0, "longitude": 28.9, "speed": 12.0}}"#,
        )
        .await;

    let vessels = helper.recv_vessels(1).await;

    assert_eq!("111222333", vessels[0].mmsi.as_str());
    assert_eq!("EVER GIVEN", vessels[0].name);
    assert_eq!(12.0, vessels[0].speed);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_payloads_are_dropped_without_terminating_the_stream() {
    let helper = spawn_consumer();

    helper.source.send_line("{not valid json").await;
    helper
        .source
        .send_line(
            r#"{"type": "vessel_update", "data": {"mmsi": "1", "latitude": 1.0, "longitude": 2.0}}"#,
        )
        .await;

    let vessels = helper.recv_vessels(1).await;
    assert_eq!("1", vessels[0].mmsi.as_str());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unrecognized_message_types_are_ignored() {
    let helper = spawn_consumer();

    helper
        .source
        .send_line(r#"{"type": "heartbeat", "data": {}}"#)
        .await;
    helper
        .source
        .send_line(
            r#"{"type": "vessel_update", "data": {"mmsi": "2", "latitude": 1.0, "longitude": 2.0}}"#,
        )
        .await;

    let vessels = helper.recv_vessels(1).await;
    assert_eq!("2", vessels[0].mmsi.as_str());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_updates_without_a_position_are_dropped() {
    let helper = spawn_consumer();

    helper
        .source
        .send_line(r#"{"type": "vessel_update", "data": {"mmsi": "3", "latitude": 41.0}}"#)
        .await;
    helper
        .source
        .send_line(
            r#"{"type": "vessel_update", "data": {"mmsi": "4", "latitude": 1.0, "longitude": 2.0}}"#,
        )
        .await;

    let vessels = helper.recv_vessels(1).await;
    assert_eq!("4", vessels[0].mmsi.as_str());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ship_type_codes_are_normalized_on_ingest() {
    let helper = spawn_consumer();

    helper
        .source
        .send_line(
            r#"{"type": "vessel_update", "data": {"mmsi": "5", "latitude": 1.0, "longitude": 2.0, "ship_type": 82}}"#,
        )
        .await;

    let vessels = helper.recv_vessels(1).await;
    assert_eq!(ShipCategory::Tanker, vessels[0].ship_category);
    assert_eq!(Some("Tanker (82)".to_string()), vessels[0].ship_type);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_multiple_updates_accumulate_across_commits() {
    let helper = spawn_consumer();

    for mmsi in 1..=5 {
        helper
            .source
            .send_line(&format!(
                r#"{{"type": "vessel_update", "data": {{"mmsi": "{mmsi}", "latitude": 1.0, "longitude": 2.0}}}}"#,
            ))
            .await;
    }

    let vessels = helper.recv_vessels(5).await;
    assert_eq!(5, vessels.len());
}
