use chrono::NaiveDate;
use drr_table::core::RowGateway;
use drr_table::{
    DateLocale, FixedClock, HttpGateway, RecomputePolicy, RowModel, SaveError, Session,
};
use httpmock::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn scenario_model() -> RowModel {
    let mut model = RowModel::new(
        DateLocale::EnUs,
        RecomputePolicy::WholeTable,
        Arc::new(FixedClock::new(date(2024, 2, 1))),
    );
    let id = model.add_row();
    model.set_start_date(id, Some(date(2024, 1, 1))).unwrap();
    model.set_end_date(id, Some(date(2024, 1, 11))).unwrap();
    model.exclude_date(id, date(2024, 1, 5)).unwrap();
    model.set_lead_count(id, "45").unwrap();
    model
}

#[tokio::test]
async fn test_save_posts_json_array_with_column_keys() {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/your-api-endpoint")
            .header("content-type", "application/json")
            .body_contains("\"Expected DRR\":\"5.00\"")
            .body_contains("\"Number of Days\":9")
            .body_contains("\"Dates Excluded\":[\"1/5/2024\"]")
            .body_contains("\"StartDate\":\"2024-01-01\"")
            .body_contains("\"Month\":\"January 2024\"")
            .body_contains("\"Last Updated\":\"2/1/2024\"");
        then.status(200);
    });

    let gateway = HttpGateway::new(server.url("/your-api-endpoint"), None).unwrap();
    let session = Session::new(scenario_model(), gateway);

    let sent = session.save().await.unwrap();

    api_mock.assert();
    assert_eq!(sent, 1);
}

#[tokio::test]
async fn test_any_2xx_is_success() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/rows");
        then.status(201).json_body(serde_json::json!({"ok": true}));
    });

    let gateway = HttpGateway::new(server.url("/rows"), None).unwrap();
    let records = scenario_model().to_records();

    assert!(gateway.save(&records).await.is_ok());
    api_mock.assert();
}

#[tokio::test]
async fn test_non_success_status_is_save_error() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/rows");
        then.status(500).body("database down");
    });

    let gateway = HttpGateway::new(server.url("/rows"), None).unwrap();
    let session = Session::new(scenario_model(), gateway);

    let err = session.save().await.unwrap_err();

    api_mock.assert_hits(1);
    match err {
        SaveError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "database down");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let gateway = HttpGateway::new("http://127.0.0.1:1/rows", None).unwrap();
    let session = Session::new(scenario_model(), gateway);

    let err = session.save().await.unwrap_err();
    assert!(matches!(err, SaveError::Transport(_)));
}

#[tokio::test]
async fn test_configured_timeout_is_transport_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/slow");
        then.status(200).delay(Duration::from_secs(3));
    });

    let gateway = HttpGateway::new(server.url("/slow"), Some(Duration::from_millis(200))).unwrap();
    let err = gateway.save(&scenario_model().to_records()).await.unwrap_err();

    match err {
        SaveError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_table_posts_empty_array() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/rows").body("[]");
        then.status(204);
    });

    let model = RowModel::new(
        DateLocale::EnUs,
        RecomputePolicy::WholeTable,
        Arc::new(FixedClock::new(date(2024, 2, 1))),
    );
    let gateway = HttpGateway::new(server.url("/rows"), None).unwrap();
    let session = Session::new(model, gateway);

    assert_eq!(session.save().await.unwrap(), 0);
    api_mock.assert();
}
