/// Integration tests for plan submission against a mock webhook
use chrono::{DateTime, FixedOffset, TimeZone};
use payplan::config::{PricingSettings, WebhookSettings};
use payplan::submission::submit_plan;
use payplan::{AppError, Configuration, PlanSession, SubmissionPayload, Submitter};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn now() -> DateTime<FixedOffset> {
    FixedOffset::west_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 1, 15, 10, 0, 0)
        .unwrap()
}

fn session(query: &str) -> PlanSession {
    PlanSession::new(Configuration::from_query(query, &PricingSettings::default()))
}

fn webhook_settings(server: &MockServer) -> WebhookSettings {
    WebhookSettings {
        enabled: true,
        url: format!("{}/hook", server.uri()),
        timeout_seconds: 5,
    }
}

#[tokio::test]
async fn test_successful_submission_closes_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "name": "Jane Doe",
            "totalPrice": 8500,
            "deposit": 850,
            "monthlyPayment": 1275.0,
            "months": 6,
            "isSlidingScale": false,
            "isExtended": false,
            "depositPercent": 0.1,
            "customDeposit": null,
            "payoffDate": "2025-07-15T18:00:00.000Z",
            "timestamp": "2025-01-15T18:00:00.000Z"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let submitter = Submitter::new(webhook_settings(&server)).unwrap();
    let mut session = session("");

    let payload = submit_plan(&mut session, &submitter, " Jane Doe ", &now())
        .await
        .unwrap();

    assert_eq!(payload.name, "Jane Doe");
    assert!(session.is_submitted());
    assert!(!submitter.is_in_flight());
    assert!(matches!(session.set_months(3), Err(AppError::SessionClosed)));

    // a closed session cannot be sent twice
    let again = submit_plan(&mut session, &submitter, "Jane Doe", &now()).await;
    assert!(matches!(again, Err(AppError::SessionClosed)));
}

#[tokio::test]
async fn test_server_error_keeps_session_editable_and_allows_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let submitter = Submitter::new(webhook_settings(&server)).unwrap();
    let mut session = session("");

    let result = submit_plan(&mut session, &submitter, "Jane", &now()).await;
    match result {
        Err(AppError::UpstreamError { status, message }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, "boom");
        }
        other => panic!("Expected UpstreamError, got {:?}", other),
    }
    assert!(!session.is_submitted());
    assert!(!submitter.is_in_flight());
    session.set_months(5).unwrap();

    // user re-initiates, any 2xx counts as success
    submit_plan(&mut session, &submitter, "Jane", &now())
        .await
        .unwrap();
    assert!(session.is_submitted());
}

#[tokio::test]
async fn test_warnings_block_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let submitter = Submitter::new(webhook_settings(&server)).unwrap();
    let mut session = session("slidingScale=true");
    session.set_months(9).unwrap();
    session.set_custom_deposit_input("100").unwrap();

    let result = submit_plan(&mut session, &submitter, "Jane", &now()).await;
    match result {
        Err(AppError::ValidationFailed(warnings)) => {
            assert!(warnings.contains(&payplan::Warning::DepositBelowMin));
        }
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
    assert!(!session.is_submitted());
}

#[tokio::test]
async fn test_blank_name_is_rejected_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let submitter = Submitter::new(webhook_settings(&server)).unwrap();
    let mut session = session("");

    let result = submit_plan(&mut session, &submitter, "   ", &now()).await;
    assert!(matches!(result, Err(AppError::EmptyName)));
    assert!(!session.is_submitted());
}

#[tokio::test]
async fn test_slow_webhook_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let submitter = Submitter::with_client(client, webhook_settings(&server));
    let mut session = session("");

    let result = submit_plan(&mut session, &submitter, "Jane", &now()).await;
    match result {
        Err(AppError::HttpRequest(e)) => assert!(e.is_timeout()),
        other => panic!("Expected timeout, got {:?}", other),
    }
    assert!(!submitter.is_in_flight());
    assert!(!session.is_submitted());
}

#[tokio::test]
async fn test_second_submission_rejected_while_first_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let submitter = Submitter::new(webhook_settings(&server)).unwrap();
    let session = session("");
    let quote = session.quote(now().naive_local());
    let payload = SubmissionPayload::build("Jane", session.config(), &quote, &now()).unwrap();

    let (first, second) = tokio::join!(submitter.send(&payload), submitter.send(&payload));

    assert!(first.is_ok());
    assert!(matches!(second, Err(AppError::SubmissionInFlight)));
    assert!(!submitter.is_in_flight());

    // latch released, the next request goes out
    submitter.send(&payload).await.unwrap();
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}
