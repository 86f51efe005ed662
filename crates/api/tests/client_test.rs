use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use api::ReqwestRequester;
use nodes::{HttpError, HttpRequest, HttpRequester};

fn requester() -> ReqwestRequester {
    ReqwestRequester::new(Duration::from_secs(5)).expect("client builds")
}

#[tokio::test]
async fn post_sends_body_headers_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/movies"))
        .and(header("x-api-key", "secret"))
        .and(query_param("id", "rec-1"))
        .and(query_param("webhook", "https://hooks.example/done?a=1"))
        .and(body_json(json!({ "width": 1920, "scenes": [] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "project": "p1" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = HttpRequest::post(
        format!("{}/v2/movies", mock_server.uri()),
        json!({ "width": 1920, "scenes": [] }),
    )
    .header("x-api-key", "secret")
    .header("Content-Type", "application/json")
    .query("id", "rec-1")
    .query("webhook", "https://hooks.example/done?a=1");

    let response = requester().request(request).await.unwrap();
    assert_eq!(response, json!({ "success": true, "project": "p1" }));
}

#[tokio::test]
async fn get_returns_array_bodies_untouched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/movies/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "status": "done" }])))
        .mount(&mock_server)
        .await;

    let response = requester()
        .request(HttpRequest::get(format!("{}/v2/movies/job-1", mock_server.uri())))
        .await
        .unwrap();
    assert_eq!(response, json!([{ "status": "done" }]));
}

#[tokio::test]
async fn error_status_carries_the_response_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/movies"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&mock_server)
        .await;

    let err = requester()
        .request(HttpRequest::post(format!("{}/v2/movies", mock_server.uri()), json!({})))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        HttpError::Status {
            status: 401,
            body: "invalid api key".into()
        }
    );
}

#[tokio::test]
async fn non_json_success_body_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/movies/job-2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&mock_server)
        .await;

    let err = requester()
        .request(HttpRequest::get(format!("{}/v2/movies/job-2", mock_server.uri())))
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Decode(_)));
}

#[tokio::test]
async fn empty_success_body_reads_as_empty_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/movies"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let response = requester()
        .request(HttpRequest::post(format!("{}/v2/movies", mock_server.uri()), json!({})))
        .await
        .unwrap();
    assert_eq!(response, json!({}));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Nothing listens on port 9 (discard) in the test environment.
    let err = requester()
        .request(HttpRequest::get("http://127.0.0.1:9/v2/movies/x"))
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Transport(_)));
}
