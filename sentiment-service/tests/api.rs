use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn router() -> Router {
    sentiment_service::app().expect("router builds")
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn classifies_reference_texts() {
    let cases = [
        ("This%20is%20great%21", "positive"),
        ("I+hate+this", "negative"),
        ("It%27s%20okay%20I%20guess", "neutral"),
        ("", "neutral"),
        ("I%20love%20to%20hate%20mondays", "negative"),
        ("GOOD%20stuff", "positive"),
    ];

    for (encoded, expected) in cases {
        let (status, body) = get(&format!("/api/sentiment?text={encoded}")).await;
        assert_eq!(status, StatusCode::OK, "text: {encoded}");
        assert_eq!(body, json!({ "sentiment": expected }), "text: {encoded}");
    }
}

#[tokio::test]
async fn substring_matches_are_honoured() {
    let (status, body) = get("/api/sentiment?text=badminton%20club").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "negative");
}

#[tokio::test]
async fn numeric_looking_text_is_still_text() {
    let (status, body) = get("/api/sentiment?text=42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "neutral");
}

#[tokio::test]
async fn missing_text_is_a_client_error() {
    let (status, body) = get("/api/sentiment").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("text"));

    let (status, _) = get("/api/sentiment?txt=great").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_get_is_routed() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/sentiment?text=great")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn no_other_endpoints_are_exposed() {
    for uri in ["/", "/swagger-ui", "/api-docs/openapi.json", "/api/sentiment/extra"] {
        let (status, _) = get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri: {uri}");
    }
}

#[test]
fn openapi_documents_the_sentiment_operation() {
    let doc = serde_json::to_value(sentiment_service::build_openapi_spec()).unwrap();
    let op = &doc["paths"]["/api/sentiment"]["get"];

    assert_eq!(op["operationId"], "analyze_sentiment");
    let params = op["parameters"].as_array().unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0]["name"], "text");
    assert_eq!(params[0]["in"], "query");
    assert_eq!(params[0]["required"], true);

    assert!(op["responses"]["200"]["content"]["application/json"]["schema"].is_object());
    assert!(doc["components"]["schemas"]["SentimentResponse"].is_object());
    assert!(doc["components"]["schemas"]["Sentiment"].is_object());
}

#[tokio::test]
async fn repeated_text_values_are_joined_before_classification() {
    let (status, body) = get("/api/sentiment?text=I%20hate%20it&text=ok").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "negative");

    let (_, body) = get("/api/sentiment?text=so&text=good").await;
    assert_eq!(body["sentiment"], "positive");
}

#[tokio::test]
async fn malformed_percent_encoding_is_a_client_error() {
    let (status, body) = get("/api/sentiment?text=%ZZbad&%%%").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("malformed query string"));
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let request = Request::builder()
        .uri("/api/sentiment?text=great")
        .header("origin", "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[test]
fn openapi_components_are_exactly_the_dtos_and_error_body() {
    let doc = serde_json::to_value(sentiment_service::build_openapi_spec()).unwrap();
    let mut names: Vec<&str> = doc["components"]["schemas"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    names.sort_unstable();
    assert_eq!(
        names,
        ["ErrorBody", "Sentiment", "SentimentQuery", "SentimentResponse"]
    );
}
