use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use qa_compare::compare::{CompareConfig, Comparator};
use qa_compare::reader::Prediction;
use qa_compare::reader::mock::MockReader;
use qa_compare::registry::ModelRegistry;
use qa_compare::web::{AppState, router};

const CONTEXT: &str = "Python was created by Guido van Rossum and first released in 1991.";

fn reader() -> MockReader {
    let guido = Prediction {
        answer: "Guido van Rossum".to_string(),
        score: 0.88,
        start: 22,
        end: 38,
    };
    MockReader::new()
        .with_answer("DistilBERT", guido.clone())
        .with_answer("RoBERTa", guido.clone())
        .with_error("DeBERTa", "inference API error (500): boom")
}

fn app_with(reader: MockReader) -> axum::Router {
    let comparator = Comparator::new(
        ModelRegistry::builtin(),
        Box::new(reader),
        CompareConfig::default(),
    );
    router(Arc::new(AppState::new(comparator)))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_renders_empty_form() {
    let response = app_with(reader())
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Question Answering: Model Comparison"));
    assert!(html.contains("placeholder=\"Enter the text containing the answer...\">\n</textarea>"));
}

#[tokio::test]
async fn example_query_prefills_inputs() {
    let response = app_with(reader())
        .oneshot(Request::get("/?example=1").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let html = body_string(response).await;
    assert!(html.contains(">\nWhen was the Eiffel Tower completed?</textarea>"));
    assert!(html.contains("designed by Gustave Eiffel"));
}

#[tokio::test]
async fn out_of_range_example_is_ignored() {
    let response = app_with(reader())
        .oneshot(Request::get("/?example=99").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("placeholder=\"Ask a question about the context...\">\n</textarea>"));
}

#[tokio::test]
async fn malformed_example_is_ignored() {
    for query in ["/?example=-1", "/?example=abc", "/?example="] {
        let response = app_with(reader())
            .oneshot(Request::get(query).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{query}");
        let html = body_string(response).await;
        assert!(
            html.contains("placeholder=\"Enter the text containing the answer...\">\n</textarea>"),
            "{query}"
        );
        assert!(
            html.contains("placeholder=\"Ask a question about the context...\">\n</textarea>"),
            "{query}"
        );
    }
}

#[tokio::test]
async fn leading_newline_in_context_survives_resubmit() {
    let form = "context=%0ALine+one.&question=What%3F";
    let response = app_with(reader())
        .oneshot(
            Request::post("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form))
                .unwrap(),
        )
        .await
        .unwrap();

    let html = body_string(response).await;
    assert!(html.contains("answer...\">\n\nLine one.</textarea>"));
}

#[tokio::test]
async fn form_submit_renders_answers() {
    let form = "context=Python+was+created+by+Guido+van+Rossum+and+first+released+in+1991.&question=Who+created+Python%3F";
    let response = app_with(reader())
        .oneshot(
            Request::post("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(">\nWho created Python?</textarea>"));
    assert!(html.contains(r#"<div class="field answer">Guido van Rossum</div>"#));
    assert!(html.contains(r#"<div class="field confidence">88.00%</div>"#));
    assert!(html.contains("background-color: #FF6B6B;"));
    assert!(html.contains("Error: inference API error (500): boom"));
}

#[tokio::test]
async fn form_submit_with_missing_question() {
    let response = app_with(reader())
        .oneshot(
            Request::post("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("context=something"))
                .unwrap(),
        )
        .await
        .unwrap();

    let html = body_string(response).await;
    assert_eq!(
        html.matches("Please provide both context and question.").count(),
        3
    );
}

#[tokio::test]
async fn api_answer_returns_comparison() {
    let body = serde_json::json!({ "context": CONTEXT, "question": "Who created Python?" });
    let response = app_with(reader())
        .oneshot(
            Request::post("/api/answer")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    let answers = json["answers"].as_array().unwrap();
    assert_eq!(answers.len(), 3);
    assert_eq!(answers[0]["label"], "DistilBERT");
    assert_eq!(answers[0]["answer"], "Guido van Rossum");
    assert_eq!(answers[0]["confidence"], "88.00%");
    assert_eq!(answers[2]["confidence"], "0%");
}

#[tokio::test]
async fn api_models_lists_registry() {
    let response = app_with(reader())
        .oneshot(Request::get("/api/models").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    let models = json.as_array().unwrap();
    assert_eq!(models.len(), 3);
    assert_eq!(models[1]["label"], "RoBERTa");
    assert_eq!(models[1]["repo_id"], "khaledbouabdallah/roberta-squad-finetuned");
    assert_eq!(models[1]["availability"]["status"], "ready");
}

#[tokio::test]
async fn health_counts_ready_models() {
    let mut comparator = Comparator::new(
        ModelRegistry::builtin(),
        Box::new(reader().with_load_failure("DeBERTa", "offline")),
        CompareConfig::default(),
    );
    comparator.load().await;
    let app = router(Arc::new(AppState::new(comparator)));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["models_ready"], 2);
}

#[tokio::test]
async fn unavailable_model_noted_on_page() {
    let mut comparator = Comparator::new(
        ModelRegistry::builtin(),
        Box::new(reader().with_load_failure("RoBERTa", "hub error (404 Not Found)")),
        CompareConfig::default(),
    );
    comparator.load().await;
    let app = router(Arc::new(AppState::new(comparator)));

    let html = body_string(
        app.oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap(),
    )
    .await;
    assert!(html.contains("not loaded: hub error (404 Not Found)"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let response = app_with(reader())
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
