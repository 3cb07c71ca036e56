use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use pipedb_http::{Params, PipeDbClient, PipeDbError, Value};
use serde_json::{json, Value as JsonValue};

#[derive(Clone)]
struct MockResponse {
    status: StatusCode,
    body: JsonValue,
}

impl MockResponse {
    fn json(status: StatusCode, body: JsonValue) -> Self {
        Self { status, body }
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<JsonValue>>>,
}

async fn pipeline_handler(State(state): State<MockState>, body: String) -> impl IntoResponse {
    let parsed: JsonValue = serde_json::from_str(&body).unwrap_or(JsonValue::Null);
    state
        .requests
        .lock()
        .expect("request log mutex must not be poisoned")
        .push(parsed);

    let response = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "no mock response available"}),
            )
        })
    };

    (response.status, Json(response.body))
}

struct TestServer {
    base_url: String,
    requests: Arc<Mutex<Vec<JsonValue>>>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TestServer {
    fn client(&self) -> PipeDbClient {
        PipeDbClient::from_url(&self.base_url).expect("must build client")
    }

    fn recorded_request(&self, index: usize) -> JsonValue {
        self.requests
            .lock()
            .expect("request log mutex must not be poisoned")[index]
            .clone()
    }
}

async fn spawn_server(responses: Vec<MockResponse>) -> TestServer {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/v2/pipeline", post(pipeline_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    TestServer {
        base_url: format!("http://{address}"),
        requests: state.requests,
        task,
    }
}

fn ok_pipeline_body(result: JsonValue) -> JsonValue {
    json!({
        "results": [
            { "type": "ok", "response": { "result": result } },
            { "type": "ok", "response": {} }
        ]
    })
}

#[tokio::test]
async fn select_literal_returns_one_row() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        ok_pipeline_body(json!({
            "cols": [{ "name": "1" }],
            "rows": [[{ "value": 1 }]]
        })),
    )])
    .await;
    let db = server.client();

    let rows = db.execute("SELECT 1", ()).await.expect("query must succeed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("1").expect("column 1"), &Value::Integer(1));

    let body = server.recorded_request(0);
    assert_eq!(
        body,
        json!({ "requests": [
            { "type": "execute", "stmt": { "sql": "SELECT 1" } },
            { "type": "close" }
        ]})
    );
}

#[tokio::test]
async fn positional_args_are_encoded_in_the_request_body() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        ok_pipeline_body(json!({ "cols": [], "rows": [] })),
    )])
    .await;
    let db = server.client();

    db.execute("SELECT * FROM t WHERE id = ?", [Value::integer(5)])
        .await
        .expect("query must succeed");

    let body = server.recorded_request(0);
    assert_eq!(
        body["requests"][0]["stmt"]["args"],
        json!([{ "type": "integer", "value": 5 }])
    );
    assert!(body["requests"][0]["stmt"].get("named_args").is_none());
}

#[tokio::test]
async fn named_args_are_encoded_in_the_request_body() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        ok_pipeline_body(json!({ "cols": [], "rows": [] })),
    )])
    .await;
    let db = server.client();

    db.execute(
        "INSERT INTO users (name) VALUES (:name)",
        Params::named([("name", Value::text("Ada"))]),
    )
    .await
    .expect("insert must succeed");

    let body = server.recorded_request(0);
    assert_eq!(
        body["requests"][0]["stmt"]["named_args"],
        json!([{ "name": "name", "value": { "type": "text", "value": "Ada" } }])
    );
    assert!(body["requests"][0]["stmt"].get("args").is_none());
}

#[tokio::test]
async fn server_step_error_surfaces_message_verbatim() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({ "results": [
            { "type": "error", "error": { "message": "no such table" } }
        ]}),
    )])
    .await;
    let db = server.client();

    let err = db
        .execute("SELECT * FROM missing", ())
        .await
        .expect_err("query must fail");

    match err {
        PipeDbError::Query { message } => assert_eq!(message, "no such table"),
        other => panic!("expected query error, got {other:?}"),
    }
}

#[tokio::test]
async fn two_column_two_row_result_decodes_in_column_order() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        ok_pipeline_body(json!({
            "cols": [{ "name": "id" }, { "name": "name" }],
            "rows": [
                [{ "value": 1 }, { "value": "Ada" }],
                [{ "value": 2 }, { "value": "Grace" }]
            ]
        })),
    )])
    .await;
    let db = server.client();

    let rows = db
        .execute("SELECT id, name FROM users", ())
        .await
        .expect("query must succeed");

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.columns(), ["id", "name"]);
    }
    assert_eq!(rows[0].get("id").expect("id"), &Value::Integer(1));
    assert_eq!(
        rows[0].get("name").expect("name"),
        &Value::Text("Ada".to_owned())
    );
    assert_eq!(rows[1].get("id").expect("id"), &Value::Integer(2));
    assert_eq!(
        rows[1].get("name").expect("name"),
        &Value::Text("Grace".to_owned())
    );
}

#[tokio::test]
async fn empty_rows_yield_an_empty_sequence() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        ok_pipeline_body(json!({ "cols": [{ "name": "id" }], "rows": [] })),
    )])
    .await;
    let db = server.client();

    let rows = db
        .execute("SELECT id FROM users WHERE 0", ())
        .await
        .expect("query must succeed");
    assert!(rows.is_empty());
}

#[tokio::test]
async fn non_success_status_surfaces_http_error() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "error": "maintenance" }),
    )])
    .await;
    let db = server.client();

    let err = db
        .execute("SELECT 1", ())
        .await
        .expect_err("request must fail");

    match err {
        PipeDbError::Http { status, .. } => assert_eq!(status, 503),
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_step_discriminant_is_a_protocol_error() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({ "results": [
            { "type": "mystery" },
            { "type": "ok", "response": {} }
        ]}),
    )])
    .await;
    let db = server.client();

    let err = db
        .execute("SELECT 1", ())
        .await
        .expect_err("request must fail");
    assert!(matches!(err, PipeDbError::Protocol(_)));
}

#[tokio::test]
async fn connection_refused_surfaces_transport_error() {
    // Bind then drop a listener so the port is known to be closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind probe listener");
    let address = listener.local_addr().expect("must have local addr");
    drop(listener);

    let db = PipeDbClient::from_url(format!("http://{address}")).expect("must build client");
    let err = db
        .execute("SELECT 1", ())
        .await
        .expect_err("request must fail");
    assert!(matches!(err, PipeDbError::Transport(_)));
}

#[tokio::test]
async fn row_lookup_outside_schema_is_unknown_column() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        ok_pipeline_body(json!({
            "cols": [{ "name": "id" }],
            "rows": [[{ "value": 7 }]]
        })),
    )])
    .await;
    let db = server.client();

    let rows = db
        .execute("SELECT id FROM users", ())
        .await
        .expect("query must succeed");
    let err = rows[0].get("name").expect_err("must fail");
    assert!(matches!(err, PipeDbError::UnknownColumn { name } if name == "name"));
}
