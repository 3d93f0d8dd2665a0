mod common;

use common::send;
use common::TestApp;
use report_service::dataset::errors::QueryError;
use report_service::dataset::models::QueryResponse;
use report_service::dataset::models::Row;
use report_service::tenant::models::TenantId;
use report_service::tenant::ports::TenantScopedRepository;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

fn rows(values: Value) -> Vec<Row> {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row.as_object().cloned().unwrap())
        .collect()
}

/// Parse the serialized config carried by a render response.
fn rendered(body: &Value) -> Value {
    serde_json::from_str(body["result"]["config"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_cross_tenant_get_is_not_found() {
    let app = TestApp::spawn().await;
    app.seed_chart("chart-1", "tenant-1", &json!({ "title": "t", "series": [] }))
        .await;
    let alice = app.login_as("alice", "tenant-1").await;
    let bob = app.login_as("bob", "tenant-2").await;

    let (status, body) = send(app.get_authenticated("/api/v1/chart/get?id=chart-1", &bob)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "chart not found");

    let (status, body) = send(app.get_authenticated("/api/v1/chart/get?id=chart-1", &alice)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["id"], "chart-1");
    assert_eq!(body["result"]["tenantId"], "tenant-1");
}

#[tokio::test]
async fn test_cross_tenant_mutations_are_not_found() {
    let app = TestApp::spawn().await;
    app.seed_chart("chart-1", "tenant-1", &json!({ "title": "t", "series": [] }))
        .await;
    let alice = app.login_as("alice", "tenant-1").await;
    let bob = app.login_as("bob", "tenant-2").await;

    let (status, _) = send(
        app.post_authenticated("/api/v1/chart/update", &bob)
            .json(&json!({ "id": "chart-1", "name": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app.delete_authenticated("/api/v1/chart/delete?id=chart-1", &bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app.get_authenticated("/api/v1/chart/render?id=chart-1", &bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(app.get_authenticated("/api/v1/chart/list", &bob)).await;
    assert_eq!(body["result"], json!([]));

    // Nothing changed for the owner
    let (status, body) = send(app.get_authenticated("/api/v1/chart/get?id=chart-1", &alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["name"], "chart chart-1");
}

#[tokio::test]
async fn test_render_fills_dataset_series() {
    let app = TestApp::spawn().await;
    app.seed_chart(
        "chart-1",
        "tenant-1",
        &json!({
            "title": "Revenue",
            "series": [{ "name": "revenue", "type": "line", "data": [], "datasetId": "ds-1", "query": {} }]
        }),
    )
    .await;
    app.query_executor.respond(
        "ds-1",
        Ok(QueryResponse::from_rows(rows(json!([
            { "revenue": 10 },
            { "revenue": 20 },
            { "revenue": 30 }
        ])))),
    );
    let token = app.login_as("alice", "tenant-1").await;

    let (status, body) = send(app.get_authenticated("/api/v1/chart/render?id=chart-1", &token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let config = rendered(&body);
    assert_eq!(config["title"], "Revenue");
    assert_eq!(config["series"][0]["name"], "revenue");
    assert_eq!(config["series"][0]["datasetId"], "ds-1");
    assert_eq!(config["series"][0]["data"], json!([10, 20, 30]));

    let requests = app.query_executor.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].dataset_id, "ds-1");
}

#[tokio::test]
async fn test_render_queries_on_behalf_of_caller() {
    let app = TestApp::spawn().await;
    app.seed_chart(
        "chart-1",
        "tenant-1",
        &json!({
            "title": "Revenue",
            "series": [{ "name": "revenue", "type": "line", "datasetId": "ds-1" }]
        }),
    )
    .await;
    let token = app.login_as("alice", "tenant-1").await;

    let (status, _) = send(app.get_authenticated("/api/v1/chart/render?id=chart-1", &token)).await;

    assert_eq!(status, StatusCode::OK);
    let contexts = app.query_executor.contexts();
    assert_eq!(contexts.len(), 1);
    assert_eq!(contexts[0].tenant_id.as_str(), "tenant-1");
    assert_eq!(contexts[0].bearer.as_deref(), Some(token.as_str()));
}

#[tokio::test]
async fn test_render_does_not_persist() {
    let app = TestApp::spawn().await;
    let stored = json!({
        "title": "Revenue",
        "series": [{ "name": "revenue", "type": "line", "data": [], "datasetId": "ds-1" }]
    });
    app.seed_chart("chart-1", "tenant-1", &stored).await;
    app.query_executor.respond(
        "ds-1",
        Ok(QueryResponse::from_rows(rows(json!([{ "revenue": 1 }])))),
    );
    let token = app.login_as("alice", "tenant-1").await;

    let (status, _) = send(app.get_authenticated("/api/v1/chart/render?id=chart-1", &token)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app.get_authenticated("/api/v1/chart/get?id=chart-1", &token)).await;
    let config: Value = serde_json::from_str(body["result"]["config"].as_str().unwrap()).unwrap();
    assert_eq!(config["series"][0]["data"], json!([]));
}

#[tokio::test]
async fn test_render_literal_series_is_passthrough() {
    let app = TestApp::spawn().await;
    let stored = json!({
        "title": "Static",
        "xAxis": { "type": "category", "data": ["a", "b", "c"], "name": "letter" },
        "series": [{ "name": "a", "type": "bar", "data": [1, 2, 3] }]
    });
    app.seed_chart("chart-1", "tenant-1", &stored).await;
    let token = app.login_as("alice", "tenant-1").await;

    let (status, body) = send(app.get_authenticated("/api/v1/chart/render?id=chart-1", &token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(rendered(&body), stored);
    assert_eq!(app.query_executor.calls(), 0);
}

#[tokio::test]
async fn test_render_preserves_series_order() {
    let app = TestApp::spawn().await;
    app.seed_chart(
        "chart-1",
        "tenant-1",
        &json!({
            "title": "Mixed",
            "series": [
                { "name": "cost", "type": "bar", "datasetId": "ds-2" },
                { "name": "target", "type": "line", "data": [5, 5] },
                { "name": "revenue", "type": "bar", "datasetId": "ds-1" }
            ]
        }),
    )
    .await;
    app.query_executor.respond(
        "ds-1",
        Ok(QueryResponse::from_rows(rows(json!([{ "revenue": 7 }, { "other": 1 }])))),
    );
    app.query_executor.respond(
        "ds-2",
        Ok(QueryResponse::from_rows(rows(json!([{ "cost": 3 }, { "cost": 4 }])))),
    );
    let token = app.login_as("alice", "tenant-1").await;

    let (status, body) = send(app.get_authenticated("/api/v1/chart/render?id=chart-1", &token)).await;

    assert_eq!(status, StatusCode::OK);
    let config = rendered(&body);
    let names: Vec<&str> = config["series"]
        .as_array()
        .unwrap()
        .iter()
        .map(|series| series["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["cost", "target", "revenue"]);
    assert_eq!(config["series"][0]["data"], json!([3, 4]));
    assert_eq!(config["series"][1]["data"], json!([5, 5]));
    assert_eq!(config["series"][2]["data"], json!([7]));

    let datasets: Vec<String> = app
        .query_executor
        .requests()
        .into_iter()
        .map(|request| request.dataset_id)
        .collect();
    assert_eq!(datasets, vec!["ds-2".to_string(), "ds-1".to_string()]);
}

#[tokio::test]
async fn test_render_empty_response_keeps_data() {
    let app = TestApp::spawn().await;
    app.seed_chart(
        "chart-1",
        "tenant-1",
        &json!({
            "title": "t",
            "series": [{ "name": "revenue", "type": "bar", "data": [9], "datasetId": "ds-1" }]
        }),
    )
    .await;
    let token = app.login_as("alice", "tenant-1").await;

    let (status, body) = send(app.get_authenticated("/api/v1/chart/render?id=chart-1", &token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(rendered(&body)["series"][0]["data"], json!([9]));
    assert_eq!(app.query_executor.calls(), 1);
}

#[tokio::test]
async fn test_render_executor_failure() {
    let app = TestApp::spawn().await;
    app.seed_chart(
        "chart-1",
        "tenant-1",
        &json!({
            "title": "t",
            "series": [
                { "name": "a", "type": "bar", "datasetId": "ds-down" },
                { "name": "b", "type": "bar", "datasetId": "ds-1" }
            ]
        }),
    )
    .await;
    app.query_executor.respond(
        "ds-down",
        Err(QueryError::Unavailable("10.0.0.7:8086 refused".to_string())),
    );
    let token = app.login_as("alice", "tenant-1").await;

    let response = app
        .get_authenticated("/api/v1/chart/render?id=chart-1", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text().await.unwrap();
    assert!(!text.contains("chart-1"));
    assert!(!text.contains("10.0.0.7"));

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "failed to render chart");
    // Fail-fast: the second series is never queried
    assert_eq!(app.query_executor.calls(), 1);
}

#[tokio::test]
async fn test_chart_crud() {
    let app = TestApp::spawn().await;
    let token = app.login_as("alice", "tenant-1").await;

    let (status, body) = send(
        app.post_authenticated("/api/v1/chart/create", &token).json(&json!({
            "name": "Sales",
            "code": "sales",
            "type": "bar",
            "config": { "title": "Sales", "series": [{ "name": "q1", "type": "bar", "data": [1] }] }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "chart created");
    assert_eq!(body["result"]["tenantId"], "tenant-1");
    assert_eq!(body["result"]["type"], "bar");
    assert_eq!(body["result"]["status"], 1);
    let id = body["result"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app.post_authenticated("/api/v1/chart/update", &token)
            .json(&json!({ "id": id, "name": "Revenue", "config": { "title": "ignored", "series": [] } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "chart updated");
    assert_eq!(body["result"]["name"], "Revenue");
    assert_eq!(body["result"]["code"], "sales");
    let config: Value = serde_json::from_str(body["result"]["config"].as_str().unwrap()).unwrap();
    assert_eq!(config["title"], "Sales");

    let (status, body) = send(
        app.post_authenticated("/api/v1/chart/update", &token).json(&json!({
            "id": id,
            "config": { "title": "Replaced", "series": [{ "name": "q2", "type": "line", "data": [2] }] }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let config: Value = serde_json::from_str(body["result"]["config"].as_str().unwrap()).unwrap();
    assert_eq!(config["title"], "Replaced");
    assert_eq!(config["series"][0]["name"], "q2");

    let (_, body) = send(app.get_authenticated("/api/v1/chart/list", &token)).await;
    assert_eq!(body["result"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        app.delete_authenticated(&format!("/api/v1/chart/delete?id={}", id), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "chart deleted");
    assert!(body.get("result").is_none());

    let (status, _) = send(app.get_authenticated(&format!("/api/v1/chart/get?id={}", id), &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(app.get_authenticated("/api/v1/chart/list", &token)).await;
    assert_eq!(body["result"], json!([]));
}

#[tokio::test]
async fn test_list_orders_by_most_recent_update() {
    let app = TestApp::spawn().await;
    app.seed_chart("old", "tenant-1", &json!({ "series": [] })).await;
    app.seed_chart("new", "tenant-1", &json!({ "series": [] })).await;
    let token = app.login_as("alice", "tenant-1").await;

    let (status, _) = send(
        app.post_authenticated("/api/v1/chart/update", &token)
            .json(&json!({ "id": "old", "name": "touched" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app.get_authenticated("/api/v1/chart/list", &token)).await;
    let ids: Vec<&str> = body["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|chart| chart["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["old", "new"]);
}

#[tokio::test]
async fn test_missing_id_parameter() {
    let app = TestApp::spawn().await;
    let token = app.login_as("alice", "tenant-1").await;

    for path in ["/api/v1/chart/get", "/api/v1/chart/render", "/api/v1/chart/get?id="] {
        let (status, body) = send(app.get_authenticated(path, &token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", path);
        assert_eq!(body["message"], "id is required");
    }

    let (status, body) = send(app.delete_authenticated("/api/v1/chart/delete", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "id is required");
}

#[tokio::test]
async fn test_invalid_chart_requests() {
    let app = TestApp::spawn().await;
    let token = app.login_as("alice", "tenant-1").await;

    let (status, body) = send(
        app.post_authenticated("/api/v1/chart/update", &token)
            .json(&json!({ "name": "no id" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid request");

    let (status, body) = send(
        app.post_authenticated("/api/v1/chart/create", &token)
            .json(&json!({ "type": "bar" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid request");

    let (status, _) = send(
        app.post_authenticated("/api/v1/chart/create", &token)
            .header("content-type", "application/json")
            .body("[1, 2"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ambiguous_series_binding_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.login_as("alice", "tenant-1").await;

    for series in [
        json!({ "name": "a", "type": "bar", "data": [], "datasetId": "" }),
        json!({ "name": "a", "type": "bar", "data": [1], "query": { "fields": ["a"] } }),
    ] {
        let (status, body) = send(
            app.post_authenticated("/api/v1/chart/create", &token)
                .json(&json!({ "name": "Sales", "type": "bar", "config": { "series": [series] } })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid request");
    }
    assert!(app.charts.list(&TenantId::new("tenant-1").unwrap()).await.unwrap().is_empty());
}
