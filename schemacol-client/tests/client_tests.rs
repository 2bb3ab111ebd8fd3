//! End-to-end tests of the REST client against an in-process backend.


use axum::http::{Method, StatusCode};
use schemacol_client::{ApiClientError, ClientConfig, ColumnFilter, RestClient};
use schemacol_core::{CreateSchemaColumn, Flag, WireRevision};
use serde_json::json;
use std::time::{Duration, Instant};
use test_support::Backend;

async fn current_client(backend: &Backend) -> RestClient {
    let origin = backend.spawn().await;
    RestClient::with_base_url(format!("{}/api", origin), WireRevision::Current)
        .expect("client")
}

fn sku() -> CreateSchemaColumn {
    CreateSchemaColumn::new(10, "sku", "SKU", "string")
        .with_editable(true)
        .with_values("")
}

#[tokio::test]
async fn list_without_filters_sends_no_query() -> Result<(), ApiClientError> {
    let backend = Backend::new("columnId");
    backend.seed(1, json!({"columnId": 1, "baseCategory": 2, "field": "a", "title": "A", "type": "text"}));
    backend.seed(2, json!({"id": 2, "baseCategory": 2, "field": "b", "title": "B", "type": "number"}));
    let client = current_client(&backend).await;

    let columns = client.list(&ColumnFilter::none()).await?;

    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0].column_id, 1);
    assert_eq!(columns[1].column_id, 2);
    let request = backend.last_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/api/schema/columns");
    assert_eq!(request.query, None);
    Ok(())
}

#[tokio::test]
async fn list_with_base_category_sends_one_param() -> Result<(), ApiClientError> {
    let backend = Backend::new("columnId");
    let client = current_client(&backend).await;

    let columns = client.list(&ColumnFilter::none().base_category(5)).await?;

    assert!(columns.is_empty());
    assert_eq!(backend.last_request().query.as_deref(), Some("baseCategory=5"));
    Ok(())
}

#[tokio::test]
async fn list_preserves_backend_order_and_normalizes() -> Result<(), ApiClientError> {
    let backend = Backend::new("columnId");
    backend.override_list(
        StatusCode::OK,
        r#"[
            {"columnId": 9, "baseCategory": 1, "field": "z", "title": "Z", "editable": {"x": 1}, "values": {"opts": [1, 2]}},
            {"columnId": 3, "baseCategory": "4", "field": "y", "title": "Y", "editable": true, "series": null}
        ]"#,
    );
    let client = current_client(&backend).await;

    let columns = client.list(&ColumnFilter::none()).await?;

    assert_eq!(columns.iter().map(|c| c.column_id).collect::<Vec<_>>(), vec![9, 3]);
    assert_eq!(columns[0].editable, Flag::UNSET);
    assert_eq!(columns[0].values, r#"{"opts":[1,2]}"#);
    assert_eq!(columns[1].base_category, 4);
    assert_eq!(columns[1].editable, Flag::SET);
    assert_eq!(columns[1].series, None);
    Ok(())
}

#[tokio::test]
async fn create_returns_server_assigned_id() -> Result<(), ApiClientError> {
    let backend = Backend::new("columnId");
    let client = current_client(&backend).await;

    let column = client.create(&sku()).await?;

    assert_eq!(column.column_id, 100);
    assert_eq!(column.base_category, 10);
    assert_eq!(column.field, "sku");
    assert_eq!(column.col_type, "string");
    assert_eq!(column.editable, Flag::SET);
    assert_eq!(column.values, "");

    let request = backend.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    let body = request.body.expect("json body");
    assert_eq!(body["type"], json!("string"));
    assert_eq!(body["editable"], json!(1));
    assert!(body.get("columnId").is_none());
    Ok(())
}

#[tokio::test]
async fn update_puts_id_in_path_and_body() -> Result<(), ApiClientError> {
    let backend = Backend::new("columnId");
    let client = current_client(&backend).await;
    let created = client.create(&sku()).await?;

    let changed = created.to_create();
    let changed = CreateSchemaColumn {
        title: "Stock keeping unit".to_string(),
        ..changed
    };
    let updated = client.update(created.column_id, &changed).await?;

    assert_eq!(updated.column_id, created.column_id);
    assert_eq!(updated.title, "Stock keeping unit");
    let request = backend.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, format!("/api/schema/columns/{}", created.column_id));
    assert_eq!(request.body.expect("json body")["columnId"], json!(created.column_id));
    Ok(())
}

#[tokio::test]
async fn update_clears_omitted_optional_fields() -> Result<(), ApiClientError> {
    let backend = Backend::new("columnId");
    let client = current_client(&backend).await;
    let created = client
        .create(&sku().with_series(7).with_values("a,b"))
        .await?;
    assert_eq!(created.series, Some(7));

    let replacement = CreateSchemaColumn::new(10, "sku", "SKU", "string");
    let updated = client.update(created.column_id, &replacement).await?;

    assert_eq!(updated.series, None);
    assert_eq!(updated.values, "");
    Ok(())
}

#[tokio::test]
async fn remove_missing_id_is_status_404() {
    let backend = Backend::new("columnId");
    let client = current_client(&backend).await;

    let err = client.remove(4242).await.expect_err("delete must fail");

    assert!(err.is_not_found(), "unexpected error: {err:?}");
    assert!(!err.is_transport());
    match err {
        ApiClientError::Status { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body.as_deref(), Some("column not found"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn remove_existing_id_succeeds() -> Result<(), ApiClientError> {
    let backend = Backend::new("columnId");
    let client = current_client(&backend).await;
    let created = client.create(&sku()).await?;

    client.remove(created.column_id).await?;

    assert_eq!(backend.record_count(), 0);
    let request = backend.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert!(request.body.is_none());
    Ok(())
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let backend = Backend::new("columnId");
    backend.override_list(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    let client = current_client(&backend).await;

    let err = client.list(&ColumnFilter::none()).await.expect_err("list must fail");

    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("database unavailable"));
}

#[tokio::test]
async fn non_json_success_is_decode_error() {
    let backend = Backend::new("columnId");
    backend.override_list(StatusCode::OK, "<html>maintenance</html>");
    let client = current_client(&backend).await;

    let err = client.list(&ColumnFilter::none()).await.expect_err("list must fail");

    assert!(matches!(err, ApiClientError::Decode(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = RestClient::with_base_url(format!("http://{}", addr), WireRevision::Current).unwrap();

    let err = client.list(&ColumnFilter::none()).await.expect_err("list must fail");

    assert!(err.is_transport(), "unexpected error: {err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn legacy_revision_uses_pascal_keys() -> Result<(), ApiClientError> {
    let backend = Backend::new("ColumnId");
    backend.seed(
        5,
        json!({"ColumnId": 5, "BaseCategory": 3, "SeriesId": 8, "Field": "qty", "Title": "Qty", "ColType": "number", "Editable": 1}),
    );
    let origin = backend.spawn().await;
    let client = RestClient::with_base_url(origin, WireRevision::Legacy)?;

    let columns = client
        .list(&ColumnFilter::none().base_category(3).series(8))
        .await?;
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].series, Some(8));
    assert_eq!(columns[0].col_type, "number");
    assert_eq!(backend.last_request().query.as_deref(), Some("baseId=3&seriesId=8"));

    let created = client.create(&sku()).await?;
    let body = backend.last_request().body.expect("json body");
    assert_eq!(body["ColType"], json!("string"));
    assert_eq!(body["BaseCategory"], json!(10));
    assert_eq!(created.column_id, 100);
    Ok(())
}

#[tokio::test]
async fn set_origin_redirects_later_calls() -> Result<(), ApiClientError> {
    let backend = Backend::new("columnId");
    let origin = backend.spawn().await;
    let mut client = RestClient::new(&ClientConfig::default())?;

    client.set_origin(&origin)?;
    client.list(&ColumnFilter::none()).await?;

    assert_eq!(backend.last_request().path, "/erpapi/panel/schema/columns");
    Ok(())
}

#[tokio::test]
async fn empty_origin_is_config_error_and_keeps_endpoint() -> Result<(), ApiClientError> {
    let backend = Backend::new("columnId");
    let mut client = current_client(&backend).await;

    let err = client.set_origin("").expect_err("empty origin must be rejected");

    assert!(matches!(err, ApiClientError::Config(_)), "unexpected error: {err:?}");
    assert!(!err.is_transport());
    client.list(&ColumnFilter::none()).await?;
    assert_eq!(backend.last_request().path, "/api/schema/columns");
    Ok(())
}

#[tokio::test]
async fn slow_backend_hits_configured_timeout() {
    let backend = Backend::new("columnId");
    backend.delay_list(Duration::from_secs(5));
    let origin = backend.spawn().await;
    let config = ClientConfig {
        api_base_url: Some(origin),
        request_timeout_ms: Some(200),
        ..Default::default()
    };
    let client = RestClient::new(&config).expect("client");

    let started = Instant::now();
    let err = client.list(&ColumnFilter::none()).await.expect_err("list must time out");

    assert!(started.elapsed() < Duration::from_secs(4));
    match err {
        ApiClientError::Transport(inner) => assert!(inner.is_timeout(), "not a timeout: {inner:?}"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn unset_timeout_waits_for_slow_backend() -> Result<(), ApiClientError> {
    let backend = Backend::new("columnId");
    backend.delay_list(Duration::from_millis(300));
    let origin = backend.spawn().await;
    let config = ClientConfig {
        api_base_url: Some(origin),
        ..Default::default()
    };
    let client = RestClient::new(&config)?;

    let columns = client.list(&ColumnFilter::none()).await?;

    assert!(columns.is_empty());
    Ok(())
}
