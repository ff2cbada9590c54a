//! End-to-end route tests over the seeded catalog fixture.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use ftb_api::context::REQUEST_ID_HEADER;
use ftb_api::server::Server;
use ftb_test_utils::{
    CORRUPT_DATASET_ID, CORRUPT_EDITION, DATASET_ID, EDITION, UNPUBLISHED_DATASET_ID,
    init_test_logging, seeded_store,
};

fn router(enable_private_endpoints: bool) -> Router {
    init_test_logging();
    Server::builder()
        .enable_private_endpoints(enable_private_endpoints)
        .store(Arc::new(seeded_store()))
        .build()
        .test_router()
}

struct Reply {
    status: StatusCode,
    request_id: Option<String>,
    body: Value,
}

async fn send(router: Router, request: Request<Body>) -> Result<Reply> {
    let response = router.oneshot(request).await.map_err(|err| match err {})?;
    let status = response.status();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .context("read response body")?;
    let body = serde_json::from_slice(&body).context("parse JSON body")?;
    Ok(Reply {
        status,
        request_id,
        body,
    })
}

async fn get(router: Router, uri: &str) -> Result<Reply> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .context("build request")?;
    send(router, request).await
}

fn version_path(dataset_id: &str, edition: &str, version: &str) -> String {
    format!("/datasets/{dataset_id}/editions/{edition}/versions/{version}")
}

// ============================================================================
// Public mode
// ============================================================================

#[tokio::test]
async fn public_dataset_list_contains_only_published() -> Result<()> {
    let reply = get(router(false), "/datasets").await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["count"], 2);
    let ids: Vec<&str> = reply.body["items"]
        .as_array()
        .context("items array")?
        .iter()
        .filter_map(|d| d["id"].as_str())
        .collect();
    assert_eq!(ids, vec![DATASET_ID, CORRUPT_DATASET_ID]);
    Ok(())
}

#[tokio::test]
async fn public_mode_serves_current_variant_and_ignores_state_query() -> Result<()> {
    let reply = get(router(false), &format!("/datasets/{DATASET_ID}?state=associated")).await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["state"], "published");
    Ok(())
}

#[tokio::test]
async fn public_mode_hides_unpublished_dataset() -> Result<()> {
    let reply = get(router(false), &format!("/datasets/{UNPUBLISHED_DATASET_ID}")).await?;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], "NOT_FOUND");
    assert_eq!(reply.body["message"], "dataset not found");
    let header = reply.request_id.context("x-request-id header")?;
    assert_eq!(reply.body["requestId"], header.as_str());
    Ok(())
}

#[tokio::test]
async fn public_version_list_rewrites_self_links() -> Result<()> {
    let reply = get(
        router(false),
        &format!("/datasets/{DATASET_ID}/editions/{EDITION}/versions"),
    )
    .await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["count"], 1);
    let first = &reply.body["items"][0];
    assert_eq!(first["version"], 1);
    assert_eq!(first["state"], "published");
    let self_href = first["links"]["self"]["href"]
        .as_str()
        .context("self link")?;
    assert!(self_href.ends_with(&version_path(DATASET_ID, EDITION, "1")));
    Ok(())
}

#[tokio::test]
async fn public_mode_hides_unpublished_version() -> Result<()> {
    let reply = get(router(false), &version_path(DATASET_ID, EDITION, "2")).await?;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["message"], "version not found");
    Ok(())
}

#[tokio::test]
async fn malformed_version_number_is_bad_request() -> Result<()> {
    let reply = get(router(false), &version_path(DATASET_ID, EDITION, "latest")).await?;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn missing_edition_is_reported_before_version() -> Result<()> {
    let reply = get(router(false), &version_path(DATASET_ID, "1999", "latest")).await?;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["message"], "edition not found");
    Ok(())
}

#[tokio::test]
async fn published_metadata_is_composed() -> Result<()> {
    let uri = format!("{}/metadata", version_path(DATASET_ID, EDITION, "1"));
    let reply = get(router(false), &uri).await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.body["distribution"],
        serde_json::json!(["json", "csv", "xls"])
    );
    assert!(
        reply.body["title"]
            .as_str()
            .is_some_and(|t| !t.ends_with("(revised)"))
    );
    let csv = &reply.body["downloads"]["csv"];
    assert!(csv["href"].is_string());
    assert!(csv.get("private").is_none());
    assert!(csv.get("public").is_none());
    assert!(
        reply.body["links"]["self"]["href"]
            .as_str()
            .is_some_and(|href| href.ends_with("/metadata"))
    );
    assert!(
        reply.body["links"]["website_version"]["href"]
            .as_str()
            .is_some_and(|href| href.starts_with("http://localhost:20000/datasets/123/editions/"))
    );
    Ok(())
}

#[tokio::test]
async fn dimensions_link_to_their_options() -> Result<()> {
    let uri = format!("{}/dimensions", version_path(DATASET_ID, EDITION, "1"));
    let reply = get(router(false), &uri).await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["count"], 2);
    let options = reply.body["items"][0]["links"]["options"]["href"]
        .as_str()
        .context("options link")?;
    assert!(options.ends_with("/versions/1/dimensions/aggregate/options"));
    Ok(())
}

#[tokio::test]
async fn dimension_options_are_paged_by_code() -> Result<()> {
    let uri = format!(
        "{}/dimensions/aggregate/options?offset=1&limit=1",
        version_path(DATASET_ID, EDITION, "1")
    );
    let reply = get(router(false), &uri).await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["count"], 1);
    assert_eq!(reply.body["offset"], 1);
    assert_eq!(reply.body["limit"], 1);
    assert_eq!(reply.body["total_count"], 3);
    assert_eq!(reply.body["items"][0]["option"], "cpih1dim1G10100");
    Ok(())
}

#[tokio::test]
async fn oversized_option_page_is_bad_request() -> Result<()> {
    let uri = format!(
        "{}/dimensions/aggregate/options?limit=5000",
        version_path(DATASET_ID, EDITION, "1")
    );
    let reply = get(router(false), &uri).await?;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn non_numeric_offset_is_bad_request() -> Result<()> {
    let uri = format!(
        "{}/dimensions/aggregate/options?offset=first",
        version_path(DATASET_ID, EDITION, "1")
    );
    let reply = get(router(false), &uri).await?;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.request_id.is_some());
    Ok(())
}

#[tokio::test]
async fn unknown_dimension_is_not_found() -> Result<()> {
    let uri = format!(
        "{}/dimensions/geography/options",
        version_path(DATASET_ID, EDITION, "1")
    );
    let reply = get(router(false), &uri).await?;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["message"], "dimension not found");
    Ok(())
}

#[tokio::test]
async fn caller_request_id_is_echoed() -> Result<()> {
    let request = Request::builder()
        .uri("/datasets")
        .header(REQUEST_ID_HEADER, "req-42")
        .body(Body::empty())
        .context("build request")?;
    let reply = send(router(false), request).await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.request_id.as_deref(), Some("req-42"));
    Ok(())
}

// ============================================================================
// Private mode
// ============================================================================

#[tokio::test]
async fn private_mode_serves_next_variant_by_default() -> Result<()> {
    let reply = get(router(true), &format!("/datasets/{DATASET_ID}")).await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["state"], "associated");
    Ok(())
}

#[tokio::test]
async fn private_mode_lists_unpublished_datasets() -> Result<()> {
    let reply = get(router(true), "/datasets").await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["count"], 3);
    Ok(())
}

#[tokio::test]
async fn private_mode_narrows_with_state_query() -> Result<()> {
    let reply = get(router(true), &format!("/datasets/{DATASET_ID}?state=published")).await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["state"], "published");
    Ok(())
}

#[tokio::test]
async fn private_mode_rejects_unknown_state() -> Result<()> {
    let reply = get(router(true), "/datasets?state=archived").await?;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "BAD_REQUEST");
    assert!(reply.request_id.is_some());
    Ok(())
}

#[tokio::test]
async fn corrupt_version_state_is_internal_error() -> Result<()> {
    let reply = get(
        router(true),
        &version_path(CORRUPT_DATASET_ID, CORRUPT_EDITION, "2"),
    )
    .await?;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body["code"], "INVALID_STATE");
    assert_eq!(reply.body["message"], "incorrect resource state");
    Ok(())
}

#[tokio::test]
async fn draft_metadata_uses_next_variant() -> Result<()> {
    let uri = format!(
        "{}/metadata",
        version_path(UNPUBLISHED_DATASET_ID, "2018", "1")
    );
    let reply = get(router(true), &uri).await?;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["title"], "Population estimates");
    Ok(())
}
