//! Integration tests for the admin store.
//!
//! These drive [`AdminStore`] actions against a [`StubApi`] and check the
//! resulting slice state, including the concurrent-submission policies.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::Method;
use bazaar_admin::forms::{BrandDraft, LogoImage, UploadBatch};
use bazaar_admin::spreadsheet::ProductUploadRow;
use bazaar_admin::store::{
    AdminStore, BrandCreate, BrandDelete, Brands, Phase, ProductUpload, Settled, Slice,
    StoreError, SubmissionPolicy, UPLOAD_FAILURE,
};
use bazaar_core::BrandId;
use bazaar_integration_tests::{StubApi, StubResponse};
use serde_json::json;

const SLOW: Duration = Duration::from_millis(300);

fn brand_list(names: &[&str]) -> StubResponse {
    let brands: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({"_id": format!("b{i}"), "name": name}))
        .collect();
    StubResponse::json(&json!({"success": true, "brands": brands}))
}

fn brand_names(store: &AdminStore) -> Vec<String> {
    store
        .snapshot()
        .brands
        .data()
        .map(|brands| brands.iter().map(|b| b.name.clone()).collect())
        .unwrap_or_default()
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_fetch_brands_fulfils_slice() {
    let stub = StubApi::start().await;
    stub.respond(Method::GET, "/api/v1/admin/brands", brand_list(&["Apple", "Nokia"]));
    let store = stub.store(SubmissionPolicy::LastWriteWins);

    assert_eq!(store.snapshot().brands.phase(), Phase::Idle);
    let settled = store.fetch_brands().await.unwrap();

    assert_eq!(settled, Settled::Fulfilled);
    let state = store.snapshot();
    assert_eq!(state.brands.phase(), Phase::Fulfilled);
    assert!(!state.brands.is_loading());
    assert_eq!(brand_names(&store), ["Apple", "Nokia"]);
}

#[tokio::test]
async fn test_failed_refetch_keeps_previous_data() {
    let stub = StubApi::start().await;
    stub.respond(Method::GET, "/api/v1/admin/brands", brand_list(&["Apple"]));
    stub.respond(
        Method::GET,
        "/api/v1/admin/brands",
        StubResponse::json(&json!({"message": "Database unavailable"})).status(503),
    );
    let store = stub.store(SubmissionPolicy::LastWriteWins);

    store.fetch_brands().await.unwrap();
    let settled = store.fetch_brands().await.unwrap();

    assert_eq!(settled, Settled::Rejected("Database unavailable".to_string()));
    let state = store.snapshot();
    assert_eq!(state.brands.error(), Some("Database unavailable"));
    assert_eq!(brand_names(&store), ["Apple"]);
}

#[tokio::test]
async fn test_subscribers_see_pending_then_settled() {
    let stub = StubApi::start().await;
    stub.respond(
        Method::GET,
        "/api/v1/admin/brands",
        brand_list(&["Apple"]).delayed(Duration::from_millis(100)),
    );
    let store = stub.store(SubmissionPolicy::LastWriteWins);
    let mut updates = store.subscribe();

    let fetch = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_brands().await }
    });

    updates.changed().await.unwrap();
    assert!(updates.borrow_and_update().brands.is_loading());

    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().brands.phase(), Phase::Fulfilled);
    assert_eq!(fetch.await.unwrap().unwrap(), Settled::Fulfilled);
}

// ============================================================================
// Mutation flags
// ============================================================================

#[tokio::test]
async fn test_create_brand_raises_flag_until_reset() {
    let stub = StubApi::start().await;
    stub.respond(
        Method::POST,
        "/api/v1/admin/brand/new",
        StubResponse::json(&json!({"success": true, "brand": {"_id": "b9", "name": "Oppo"}})),
    );
    let store = stub.store(SubmissionPolicy::LastWriteWins);
    let brand = BrandDraft {
        name: "Oppo".to_string(),
        logo: Some(LogoImage::from_bytes("image/png", b"png")),
    }
    .validate()
    .unwrap();

    store.create_brand(&brand).await.unwrap();

    let state = store.snapshot();
    assert!(state.brand_create.flag());
    assert_eq!(state.brand_create.data().unwrap().id, BrandId::new("b9"));

    store.reset::<BrandCreate>();
    let state = store.snapshot();
    assert!(!state.brand_create.flag());
    assert!(state.brand_create.data().is_some());
}

#[tokio::test]
async fn test_delete_brand_flag_follows_server_success() {
    let stub = StubApi::start().await;
    stub.respond(
        Method::DELETE,
        "/api/v1/admin/brand/b1",
        StubResponse::json(&json!({"success": false})),
    );
    let store = stub.store(SubmissionPolicy::LastWriteWins);

    let settled = store.delete_brand(&BrandId::new("b1")).await.unwrap();

    assert_eq!(settled, Settled::Fulfilled);
    let state = store.snapshot();
    assert!(!state.brand_delete.flag());
    assert_eq!(state.brand_delete.data(), Some(&false));
}

#[tokio::test]
async fn test_mutation_does_not_refetch_list() {
    let stub = StubApi::start().await;
    stub.respond(Method::GET, "/api/v1/admin/brands", brand_list(&["Apple"]));
    stub.respond(
        Method::DELETE,
        "/api/v1/admin/brand/b0",
        StubResponse::json(&json!({"success": true})),
    );
    let store = stub.store(SubmissionPolicy::LastWriteWins);

    store.fetch_brands().await.unwrap();
    store.delete_brand(&BrandId::new("b0")).await.unwrap();

    assert_eq!(stub.requests_to(&Method::GET, "/api/v1/admin/brands").len(), 1);
    assert_eq!(brand_names(&store), ["Apple"]);
    assert!(store.snapshot().brand_delete.flag());
    store.reset::<BrandDelete>();
    assert!(!store.snapshot().brand_delete.flag());
}

#[tokio::test]
async fn test_upload_failure_prefers_server_message() {
    let stub = StubApi::start().await;
    stub.respond(
        Method::POST,
        "/api/v1/admin/product/upload-products",
        StubResponse::json(&json!({"message": "Invalid sheet"})).status(400),
    );
    let store = stub.store(SubmissionPolicy::LastWriteWins);
    let row = ProductUploadRow::new(json!({"name": "Phone"}).as_object().unwrap().clone());
    let batch = UploadBatch::new(vec![row]).unwrap();

    let settled = store.upload_products(&batch).await.unwrap();

    assert_eq!(settled, Settled::Rejected("Invalid sheet".to_string()));
    assert_eq!(store.snapshot().product_upload.error(), Some("Invalid sheet"));
    assert_ne!(store.snapshot().product_upload.error(), Some(UPLOAD_FAILURE));
}

#[tokio::test]
async fn test_clear_errors_empties_every_slice() {
    let stub = StubApi::start().await;
    let store = stub.store(SubmissionPolicy::LastWriteWins);

    // Nothing is stubbed, so both requests fail with the stub's 404 message
    store.fetch_brands().await.unwrap();
    store.fetch_orders().await.unwrap();
    assert!(store.snapshot().brands.error().is_some());
    assert!(store.snapshot().orders.error().is_some());

    store.clear_errors();
    let state = store.snapshot();
    assert!(state.brands.error().is_none());
    assert!(state.orders.error().is_none());
}

// ============================================================================
// Submission policies
// ============================================================================

#[tokio::test]
async fn test_reject_while_pending_sends_one_request() {
    let stub = StubApi::start().await;
    stub.respond(
        Method::GET,
        "/api/v1/admin/brands",
        brand_list(&["Apple"]).delayed(SLOW),
    );
    let store = stub.store(SubmissionPolicy::RejectWhilePending);

    let (first, second) = tokio::join!(store.fetch_brands(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.fetch_brands().await
    });

    assert_eq!(first.unwrap(), Settled::Fulfilled);
    assert_eq!(second.unwrap_err(), StoreError::AlreadyPending(Brands::NAME));
    assert_eq!(stub.requests_to(&Method::GET, "/api/v1/admin/brands").len(), 1);
}

#[tokio::test]
async fn test_last_write_wins_keeps_latest_completion() {
    let stub = StubApi::start().await;
    stub.respond(
        Method::GET,
        "/api/v1/admin/brands",
        brand_list(&["Slow"]).delayed(SLOW),
    );
    stub.respond(Method::GET, "/api/v1/admin/brands", brand_list(&["Fast"]));
    let store = stub.store(SubmissionPolicy::LastWriteWins);

    let (first, second) = tokio::join!(store.fetch_brands(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.fetch_brands().await
    });

    assert_eq!(first.unwrap(), Settled::Fulfilled);
    assert_eq!(second.unwrap(), Settled::Fulfilled);
    assert_eq!(stub.requests_to(&Method::GET, "/api/v1/admin/brands").len(), 2);
    // The slow response arrives last and decides the state
    assert_eq!(brand_names(&store), ["Slow"]);
    assert!(!store.snapshot().brands.is_loading());
}

#[tokio::test]
async fn test_abandoned_request_is_discarded() {
    let stub = StubApi::start().await;
    stub.respond(
        Method::POST,
        "/api/v1/admin/product/upload-products",
        StubResponse::json(&json!({"success": true})).delayed(SLOW),
    );
    let store = stub.store(SubmissionPolicy::RejectWhilePending);
    let row = ProductUploadRow::new(json!({"name": "Phone"}).as_object().unwrap().clone());
    let batch = UploadBatch::new(vec![row]).unwrap();

    let (settled, ()) = tokio::join!(store.upload_products(&batch), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.abandon::<ProductUpload>();
    });

    assert_eq!(settled.unwrap(), Settled::Discarded);
    let state = store.snapshot();
    assert!(!state.product_upload.is_loading());
    assert!(!state.product_upload.flag());
    assert!(state.product_upload.data().is_none());
}

#[tokio::test]
async fn test_timed_out_fetch_releases_slice() {
    let stub = StubApi::start().await;
    stub.respond(
        Method::GET,
        "/api/v1/admin/brands",
        brand_list(&["Apple"]).delayed(SLOW),
    );
    stub.respond(Method::GET, "/api/v1/admin/brands", brand_list(&["Nokia"]));
    let store = stub.store(SubmissionPolicy::RejectWhilePending);

    let timed_out = tokio::time::timeout(Duration::from_millis(50), store.fetch_brands()).await;
    assert!(timed_out.is_err());
    assert!(!store.snapshot().brands.is_loading());

    let settled = store.fetch_brands().await.unwrap();
    assert_eq!(settled, Settled::Fulfilled);
    assert_eq!(brand_names(&store), ["Nokia"]);

    // The dropped request never lands, even after its response would have arrived
    tokio::time::sleep(SLOW).await;
    assert_eq!(brand_names(&store), ["Nokia"]);
}

#[tokio::test]
async fn test_remove_brand_details_clears_data() {
    let stub = StubApi::start().await;
    stub.respond(
        Method::GET,
        "/api/v1/brand/b1",
        StubResponse::json(&json!({"brand": {"_id": "b1", "name": "Apple"}})),
    );
    let store = stub.store(SubmissionPolicy::LastWriteWins);

    store.fetch_brand_details(&BrandId::new("b1")).await.unwrap();
    assert!(store.snapshot().brand_details.data().is_some());

    store.remove_brand_details();
    assert!(store.snapshot().brand_details.data().is_none());
}
