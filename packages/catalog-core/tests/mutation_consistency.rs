//! Write-path consistency: transport failures, partial plans, cancellation
//! and serialised concurrent writes

mod common;

use std::sync::Arc;
use std::time::Duration;

use catalog_core::{
    CatalogConfig, CatalogService, CategoryInput, DeletePolicy, ErrorKind, ProductInput,
};
use common::*;
use pretty_assertions::assert_eq;

async fn flaky_service(
    dataset: (Vec<catalog_core::Category>, Vec<catalog_core::Product>),
    repo: impl FnOnce(catalog_core::InMemoryCatalogRepository) -> FlakyRepository,
) -> CatalogService<FlakyRepository> {
    CatalogService::connect(repo(repository(dataset)), CatalogConfig::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn failed_create_leaves_store_unchanged() {
    let service = flaky_service(electronics_laptops(), |inner| {
        FlakyRepository::new(inner, Op::CreateProduct)
    })
    .await;
    let before = service.snapshot();

    let err = service
        .create_product(ProductInput::new("Tablet", 300.0, "1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(err.is_retryable());
    let after = service.snapshot();
    assert_eq!(after.products, before.products);
    assert_eq!(after.version, before.version);
    // single call that never landed: nothing to resync
    assert!(!service.needs_resync());
}

#[tokio::test]
async fn failed_update_keeps_old_record() {
    let service = flaky_service(electronics_laptops(), |inner| {
        FlakyRepository::new(inner, Op::UpdateCategory)
    })
    .await;

    let err = service
        .update_category("2", CategoryInput::new("Notebooks").with_parent("1"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    assert_eq!(service.category("2").map(|c| c.name).as_deref(), Some("Laptops"));
}

#[tokio::test]
async fn cascade_failing_mid_plan_flags_resync() {
    // products go first, then categories deepest-first: "2" succeeds, "1" fails
    let service = flaky_service(electronics_laptops(), |inner| {
        FlakyRepository::new(inner, Op::DeleteCategory).after(1)
    })
    .await;
    let before = service.snapshot();

    let err = service.delete_category("1").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(service.needs_resync());

    // local state untouched even though the remote side is half-deleted
    let after = service.snapshot();
    assert_eq!(after.categories, before.categories);
    assert_eq!(after.products, before.products);
    assert_eq!(service.repository().remote().product_count(), 0);
    assert_eq!(service.repository().remote().category_count(), 1);

    service.repository().heal();
    service.refresh().await.unwrap();

    assert!(!service.needs_resync());
    assert_eq!(service.store().category_count(), 1);
    assert_eq!(service.store().product_count(), 0);
}

#[tokio::test]
async fn plan_failing_on_first_call_needs_no_resync() {
    let service = flaky_service(electronics_laptops(), |inner| {
        FlakyRepository::new(inner, Op::DeleteProduct)
    })
    .await;

    let err = service.delete_category("1").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(!service.needs_resync());
    assert_eq!(service.repository().remote().product_count(), 2);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_store() {
    let service = flaky_service(electronics_laptops(), |inner| {
        // the connect-time refresh consumes the one allowed listing
        FlakyRepository::new(inner, Op::ListProducts).after(1)
    })
    .await;
    let before = service.snapshot();

    let err = service.refresh().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    let after = service.snapshot();
    assert_eq!(after.categories, before.categories);
    assert_eq!(after.version, before.version);
}

#[tokio::test]
async fn local_validation_failures_never_reach_the_repository() {
    // every remote write would fail; local errors must surface first
    let service = flaky_service(electronics_laptops(), |inner| {
        FlakyRepository::new(inner, Op::UpdateCategory)
    })
    .await;

    let err = service
        .update_category("1", CategoryInput::new("Electronics").with_parent("2"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::CyclicReference);

    let err = service
        .update_category("1", CategoryInput::new("Electronics").with_parent("missing"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = service
        .delete_category_with("1", DeletePolicy::Reject)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn abandoned_write_leaves_store_unchanged() {
    let repo = StallingRepository::new(repository(electronics_laptops()), Op::CreateCategory);
    let service = CatalogService::connect(repo, CatalogConfig::default())
        .await
        .unwrap();
    let before = service.snapshot();

    let result = tokio::time::timeout(
        Duration::from_millis(50),
        service.create_category(CategoryInput::new("Phones").with_parent("1")),
    )
    .await;
    assert!(result.is_err(), "create should still be pending");

    let after = service.snapshot();
    assert_eq!(after.categories, before.categories);
    assert_eq!(after.version, before.version);

    // dropping the future released the write gate
    let removed = tokio::time::timeout(Duration::from_secs(1), service.delete_product("p1"))
        .await
        .expect("write gate still held")
        .unwrap();
    assert_eq!(removed.id, "p1");
}

#[tokio::test]
async fn abandoned_cascade_after_remote_deletes_flags_resync() {
    // both product deletes land, then the first category delete never returns
    let repo = StallingRepository::new(repository(electronics_laptops()), Op::DeleteCategory);
    let service = CatalogService::connect(repo, CatalogConfig::default())
        .await
        .unwrap();
    let before = service.snapshot();

    let result = tokio::time::timeout(Duration::from_millis(50), service.delete_category("1")).await;
    assert!(result.is_err(), "cascade should still be pending");

    assert!(service.needs_resync());
    let after = service.snapshot();
    assert_eq!(after.products, before.products);
    assert_eq!(after.version, before.version);
    assert_eq!(service.repository().remote().product_count(), 0);

    service.refresh().await.unwrap();
    assert!(!service.needs_resync());
    assert_eq!(service.store().product_count(), 0);
    assert_eq!(service.store().category_count(), 2);
}

#[tokio::test]
async fn abandoned_cascade_before_any_remote_call_needs_no_resync() {
    let repo = StallingRepository::new(repository(electronics_laptops()), Op::DeleteProduct);
    let service = CatalogService::connect(repo, CatalogConfig::default())
        .await
        .unwrap();

    let result = tokio::time::timeout(Duration::from_millis(50), service.delete_category("1")).await;
    assert!(result.is_err(), "cascade should still be pending");

    assert!(!service.needs_resync());
    assert_eq!(service.repository().remote().product_count(), 2);
}

#[tokio::test]
async fn reads_do_not_wait_for_pending_writes() {
    let repo = StallingRepository::new(repository(electronics_laptops()), Op::DeleteProduct);
    let service = Arc::new(
        CatalogService::connect(repo, CatalogConfig::default())
            .await
            .unwrap(),
    );

    let writer = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.delete_product("p1").await })
    };
    tokio::task::yield_now().await;

    // the pending delete is not visible yet
    assert_eq!(service.aggregate("1").recursive_product_count, 2);
    assert_eq!(service.product_page(1, 10).unwrap().total_items, 2);

    writer.abort();
    assert!(writer.await.unwrap_err().is_cancelled());
    assert_eq!(service.store().product_count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writes_are_serialised() {
    let service = Arc::new(service_with(storefront(), CatalogConfig::default()).await);
    let start_version = service.store().version();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .create_product(ProductInput::new(format!("Item {i}"), i as f64, "b"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(service.store().product_count(), 5 + 16);
    assert_eq!(service.repository().product_count(), 5 + 16);
    assert_eq!(service.store().version(), start_version + 16);
    assert_eq!(service.aggregate("b").recursive_product_count, 17);
}
