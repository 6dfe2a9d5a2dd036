// Integration tests for stores and the products they sell

#[macro_use]
#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::{test_context, TestContext};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use storage_api::core::ErrorCode;
use storage_api::products::models::AddProductRequest;
use storage_api::products::Product;
use storage_api::stores::models::{AddStoreProductRequest, AddStoreRequest, EditStoreRequest};
use storage_api::stores::services::MAX_BARCODE_LEN;
use storage_api::stores::{Store, StoreType};

fn store_request(name: &str, address: &str, store_type: Option<StoreType>) -> AddStoreRequest {
    AddStoreRequest {
        name: Some(name.to_string()),
        address: Some(address.to_string()),
        store_type,
    }
}

fn listing(price: Decimal, barcode: &str) -> AddStoreProductRequest {
    AddStoreProductRequest {
        price,
        barcode: Some(barcode.to_string()),
    }
}

async fn add_store(ctx: &TestContext, name: &str) -> Store {
    ctx.state
        .store_service()
        .add(store_request(name, "1 Main Street", None))
        .await
        .unwrap()
}

async fn add_product(ctx: &TestContext, name: &str, producer: &str) -> Product {
    ctx.state
        .product_service()
        .add(AddProductRequest {
            name: Some(name.to_string()),
            producer_name: Some(producer.to_string()),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_add_store_defaults_to_market() {
    let ctx = test_context();
    let store = add_store(&ctx, "Corner Shop").await;

    assert!(store.id > 0);
    assert_eq!(store.store_type, StoreType::Market);
    assert!(store.store_products.is_none());
}

#[tokio::test]
async fn test_add_store_validation() {
    let ctx = test_context();
    let service = ctx.state.store_service();

    let err = service
        .add(store_request(" ", "1 Main Street", None))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidData);

    let err = service.add(AddStoreRequest::default()).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidData);
}

#[tokio::test]
async fn test_store_identity_includes_type() {
    let ctx = test_context();
    let service = ctx.state.store_service();

    service
        .add(store_request("Corner Shop", "1 Main Street", None))
        .await
        .unwrap();
    let err = service
        .add(store_request(
            "Corner Shop",
            "1 Main Street",
            Some(StoreType::Market),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyInserted);

    let hyper = service
        .add(store_request(
            "Corner Shop",
            "1 Main Street",
            Some(StoreType::HyperMarket),
        ))
        .await
        .unwrap();
    assert_eq!(hyper.store_type, StoreType::HyperMarket);
}

#[tokio::test]
async fn test_edit_store() {
    let ctx = test_context();
    let service = ctx.state.store_service();
    let store = add_store(&ctx, "Corner Shop").await;

    service
        .edit(
            store.id,
            EditStoreRequest {
                name: None,
                address: Some("2 High Street".to_string()),
                store_type: Some(StoreType::SuperMarket),
            },
        )
        .await
        .unwrap();

    let edited = service.get(store.id).await.unwrap();
    assert_eq!(edited.name, "Corner Shop");
    assert_eq!(edited.address, "2 High Street");
    assert_eq!(edited.store_type, StoreType::SuperMarket);
    assert!(edited.last_change.is_some());
}

#[tokio::test]
async fn test_edit_store_errors() {
    let ctx = test_context();
    let service = ctx.state.store_service();

    let err = service
        .edit(1, EditStoreRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidData);

    let err = service
        .edit(
            404,
            EditStoreRequest {
                name: Some("Renamed".to_string()),
                ..EditStoreRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidStoreId);

    add_store(&ctx, "Corner Shop").await;
    let other = add_store(&ctx, "Big Shop").await;
    let err = service
        .edit(
            other.id,
            EditStoreRequest {
                name: Some("Corner Shop".to_string()),
                ..EditStoreRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyInserted);
}

#[tokio::test]
async fn test_type_only_edit_is_accepted() {
    let ctx = test_context();
    let service = ctx.state.store_service();
    let store = add_store(&ctx, "Corner Shop").await;

    service
        .edit(
            store.id,
            EditStoreRequest {
                store_type: Some(StoreType::Other),
                ..EditStoreRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(
        service.get(store.id).await.unwrap().store_type,
        StoreType::Other
    );
}

#[tokio::test]
async fn test_add_product_to_store() {
    let ctx = test_context();
    let service = ctx.state.store_service();
    let store = add_store(&ctx, "Corner Shop").await;
    let milk = add_product(&ctx, "Milk", "Dairy Co").await;

    let listed = service
        .add_product(store.id, milk.id, listing(dec!(1.50), "1234567890"))
        .await
        .unwrap();
    assert_eq!(listed.store_id, store.id);
    assert_eq!(listed.product_id, milk.id);
    assert_eq!(listed.price, dec!(1.50));
    assert_eq!(listed.barcode, "1234567890");

    let err = service
        .add_product(store.id, milk.id, listing(dec!(2), "111"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ProductIsAlreadyInStore);
}

#[tokio::test]
async fn test_add_product_validation_order() {
    let ctx = test_context();
    let service = ctx.state.store_service();

    // body problems are reported before any lookup
    let err = service
        .add_product(1, 1, listing(Decimal::ZERO, "123"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidData);

    let err = service
        .add_product(1, 1, listing(dec!(-1), "123"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidData);

    let err = service
        .add_product(1, 1, listing(dec!(1), "AB12"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidData);

    let err = service
        .add_product(
            1,
            1,
            AddStoreProductRequest {
                price: dec!(1),
                barcode: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidData);

    let err = service
        .add_product(1, 1, listing(dec!(1), "123"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidStoreId);

    let store = add_store(&ctx, "Corner Shop").await;
    let err = service
        .add_product(store.id, 999, listing(dec!(1), "123"))
        .await
        .unwrap_err();
    assert_eq!(err.codes(), vec![ErrorCode::InvalidProductId]);
}

#[tokio::test]
async fn test_add_product_rejects_what_the_table_cannot_hold() {
    let ctx = test_context();
    let service = ctx.state.store_service();
    let store = add_store(&ctx, "Corner Shop").await;
    let milk = add_product(&ctx, "Milk", "Dairy Co").await;

    for request in [
        listing(dec!(0.001), "123"),
        listing(dec!(4.999), "123"),
        listing(dec!(10000000000000000), "123"),
        listing(dec!(1), &"1".repeat(MAX_BARCODE_LEN + 1)),
    ] {
        let err = service
            .add_product(store.id, milk.id, request)
            .await
            .unwrap_err();
        assert_eq!(err.codes(), vec![ErrorCode::InvalidData]);
    }

    let listed = service
        .add_product(store.id, milk.id, listing(dec!(4.990), &"1".repeat(MAX_BARCODE_LEN)))
        .await
        .unwrap();
    assert_eq!(listed.price, dec!(4.99));
    assert_eq!(listed.barcode.len(), MAX_BARCODE_LEN);
}

#[tokio::test]
async fn test_get_store_includes_products() {
    let ctx = test_context();
    let service = ctx.state.store_service();
    let store = add_store(&ctx, "Corner Shop").await;
    let milk = add_product(&ctx, "Milk", "Dairy Co").await;
    let bread = add_product(&ctx, "Bread", "Baker Bros").await;

    service
        .add_product(store.id, milk.id, listing(dec!(1.50), "100"))
        .await
        .unwrap();
    service
        .add_product(store.id, bread.id, listing(dec!(2.25), "200"))
        .await
        .unwrap();

    let loaded = service.get(store.id).await.unwrap();
    let store_products = loaded.store_products.unwrap();
    assert_eq!(store_products.len(), 2);
    for store_product in &store_products {
        let product = store_product.product.as_ref().unwrap();
        assert_eq!(product.id, store_product.product_id);
    }

    // listings stay lean
    let page = service.get_paginated_list(None, 10, 1).await.unwrap();
    assert!(page.data[0].store_products.is_none());
}

#[tokio::test]
async fn test_get_unknown_store() {
    let ctx = test_context();
    let err = ctx.state.store_service().get(5).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidStoreId);
}

#[tokio::test]
async fn test_store_list_search() {
    let ctx = test_context();
    let service = ctx.state.store_service();
    service
        .add(store_request("Corner Shop", "1 Main Street", None))
        .await
        .unwrap();
    service
        .add(store_request(
            "MegaMart",
            "Ring Road",
            Some(StoreType::HyperMarket),
        ))
        .await
        .unwrap();

    let page = service
        .get_paginated_list(Some("hyper"), 10, 1)
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].name, "MegaMart");

    let page = service
        .get_paginated_list(Some("main street"), 10, 1)
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].name, "Corner Shop");

    let page = service.get_paginated_list(None, 10, 1).await.unwrap();
    assert_eq!(page.data[0].name, "MegaMart");
}

#[tokio::test]
async fn test_paginated_store_products_search() {
    let ctx = test_context();
    let service = ctx.state.store_service();
    let store = add_store(&ctx, "Corner Shop").await;
    let other = add_store(&ctx, "Big Shop").await;
    let milk = add_product(&ctx, "Milk", "Dairy Co").await;
    let bread = add_product(&ctx, "Bread", "Baker Bros").await;

    service
        .add_product(store.id, milk.id, listing(dec!(1.50), "4001"))
        .await
        .unwrap();
    service
        .add_product(store.id, bread.id, listing(dec!(2.25), "5001"))
        .await
        .unwrap();
    service
        .add_product(other.id, milk.id, listing(dec!(9.99), "6001"))
        .await
        .unwrap();

    let page = service
        .get_paginated_products(store.id, None, 10, 1)
        .await
        .unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].product_id, bread.id);
    assert!(page.data.iter().all(|sp| sp.product.is_some()));

    let by_name = service
        .get_paginated_products(store.id, Some("milk"), 10, 1)
        .await
        .unwrap();
    assert_eq!(by_name.data.len(), 1);
    assert_eq!(by_name.data[0].product_id, milk.id);

    let by_producer = service
        .get_paginated_products(store.id, Some("baker"), 10, 1)
        .await
        .unwrap();
    assert_eq!(by_producer.data.len(), 1);
    assert_eq!(by_producer.data[0].product_id, bread.id);

    let by_barcode = service
        .get_paginated_products(store.id, Some("500"), 10, 1)
        .await
        .unwrap();
    assert_eq!(by_barcode.data.len(), 1);
    assert_eq!(by_barcode.data[0].product_id, bread.id);

    let by_price = service
        .get_paginated_products(store.id, Some("1.5"), 10, 1)
        .await
        .unwrap();
    assert_eq!(by_price.data.len(), 1);
    assert_eq!(by_price.data[0].product_id, milk.id);
}

#[tokio::test]
async fn test_paginated_products_of_unknown_store_is_empty() {
    let ctx = test_context();
    let page = ctx
        .state
        .store_service()
        .get_paginated_products(12345, None, 10, 1)
        .await
        .unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.total, 0);

    let err = ctx
        .state
        .store_service()
        .get_paginated_products(1, None, 0, 1)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidData);
}

#[tokio::test]
async fn test_delete_store_removes_its_listings() {
    let ctx = test_context();
    let service = ctx.state.store_service();
    let store = add_store(&ctx, "Corner Shop").await;
    let milk = add_product(&ctx, "Milk", "Dairy Co").await;
    service
        .add_product(store.id, milk.id, listing(dec!(1), "1"))
        .await
        .unwrap();

    service.delete(store.id).await.unwrap();
    assert_eq!(
        service.get(store.id).await.unwrap_err().code(),
        ErrorCode::InvalidStoreId
    );
    assert_eq!(
        service.delete(store.id).await.unwrap_err().code(),
        ErrorCode::InvalidStoreId
    );

    let page = service
        .get_paginated_products(store.id, None, 10, 1)
        .await
        .unwrap();
    assert!(page.data.is_empty());

    // the product itself survives
    ctx.state.product_service().get(milk.id).await.unwrap();
}

#[tokio::test]
async fn test_delete_product_removes_listings() {
    let ctx = test_context();
    let service = ctx.state.store_service();
    let store = add_store(&ctx, "Corner Shop").await;
    let milk = add_product(&ctx, "Milk", "Dairy Co").await;
    service
        .add_product(store.id, milk.id, listing(dec!(1), "1"))
        .await
        .unwrap();

    ctx.state.product_service().delete(milk.id).await.unwrap();

    let loaded = service.get(store.id).await.unwrap();
    assert_eq!(loaded.store_products.map(|sp| sp.len()), Some(0));
}
