// Contract tests for /api/product
//
// Every route requires a bearer token carrying the ADMIN role; domain
// failures come back as 400 with an `errors` array of codes.

#[macro_use]
#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test};
use helpers::{admin_token, bearer, multipart_file, test_context, token_for};
use serde_json::{json, Value};
use storage_api::core::Paginated;
use storage_api::products::models::ProductImageResponse;
use storage_api::products::services::MAX_IMAGE_SIZE;
use storage_api::products::Product;

#[actix_web::test]
async fn test_requires_bearer_token() {
    let ctx = test_context();
    let app = init_app!(ctx.state);

    let req = test::TestRequest::get().uri("/api/product").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/product")
        .insert_header(("Authorization", "Basic YWRtaW46YWRtaW4="))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/product")
        .insert_header(bearer("not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_requires_admin_role() {
    let ctx = test_context();
    let app = init_app!(ctx.state);

    for role in [None, Some("USER")] {
        let token = token_for(&ctx.state, role);
        let req = test::TestRequest::get()
            .uri("/api/product")
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"], json!(["FORBIDDEN"]));
    }
}

#[actix_web::test]
async fn test_token_from_other_key_rejected() {
    let ctx = test_context();
    let app = init_app!(ctx.state);

    let mut foreign = ctx.state.clone();
    foreign.jwt = storage_api::config::JwtConfig::new("another-signing-key-0123456789abcdef");
    let token = admin_token(&foreign);

    let req = test::TestRequest::get()
        .uri("/api/product")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_product_lifecycle() {
    let ctx = test_context();
    let app = init_app!(ctx.state);
    let token = admin_token(&ctx.state);

    let req = test::TestRequest::post()
        .uri("/api/product")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "Milk", "producerName": "Dairy Co" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["name"], "Milk");
    assert_eq!(created["producerName"], "Dairy Co");
    assert!(created["insertDate"].is_string());
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/product/{}", id))
        .insert_header(bearer(&token))
        .set_json(json!({ "producerName": "Farm Fresh" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/product/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let product: Product = test::call_and_read_body_json(&app, req).await;
    assert_eq!(product.name, "Milk");
    assert_eq!(product.producer_name, "Farm Fresh");
    assert!(product.last_change.is_some());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/product/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/product/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "errors": ["INVALID_PRODUCT_ID"] }));
}

#[actix_web::test]
async fn test_create_conflicts_and_validation() {
    let ctx = test_context();
    let app = init_app!(ctx.state);
    let token = admin_token(&ctx.state);

    let create = |body: Value| {
        test::TestRequest::post()
            .uri("/api/product")
            .insert_header(bearer(&token))
            .set_json(body)
            .to_request()
    };

    let milk = json!({ "name": "Milk", "producerName": "Dairy Co" });
    let resp = test::call_service(&app, create(milk.clone())).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, create(milk)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "errors": ["ALREADY_INSERTED"] }));

    let resp = test::call_service(&app, create(json!({ "name": "Bread" }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "errors": ["INVALID_DATA"] }));
}

#[actix_web::test]
async fn test_list_products() {
    let ctx = test_context();
    let app = init_app!(ctx.state);
    let token = admin_token(&ctx.state);
    let service = ctx.state.product_service();
    for (name, producer) in [
        ("Milk", "Dairy Co"),
        ("Bread", "Baker Bros"),
        ("Cream", "Dairy Co"),
    ] {
        service
            .add(storage_api::products::models::AddProductRequest {
                name: Some(name.to_string()),
                producer_name: Some(producer.to_string()),
            })
            .await
            .unwrap();
    }

    let req = test::TestRequest::get()
        .uri("/api/product")
        .insert_header(bearer(&token))
        .to_request();
    let page: Paginated<Product> = test::call_and_read_body_json(&app, req).await;
    assert_eq!((page.count, page.limit, page.total), (1, 10, 1));
    assert_eq!(page.data.len(), 3);
    assert_eq!(page.data[0].name, "Cream");

    let req = test::TestRequest::get()
        .uri("/api/product?like=dairy&limit=1&count=2")
        .insert_header(bearer(&token))
        .to_request();
    let page: Paginated<Product> = test::call_and_read_body_json(&app, req).await;
    assert_eq!((page.count, page.limit, page.total), (2, 1, 3));
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].name, "Milk");

    let req = test::TestRequest::get()
        .uri("/api/product?limit=0")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/product?limit=ten")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"], json!(["INVALID_DATA"]));
}

#[actix_web::test]
async fn test_non_numeric_id_is_invalid_data() {
    let ctx = test_context();
    let app = init_app!(ctx.state);
    let token = admin_token(&ctx.state);

    let req = test::TestRequest::get()
        .uri("/api/product/abc")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"], json!(["INVALID_DATA"]));
}

#[actix_web::test]
async fn test_image_upload() {
    let ctx = test_context();
    let app = init_app!(ctx.state);
    let token = admin_token(&ctx.state);
    let product = ctx
        .state
        .product_service()
        .add(storage_api::products::models::AddProductRequest {
            name: Some("Milk".to_string()),
            producer_name: Some("Dairy Co".to_string()),
        })
        .await
        .unwrap();

    let (content_type, body) = multipart_file("file", "milk.jpg", &[0xFF, 0xD8, 0xFF, 0xE0]);
    let req = test::TestRequest::post()
        .uri(&format!("/api/product/{}/image", product.id))
        .insert_header(bearer(&token))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let uploaded: ProductImageResponse = test::read_body_json(resp).await;
    assert!(uploaded.image_path.ends_with(".jpg"));
    let stored = tokio::fs::read(&uploaded.image_path).await.unwrap();
    assert_eq!(stored, vec![0xFF, 0xD8, 0xFF, 0xE0]);
}

#[actix_web::test]
async fn test_image_upload_failures() {
    let ctx = test_context();
    let app = init_app!(ctx.state);
    let token = admin_token(&ctx.state);
    let product = ctx
        .state
        .product_service()
        .add(storage_api::products::models::AddProductRequest {
            name: Some("Milk".to_string()),
            producer_name: Some("Dairy Co".to_string()),
        })
        .await
        .unwrap();

    let oversized = vec![0u8; MAX_IMAGE_SIZE + 10];
    let cases: Vec<(i64, &str, &[u8], &str)> = vec![
        (product.id + 1, "milk.jpg", &b"data"[..], "INVALID_PRODUCT_ID"),
        (product.id, "milk.gif", &b"data"[..], "INVALID_IMAGE_EXTENSIONS"),
        (product.id, "milk.jpg", &b""[..], "INVALID_IMAGE"),
        (product.id, "milk.ico", &oversized[..], "TOO_LARGE_IMAGE"),
    ];

    for (id, file_name, content, code) in cases {
        let (content_type, body) = multipart_file("file", file_name, content);
        let req = test::TestRequest::post()
            .uri(&format!("/api/product/{}/image", id))
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", code);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "errors": [code] }));
    }
}
