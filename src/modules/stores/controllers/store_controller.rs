use actix_web::{web, HttpResponse};

use crate::core::{ListQuery, ServiceFailure};
use crate::middleware::JwtAuth;
use crate::modules::stores::models::{AddStoreProductRequest, AddStoreRequest, EditStoreRequest};
use crate::state::AppState;

/// GET /api/store?like=&count=&limit=
pub async fn list_stores(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ServiceFailure> {
    let query = query.into_inner();
    let page = state
        .store_service()
        .get_paginated_list(query.like.as_deref(), query.limit, query.count)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/store/{id}, with the store's products
pub async fn get_store(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ServiceFailure> {
    let store = state.store_service().get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(store))
}

/// POST /api/store
pub async fn create_store(
    state: web::Data<AppState>,
    body: web::Json<AddStoreRequest>,
) -> Result<HttpResponse, ServiceFailure> {
    let store = state.store_service().add(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(store))
}

/// PUT /api/store/{id}
pub async fn edit_store(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    body: web::Json<EditStoreRequest>,
) -> Result<HttpResponse, ServiceFailure> {
    state
        .store_service()
        .edit(id.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// DELETE /api/store/{id}
pub async fn delete_store(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ServiceFailure> {
    state.store_service().delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

/// GET /api/store/{id}/products?like=&count=&limit=
pub async fn list_store_products(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ServiceFailure> {
    let query = query.into_inner();
    let page = state
        .store_service()
        .get_paginated_products(
            id.into_inner(),
            query.like.as_deref(),
            query.limit,
            query.count,
        )
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// POST /api/store/{id}/products/{productId}
pub async fn add_store_product(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
    body: web::Json<AddStoreProductRequest>,
) -> Result<HttpResponse, ServiceFailure> {
    let (store_id, product_id) = path.into_inner();
    let store_product = state
        .store_service()
        .add_product(store_id, product_id, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(store_product))
}

/// Configure store routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/store")
            .wrap(JwtAuth::admin())
            .route("", web::get().to(list_stores))
            .route("", web::post().to(create_store))
            .route("/{id}", web::get().to(get_store))
            .route("/{id}", web::put().to(edit_store))
            .route("/{id}", web::delete().to(delete_store))
            .route("/{id}/products", web::get().to(list_store_products))
            .route(
                "/{id}/products/{product_id}",
                web::post().to(add_store_product),
            ),
    );
}
