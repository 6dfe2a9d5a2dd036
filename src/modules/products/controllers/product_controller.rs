//! Product HTTP endpoints, all restricted to the ADMIN role

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;

use crate::core::{ErrorCode, ListQuery, ServiceError, ServiceFailure};
use crate::middleware::JwtAuth;
use crate::modules::products::models::{
    AddProductRequest, EditProductRequest, ProductImageResponse,
};
use crate::modules::products::services::MAX_IMAGE_SIZE;
use crate::state::AppState;

/// Multipart field carrying the upload
const IMAGE_FIELD: &str = "file";

/// List products
///
/// GET /api/product?like=&count=&limit=
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ServiceFailure> {
    let query = query.into_inner();
    let page = state
        .product_service()
        .get_paginated_list(query.like.as_deref(), query.limit, query.count)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/product/{id}
pub async fn get_product(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ServiceFailure> {
    let product = state.product_service().get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// POST /api/product
pub async fn create_product(
    state: web::Data<AppState>,
    body: web::Json<AddProductRequest>,
) -> Result<HttpResponse, ServiceFailure> {
    let product = state.product_service().add(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// PUT /api/product/{id}
pub async fn edit_product(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    body: web::Json<EditProductRequest>,
) -> Result<HttpResponse, ServiceFailure> {
    state
        .product_service()
        .edit(id.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// DELETE /api/product/{id}
pub async fn delete_product(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ServiceFailure> {
    state.product_service().delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Upload a product image
///
/// POST /api/product/{id}/image (multipart, field `file`)
pub async fn upload_image(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    payload: Multipart,
) -> Result<HttpResponse, ServiceFailure> {
    let (file_name, bytes) = read_upload(payload).await?;
    let image_path = state
        .product_service()
        .add_image(id.into_inner(), &file_name, &bytes)
        .await?;

    Ok(HttpResponse::Ok().json(ProductImageResponse { image_path }))
}

/// File name and content of the uploaded file
///
/// Reading stops one byte past the size limit so oversized uploads are not
/// buffered whole. No file part yields an empty name and no bytes.
async fn read_upload(mut payload: Multipart) -> Result<(String, Vec<u8>), ServiceFailure> {
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(String::from);
        let is_file = field.name() == Some(IMAGE_FIELD) || file_name.is_some();
        if !is_file {
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            bytes.extend_from_slice(&chunk);
            if bytes.len() > MAX_IMAGE_SIZE {
                bytes.truncate(MAX_IMAGE_SIZE + 1);
                break;
            }
        }
        return Ok((file_name.unwrap_or_default(), bytes));
    }

    Ok((String::new(), Vec::new()))
}

fn malformed(err: actix_multipart::MultipartError) -> ServiceFailure {
    ServiceFailure::new(ServiceError::with_message(
        ErrorCode::InvalidData,
        err.to_string(),
    ))
}

/// Configure product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/product")
            .wrap(JwtAuth::admin())
            .route("", web::get().to(list_products))
            .route("", web::post().to(create_product))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(edit_product))
            .route("/{id}", web::delete().to(delete_product))
            .route("/{id}/image", web::post().to(upload_image)),
    );
}
