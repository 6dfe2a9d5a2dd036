use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::text::non_blank;
use crate::core::traits::{Include, Repository, Service};
use crate::core::{AppError, ErrorCode, PageRequest, Paginated, Result, ServiceResult};
use crate::modules::products::models::{
    AddProductRequest, EditProductRequest, Product, ProductFilter,
};

/// Largest accepted image upload, in bytes
pub const MAX_IMAGE_SIZE: usize = 2_097_152;

/// Lowercase extensions accepted for product images
pub const IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".ico"];

/// Product rules: uniqueness, partial edits and image uploads
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn Repository<Product>>,
    image_dir: PathBuf,
}

impl ProductService {
    pub fn new(products: Arc<dyn Repository<Product>>, image_dir: impl Into<PathBuf>) -> Self {
        Self {
            products,
            image_dir: image_dir.into(),
        }
    }

    pub async fn add(&self, request: AddProductRequest) -> ServiceResult<Product> {
        let (Some(name), Some(producer_name)) = (
            non_blank(request.name.as_deref()),
            non_blank(request.producer_name.as_deref()),
        ) else {
            return Err(ErrorCode::InvalidData.into());
        };

        let identity = ProductFilter::Identity {
            name: name.to_string(),
            producer_name: producer_name.to_string(),
            except_id: None,
        };
        if self
            .products
            .get_first(&identity, Include::Nothing)
            .await?
            .is_some()
        {
            return Err(ErrorCode::AlreadyInserted.into());
        }

        self.products.add(Product::new(name, producer_name)).await;
        self.products.save().await?;

        let product = self
            .products
            .get_first(&identity, Include::Nothing)
            .await?
            .ok_or_else(|| AppError::internal("Inserted product could not be read back"))?;

        tracing::info!(product_id = product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Merge the non-blank fields of `request` into product `id`
    pub async fn edit(&self, id: i64, request: EditProductRequest) -> ServiceResult {
        let name = non_blank(request.name.as_deref());
        let producer_name = non_blank(request.producer_name.as_deref());
        if name.is_none() && producer_name.is_none() {
            return Err(ErrorCode::InvalidData.into());
        }

        let Some(mut product) = self.products.find(&id).await? else {
            return Err(ErrorCode::InvalidProductId.into());
        };

        if let Some(name) = name {
            product.name = name.to_string();
        }
        if let Some(producer_name) = producer_name {
            product.producer_name = producer_name.to_string();
        }

        let identity = ProductFilter::Identity {
            name: product.name.clone(),
            producer_name: product.producer_name.clone(),
            except_id: Some(id),
        };
        if self
            .products
            .get_first(&identity, Include::Nothing)
            .await?
            .is_some()
        {
            return Err(ErrorCode::AlreadyInserted.into());
        }

        product.last_change = Some(Utc::now());
        self.products.update(product).await;
        self.products.save().await?;

        tracing::info!(product_id = id, "Product updated");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> ServiceResult {
        let Some(product) = self.products.find(&id).await? else {
            return Err(ErrorCode::InvalidProductId.into());
        };

        self.products.delete(product).await;
        self.products.save().await?;

        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Store an image for product `id` and return the written path
    pub async fn add_image(&self, id: i64, file_name: &str, bytes: &[u8]) -> ServiceResult<String> {
        let Some(mut product) = self.products.find(&id).await? else {
            return Err(ErrorCode::InvalidProductId.into());
        };

        let Some(extension) = image_extension(file_name) else {
            return Err(ErrorCode::InvalidImageExtensions.into());
        };
        if bytes.is_empty() {
            return Err(ErrorCode::InvalidImage.into());
        }
        if bytes.len() > MAX_IMAGE_SIZE {
            return Err(ErrorCode::TooLargeImage.into());
        }

        let path = self
            .image_dir
            .join(format!("{}{}", Uuid::new_v4().simple(), extension));
        tokio::fs::write(&path, bytes).await.map_err(AppError::from)?;
        let image_path = path.to_string_lossy().into_owned();

        product.image_path = Some(image_path.clone());
        product.last_change = Some(Utc::now());
        self.products.update(product).await;
        if let Err(err) = self.products.save().await {
            // the row still points at the previous image
            if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %image_path, error = %remove_err, "Failed to remove orphaned image");
            }
            return Err(err.into());
        }

        tracing::info!(product_id = id, path = %image_path, size = bytes.len(), "Product image stored");
        Ok(image_path)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Product> {
        self.products
            .find(&id)
            .await?
            .ok_or_else(|| ErrorCode::InvalidProductId.into())
    }

    /// One page of products, newest first; `like` matches name or producer
    pub async fn get_paginated_list(
        &self,
        like: Option<&str>,
        limit: i64,
        count: i64,
    ) -> ServiceResult<Paginated<Product>> {
        let page = PageRequest::new(limit, count).ok_or(ErrorCode::InvalidData)?;
        let filter = non_blank(like).map(|text| ProductFilter::Search(text.to_string()));

        Ok(self
            .products
            .to_paginated(filter.as_ref(), page, Include::Nothing)
            .await?)
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }
}

#[async_trait]
impl Service for ProductService {
    async fn initialize(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.image_dir).await?;
        tracing::info!(path = %self.image_dir.display(), "Image directory ready");
        Ok(())
    }
}

/// Lowercased `.ext` of `file_name` when it is an accepted image type
fn image_extension(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name).extension()?.to_str()?;
    let extension = format!(".{}", extension.to_lowercase());
    IMAGE_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}
