use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::core::text::non_blank;
use crate::core::traits::{Include, Repository};
use crate::core::{AppError, ErrorCode, PageRequest, Paginated, ServiceResult};
use crate::modules::products::services::ProductService;
use crate::modules::stores::models::{
    AddStoreProductRequest, AddStoreRequest, EditStoreRequest, Store, StoreFilter, StoreProduct,
    StoreProductFilter,
};

/// Widest barcode the store_products table holds
pub const MAX_BARCODE_LEN: usize = 64;

/// Decimal places the store_products price column keeps
pub const PRICE_SCALE: u32 = 2;

/// A barcode is one to [`MAX_BARCODE_LEN`] ASCII digits
pub fn is_valid_barcode(barcode: &str) -> bool {
    !barcode.is_empty()
        && barcode.len() <= MAX_BARCODE_LEN
        && barcode.bytes().all(|b| b.is_ascii_digit())
}

/// Integer digits the store_products price column keeps
pub const PRICE_INTEGER_DIGITS: u32 = 16;

/// A price is positive and fits DECIMAL(18,2) without rounding
pub fn is_valid_price(price: Decimal) -> bool {
    let limit = Decimal::from(10i64.pow(PRICE_INTEGER_DIGITS));
    price > Decimal::ZERO && price < limit && price.normalize().scale() <= PRICE_SCALE
}

/// Store rules and the store/product association
pub struct StoreService {
    stores: Arc<dyn Repository<Store>>,
    store_products: Arc<dyn Repository<StoreProduct>>,
    product_service: ProductService,
}

impl StoreService {
    pub fn new(
        stores: Arc<dyn Repository<Store>>,
        store_products: Arc<dyn Repository<StoreProduct>>,
        product_service: ProductService,
    ) -> Self {
        Self {
            stores,
            store_products,
            product_service,
        }
    }

    pub async fn add(&self, request: AddStoreRequest) -> ServiceResult<Store> {
        let (Some(name), Some(address)) = (
            non_blank(request.name.as_deref()),
            non_blank(request.address.as_deref()),
        ) else {
            return Err(ErrorCode::InvalidData.into());
        };
        let store_type = request.store_type.unwrap_or_default();

        let identity = StoreFilter::Identity {
            name: name.to_string(),
            address: address.to_string(),
            store_type,
            except_id: None,
        };
        if self
            .stores
            .get_first(&identity, Include::Nothing)
            .await?
            .is_some()
        {
            return Err(ErrorCode::AlreadyInserted.into());
        }

        self.stores.add(Store::new(name, address, store_type)).await;
        self.stores.save().await?;

        let store = self
            .stores
            .get_first(&identity, Include::Nothing)
            .await?
            .ok_or_else(|| AppError::internal("Inserted store could not be read back"))?;

        tracing::info!(store_id = store.id, name = %store.name, store_type = %store.store_type, "Store created");
        Ok(store)
    }

    pub async fn edit(&self, id: i64, request: EditStoreRequest) -> ServiceResult {
        let name = non_blank(request.name.as_deref());
        let address = non_blank(request.address.as_deref());
        if name.is_none() && address.is_none() && request.store_type.is_none() {
            return Err(ErrorCode::InvalidData.into());
        }

        let Some(mut store) = self.stores.find(&id).await? else {
            return Err(ErrorCode::InvalidStoreId.into());
        };

        if let Some(name) = name {
            store.name = name.to_string();
        }
        if let Some(address) = address {
            store.address = address.to_string();
        }
        if let Some(store_type) = request.store_type {
            store.store_type = store_type;
        }

        let identity = StoreFilter::Identity {
            name: store.name.clone(),
            address: store.address.clone(),
            store_type: store.store_type,
            except_id: Some(id),
        };
        if self
            .stores
            .get_first(&identity, Include::Nothing)
            .await?
            .is_some()
        {
            return Err(ErrorCode::AlreadyInserted.into());
        }

        store.last_change = Some(Utc::now());
        self.stores.update(store).await;
        self.stores.save().await?;

        tracing::info!(store_id = id, "Store updated");
        Ok(())
    }

    /// Hard delete; the store's associations go with it
    pub async fn delete(&self, id: i64) -> ServiceResult {
        let Some(store) = self.stores.find(&id).await? else {
            return Err(ErrorCode::InvalidStoreId.into());
        };

        self.stores.delete(store).await;
        self.stores.save().await?;

        tracing::info!(store_id = id, "Store deleted");
        Ok(())
    }

    /// List product `product_id` in store `store_id`
    ///
    /// Product lookup failures are returned exactly as the product service
    /// reports them.
    pub async fn add_product(
        &self,
        store_id: i64,
        product_id: i64,
        request: AddStoreProductRequest,
    ) -> ServiceResult<StoreProduct> {
        let barcode = request.barcode.unwrap_or_default();
        if !is_valid_price(request.price) || !is_valid_barcode(&barcode) {
            return Err(ErrorCode::InvalidData.into());
        }

        let Some(store) = self.stores.find(&store_id).await? else {
            return Err(ErrorCode::InvalidStoreId.into());
        };
        let product = self.product_service.get(product_id).await?;

        let pair = StoreProductFilter::Pair {
            store_id: store.id,
            product_id: product.id,
        };
        if self
            .store_products
            .get_first(&pair, Include::Nothing)
            .await?
            .is_some()
        {
            return Err(ErrorCode::ProductIsAlreadyInStore.into());
        }

        self.store_products
            .add(StoreProduct::new(store.id, product.id, request.price, barcode))
            .await;
        self.store_products.save().await?;

        let store_product = self
            .store_products
            .find(&(store.id, product.id))
            .await?
            .ok_or_else(|| AppError::internal("Inserted store product could not be read back"))?;

        tracing::info!(
            store_id = store.id,
            product_id = product.id,
            price = %store_product.price,
            "Product added to store"
        );
        Ok(store_product)
    }

    /// Store `id` with its associations loaded
    pub async fn get(&self, id: i64) -> ServiceResult<Store> {
        self.stores
            .get_first(&StoreFilter::Id(id), Include::Relations)
            .await?
            .ok_or_else(|| ErrorCode::InvalidStoreId.into())
    }

    /// One page of stores; `like` matches name, address or type name
    pub async fn get_paginated_list(
        &self,
        like: Option<&str>,
        limit: i64,
        count: i64,
    ) -> ServiceResult<Paginated<Store>> {
        let page = PageRequest::new(limit, count).ok_or(ErrorCode::InvalidData)?;
        let filter = non_blank(like).map(|text| StoreFilter::Search(text.to_string()));

        Ok(self
            .stores
            .to_paginated(filter.as_ref(), page, Include::Nothing)
            .await?)
    }

    /// One page of what store `store_id` sells, each row with its product
    ///
    /// An unknown store yields an empty page rather than an error.
    pub async fn get_paginated_products(
        &self,
        store_id: i64,
        like: Option<&str>,
        limit: i64,
        count: i64,
    ) -> ServiceResult<Paginated<StoreProduct>> {
        let page = PageRequest::new(limit, count).ok_or(ErrorCode::InvalidData)?;
        let filter = StoreProductFilter::InStore {
            store_id,
            search: non_blank(like).map(String::from),
        };

        Ok(self
            .store_products
            .to_paginated(Some(&filter), page, Include::Relations)
            .await?)
    }
}
