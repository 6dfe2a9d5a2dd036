mod store;
mod store_product;

pub use store::{
    AddStoreRequest, EditStoreRequest, Store, StoreFilter, StoreType, UnknownStoreType,
};
pub use store_product::{AddStoreProductRequest, StoreProduct, StoreProductFilter};
