mod store_service;

pub use store_service::{is_valid_barcode, is_valid_price, StoreService, MAX_BARCODE_LEN};
