mod product_service;

pub use product_service::{ProductService, IMAGE_EXTENSIONS, MAX_IMAGE_SIZE};
