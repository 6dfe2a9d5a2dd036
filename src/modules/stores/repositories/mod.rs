mod store_product_repository;
mod store_repository;
