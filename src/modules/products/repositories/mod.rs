mod product_repository;
