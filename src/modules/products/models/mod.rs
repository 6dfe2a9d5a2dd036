mod product;

pub use product::{
    AddProductRequest, EditProductRequest, Product, ProductFilter, ProductImageResponse,
};
