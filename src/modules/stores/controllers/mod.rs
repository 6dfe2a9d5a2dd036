pub mod store_controller;

pub use store_controller::configure;
