pub mod repository;
pub mod service;

pub use repository::{Entity, Include, Repository, RepositoryFactory, Specification, StagedChange};
pub use service::Service;
