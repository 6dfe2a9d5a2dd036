use std::path::PathBuf;
use std::sync::Arc;

use crate::config::JwtConfig;
use crate::core::traits::RepositoryFactory;
use crate::modules::auth::services::AuthService;
use crate::modules::products::services::ProductService;
use crate::modules::stores::services::StoreService;

/// Shared application state
///
/// Services are built per request so each one stages changes on its own
/// repositories.
#[derive(Clone)]
pub struct AppState {
    pub repositories: Arc<dyn RepositoryFactory>,
    pub jwt: JwtConfig,
    pub image_dir: PathBuf,
}

impl AppState {
    pub fn new(
        repositories: Arc<dyn RepositoryFactory>,
        jwt: JwtConfig,
        image_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            repositories,
            jwt,
            image_dir: image_dir.into(),
        }
    }

    pub fn product_service(&self) -> ProductService {
        ProductService::new(self.repositories.products(), self.image_dir.clone())
    }

    pub fn store_service(&self) -> StoreService {
        StoreService::new(
            self.repositories.stores(),
            self.repositories.store_products(),
            self.product_service(),
        )
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.repositories.users(), self.jwt.clone())
    }
}
