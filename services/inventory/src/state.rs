//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    auth::AuthService,
    config::AppConfig,
    error::ViewResult,
    products::ProductService,
    repositories::{ProductRepository, UserRepository},
    session::{SessionManager, SessionStore},
    views::Views,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub auth: AuthService,
    pub products: ProductService,
    pub views: Views,
}

impl AppState {
    /// Wire the services on top of the given stores and compile the views
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        session_store: Arc<dyn SessionStore>,
    ) -> ViewResult<Self> {
        let sessions = SessionManager::new(session_store, config.session_ttl_seconds);

        Ok(Self {
            auth: AuthService::new(users, sessions),
            products: ProductService::new(products),
            views: Views::new()?,
            config,
        })
    }
}
