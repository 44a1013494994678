//! Repositories for database operations
//!
//! Each collection is reached through a trait so the services can run
//! against PostgreSQL in production and against in-memory stores in tests.

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{NewProduct, NewUser, Product, ProductChanges, User};

pub mod memory;
pub mod product;
pub mod user;

pub use memory::{InMemoryProductRepository, InMemoryUserRepository};
pub use product::PgProductRepository;
pub use user::PgUserRepository;

/// Persistence contract for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user. A taken username yields `DatabaseError::UniqueViolation`.
    async fn create(&self, new_user: NewUser) -> DatabaseResult<User>;

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>>;
}

/// Persistence contract for products
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products in creation order
    async fn list(&self) -> DatabaseResult<Vec<Product>>;

    /// Persist a new product. A taken code yields `DatabaseError::UniqueViolation`.
    async fn create(&self, input: NewProduct) -> DatabaseResult<Product>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Product>>;

    /// Apply a partial update, returning `None` when no such product exists
    async fn update(&self, id: Uuid, changes: ProductChanges) -> DatabaseResult<Option<Product>>;

    /// Remove a product, returning whether it existed
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;

    /// Products whose name contains `query`, ignoring case
    async fn search_by_name(&self, query: &str) -> DatabaseResult<Vec<Product>>;

    /// Check the backing store is reachable
    async fn health_check(&self) -> DatabaseResult<bool>;
}
