//! Product catalogue operations

use common::error::DatabaseError;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{ProductError, ProductResult},
    models::{Product, ProductForm},
    repositories::ProductRepository,
    validation::{validate_new_product, validate_product_changes},
};

/// Service layer for product business logic
#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

fn duplicate_code_or(err: DatabaseError, code: Option<&str>) -> ProductError {
    match code {
        Some(code) if err.is_unique_violation() => ProductError::DuplicateCode(code.to_string()),
        _ => ProductError::Database(err),
    }
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// All products in creation order
    pub async fn list(&self) -> ProductResult<Vec<Product>> {
        Ok(self.repository.list().await?)
    }

    /// Validate and persist a new product
    pub async fn create(&self, form: &ProductForm) -> ProductResult<Product> {
        let input = validate_new_product(form).map_err(ProductError::Validation)?;
        let code = input.code.clone();

        self.repository
            .create(input)
            .await
            .map_err(|e| duplicate_code_or(e, Some(&code)))
    }

    /// Get a product by ID
    pub async fn get_by_id(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Apply the fields present in `form` to an existing product
    pub async fn update(&self, id: Uuid, form: &ProductForm) -> ProductResult<Product> {
        let changes = validate_product_changes(form).map_err(ProductError::Validation)?;
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let code = changes.code.clone();
        self.repository
            .update(id, changes)
            .await
            .map_err(|e| duplicate_code_or(e, code.as_deref()))?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Delete a product; deleting a missing product is a no-op
    pub async fn delete(&self, id: Uuid) -> ProductResult<()> {
        self.repository.delete(id).await?;
        Ok(())
    }

    /// Case-insensitive substring search on the product name
    pub async fn search_by_name(&self, query: &str) -> ProductResult<Vec<Product>> {
        Ok(self.repository.search_by_name(query).await?)
    }

    pub async fn health_check(&self) -> ProductResult<bool> {
        Ok(self.repository.health_check().await?)
    }
}
