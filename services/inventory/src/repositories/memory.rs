//! In-memory repositories for development and testing
//!
//! These mirror the constraints of the PostgreSQL schema: unique usernames,
//! unique product codes, and creation-ordered listings.

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ProductRepository, UserRepository};
use crate::{
    models::{NewProduct, NewUser, Product, ProductChanges, User},
    validation::name_matcher,
};

/// In-memory implementation of [`UserRepository`]
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> DatabaseResult<User> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == new_user.username) {
            return Err(DatabaseError::UniqueViolation {
                constraint: "users_username_key".to_string(),
            });
        }

        let user = User::new(new_user);
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}

/// In-memory implementation of [`ProductRepository`]
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn code_taken() -> DatabaseError {
    DatabaseError::UniqueViolation {
        constraint: "products_code_key".to_string(),
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self) -> DatabaseResult<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn create(&self, input: NewProduct) -> DatabaseResult<Product> {
        let mut products = self.products.write().await;

        if products.iter().any(|p| p.code == input.code) {
            return Err(code_taken());
        }

        let product = Product::new(input);
        products.push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> DatabaseResult<Option<Product>> {
        let mut products = self.products.write().await;

        let Some(index) = products.iter().position(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(code) = &changes.code {
            if products.iter().any(|p| p.id != id && &p.code == code) {
                return Err(code_taken());
            }
        }

        let product = &mut products[index];
        product.apply_changes(changes);
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }

    async fn search_by_name(&self, query: &str) -> DatabaseResult<Vec<Product>> {
        let matcher = name_matcher(query).map_err(DatabaseError::Configuration)?;
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| matcher.is_match(&p.name))
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> DatabaseResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(name: &str, code: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            code: code.to_string(),
            product_type: "tablet".to_string(),
            company: None,
            expiry_date: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_unique_violation() {
        let repo = InMemoryUserRepository::new();
        let new_user = NewUser {
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
        };

        let user = repo.create(new_user.clone()).await.unwrap();
        let err = repo.create(new_user).await.unwrap_err();
        assert!(err.is_unique_violation());

        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_products_listed_in_creation_order() {
        let repo = InMemoryProductRepository::new();
        for (name, code) in [("Zinc", "Z1"), ("Aspirin", "A1"), ("Mint", "M1")] {
            repo.create(new_product(name, code)).await.unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Zinc", "Aspirin", "Mint"]);
    }

    #[tokio::test]
    async fn test_update_to_taken_code_is_rejected() {
        let repo = InMemoryProductRepository::new();
        repo.create(new_product("Aspirin", "A100")).await.unwrap();
        let other = repo.create(new_product("Ibuprofen", "I100")).await.unwrap();

        let changes = ProductChanges {
            code: Some("A100".to_string()),
            ..Default::default()
        };
        let err = repo.update(other.id, changes).await.unwrap_err();
        assert!(err.is_unique_violation());

        // keeping its own code is not a conflict
        let changes = ProductChanges {
            code: Some("I100".to_string()),
            ..Default::default()
        };
        assert!(repo.update(other.id, changes).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_product() {
        let repo = InMemoryProductRepository::new();
        let id = Uuid::new_v4();

        assert!(repo.update(id, ProductChanges::default()).await.unwrap().is_none());
        assert!(!repo.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_product_with_taken_code() {
        let repo = InMemoryProductRepository::new();
        repo.create(new_product("Aspirin", "A100")).await.unwrap();

        let changes = ProductChanges {
            code: Some("A100".to_string()),
            ..Default::default()
        };
        assert!(repo.update(Uuid::new_v4(), changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_matches_pattern_characters_literally() {
        let repo = InMemoryProductRepository::new();
        repo.create(new_product("Vitamin C (500mg)", "V1")).await.unwrap();
        repo.create(new_product("Vitamin D", "V2")).await.unwrap();

        let found = repo.search_by_name("c (500").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "V1");

        assert!(repo.search_by_name(".*").await.unwrap().is_empty());
    }
}
