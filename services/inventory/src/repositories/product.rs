//! PostgreSQL product repository

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::ProductRepository;
use crate::{
    models::{NewProduct, Product, ProductChanges},
    validation::like_pattern,
};

/// Product repository backed by the `products` table
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> DatabaseResult<Vec<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, code, type, company, expiry_date, created_at, updated_at
            FROM products
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::classify)
    }

    async fn create(&self, input: NewProduct) -> DatabaseResult<Product> {
        let product = Product::new(input);

        let created = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, code, type, company, expiry_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, code, type, company, expiry_date, created_at, updated_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.code)
        .bind(&product.product_type)
        .bind(&product.company)
        .bind(product.expiry_date)
        .bind(product.created_at)
        .bind(product.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        info!(product_id = %created.id, code = %created.code, "Created product");
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, code, type, company, expiry_date, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::classify)
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> DatabaseResult<Option<Product>> {
        let set_company = changes.company.is_some();
        let set_expiry_date = changes.expiry_date.is_some();

        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                code = COALESCE($3, code),
                type = COALESCE($4, type),
                company = CASE WHEN $5 THEN $6 ELSE company END,
                expiry_date = CASE WHEN $7 THEN $8 ELSE expiry_date END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, code, type, company, expiry_date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.code)
        .bind(changes.product_type)
        .bind(set_company)
        .bind(changes.company.flatten())
        .bind(set_expiry_date)
        .bind(changes.expiry_date.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::classify)?;

        if updated.is_some() {
            info!(product_id = %id, "Updated product");
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::classify)?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(product_id = %id, "Deleted product");
        }
        Ok(deleted)
    }

    async fn search_by_name(&self, query: &str) -> DatabaseResult<Vec<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, code, type, company, expiry_date, created_at, updated_at
            FROM products
            WHERE name ILIKE $1 ESCAPE '\'
            ORDER BY created_at, id
            "#,
        )
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::classify)
    }

    async fn health_check(&self) -> DatabaseResult<bool> {
        common::database::health_check(&self.pool).await
    }
}
