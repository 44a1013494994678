//! Product model and related functionality

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub product_type: String,
    pub company: Option<String>,
    #[serde(rename = "expiryDate")]
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(input: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            code: input.code,
            product_type: input.product_type,
            company: input.company,
            expiry_date: input.expiry_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place
    pub fn apply_changes(&mut self, changes: ProductChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(code) = changes.code {
            self.code = code;
        }
        if let Some(product_type) = changes.product_type {
            self.product_type = product_type;
        }
        if let Some(company) = changes.company {
            self.company = company;
        }
        if let Some(expiry_date) = changes.expiry_date {
            self.expiry_date = expiry_date;
        }
        self.updated_at = Utc::now();
    }
}

/// Validated product creation payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub code: String,
    pub product_type: String,
    pub company: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

/// Validated partial update. `None` leaves a field untouched; for the
/// optional fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub code: Option<String>,
    pub product_type: Option<String>,
    pub company: Option<Option<String>>,
    pub expiry_date: Option<Option<NaiveDate>>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.code.is_none()
            && self.product_type.is_none()
            && self.company.is_none()
            && self.expiry_date.is_none()
    }
}

/// Raw product fields as submitted by the add and edit forms
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub company: Option<String>,
    #[serde(rename = "expiryDate", alias = "expiry_date")]
    pub expiry_date: Option<String>,
}

/// Query string of the search page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aspirin() -> Product {
        Product::new(NewProduct {
            name: "Aspirin".to_string(),
            code: "A100".to_string(),
            product_type: "tablet".to_string(),
            company: Some("Bayer".to_string()),
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 31),
        })
    }

    #[test]
    fn test_apply_changes_touches_only_given_fields() {
        let mut product = aspirin();
        let before = product.clone();

        product.apply_changes(ProductChanges {
            code: Some("A200".to_string()),
            company: Some(None),
            ..Default::default()
        });

        assert_eq!(product.code, "A200");
        assert_eq!(product.company, None);
        assert_eq!(product.name, before.name);
        assert_eq!(product.product_type, before.product_type);
        assert_eq!(product.expiry_date, before.expiry_date);
        assert!(product.updated_at >= before.updated_at);
    }

    #[test]
    fn test_empty_changes() {
        assert!(ProductChanges::default().is_empty());
        assert!(
            !ProductChanges {
                expiry_date: Some(None),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_product_serializes_with_form_field_names() {
        let json = serde_json::to_value(aspirin()).unwrap();
        assert_eq!(json["type"], "tablet");
        assert_eq!(json["expiryDate"], "2027-01-31");
    }
}
