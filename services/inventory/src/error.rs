//! Custom error types for the inventory service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use thiserror::Error;
use tracing::error;

/// Errors raised by registration, login and logout
#[derive(Error, Debug)]
pub enum AuthError {
    /// The username is already taken
    #[error("User {0} is already registered")]
    DuplicateUser(String),

    /// No user with this username
    #[error("User {0} not found")]
    UserNotFound(String),

    /// The password does not match the stored hash
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A required field is missing
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Hashing or hash parsing failed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Database error
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Session store error
    #[error(transparent)]
    Session(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DuplicateUser(_) => StatusCode::CONFLICT,
            AuthError::UserNotFound(_) | AuthError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::PasswordHash(_) | AuthError::Database(_) | AuthError::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown on the form, or `None` for internal failures
    pub fn user_message(&self) -> Option<String> {
        match self {
            AuthError::DuplicateUser(_) => Some("This user is already registered!".to_string()),
            AuthError::UserNotFound(_) => {
                Some("User not found, please register first!".to_string())
            }
            AuthError::InvalidCredentials => Some("Incorrect password!".to_string()),
            AuthError::Validation(msg) => Some(msg.clone()),
            AuthError::PasswordHash(_) | AuthError::Database(_) | AuthError::Session(_) => None,
        }
    }
}

/// Type alias for auth results
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised by product operations
#[derive(Error, Debug)]
pub enum ProductError {
    /// Another product already uses this code
    #[error("Product with code {0} already exists")]
    DuplicateCode(String),

    /// A required field is missing or malformed
    #[error("Invalid input: {0}")]
    Validation(String),

    /// No product with this identifier
    #[error("Product {0} not found")]
    NotFound(String),

    /// Database error
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Type alias for product results
pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    /// Status for domain failures; store failures are reported by the route
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProductError::DuplicateCode(_) | ProductError::Validation(_) => StatusCode::BAD_REQUEST,
            ProductError::NotFound(_) => StatusCode::NOT_FOUND,
            ProductError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown on the error page, or `None` for internal failures
    pub fn user_message(&self) -> Option<String> {
        match self {
            ProductError::DuplicateCode(_) => {
                Some("Product with this code already exists.".to_string())
            }
            ProductError::Validation(msg) => Some(msg.clone()),
            ProductError::NotFound(_) => Some("Product not found".to_string()),
            ProductError::Database(_) => None,
        }
    }
}

/// Errors raised while compiling or rendering page templates
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("Render error: {0}")]
    Render(String),
}

/// Type alias for view results
pub type ViewResult<T> = Result<T, ViewError>;

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        error!("Failed to render page: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}
