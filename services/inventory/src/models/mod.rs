//! Inventory service models

pub mod product;
pub mod session;
pub mod user;

// Re-export for convenience
pub use product::{NewProduct, Product, ProductChanges, ProductForm, SearchQuery};
pub use session::Session;
pub use user::{Credentials, NewUser, User};
