//! Inventory management web service
//!
//! Session-based registration and login in front of CRUD and name search
//! over a product catalogue.
//!
//! ```text
//! request ─▶ session gate ─▶ auth / product services ─▶ repositories ─▶ PostgreSQL
//!                 │
//!                 └──────────▶ session manager ─────────────────────────▶ Redis
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod products;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;
pub mod views;

pub use routes::create_router;
pub use state::AppState;
