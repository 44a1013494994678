//! HTML views
//!
//! Pages are Handlebars templates compiled into the binary. Handlebars
//! escapes every `{{value}}` it writes, so user-supplied text never reaches
//! the page as markup.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::{
    error::{ViewError, ViewResult},
    models::Product,
};

const LAYOUT: &str = include_str!("../templates/layout.hbs");
const ERROR_BANNER: &str = include_str!("../templates/error_banner.hbs");
const CREDENTIALS: &str = include_str!("../templates/credentials.hbs");
const PRODUCTS: &str = include_str!("../templates/products.hbs");
const PRODUCT_FORM: &str = include_str!("../templates/product_form.hbs");
const ERROR: &str = include_str!("../templates/error.hbs");

/// Respond with `page` under `status`, or a plain 500 if it failed to render
pub fn page_response(status: StatusCode, page: ViewResult<Html<String>>) -> Response {
    match page {
        Ok(html) => (status, html).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Serialize)]
struct CredentialsContext<'a> {
    title: &'a str,
    action: &'a str,
    submit: &'a str,
    link_href: &'a str,
    link_text: &'a str,
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct ProductsContext<'a> {
    title: &'a str,
    products: &'a [Product],
    query: Option<&'a str>,
}

#[derive(Serialize)]
struct ProductFormContext<'a> {
    title: &'a str,
    action: String,
    submit: &'a str,
    product: Option<&'a Product>,
}

#[derive(Serialize)]
struct ErrorContext<'a> {
    title: &'a str,
    error: &'a str,
}

/// Registry of every page template
#[derive(Clone)]
pub struct Views {
    handlebars: Arc<Handlebars<'static>>,
}

impl Views {
    /// Compile the partials and page templates
    pub fn new() -> ViewResult<Self> {
        let mut handlebars = Handlebars::new();

        for (name, source) in [("layout", LAYOUT), ("error_banner", ERROR_BANNER)] {
            handlebars
                .register_partial(name, source)
                .map_err(|e| ViewError::Template(format!("Failed to register {}: {}", name, e)))?;
        }

        for (name, source) in [
            ("credentials", CREDENTIALS),
            ("products", PRODUCTS),
            ("product_form", PRODUCT_FORM),
            ("error", ERROR),
        ] {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| ViewError::Template(format!("Failed to register {}: {}", name, e)))?;
        }

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    fn render<T: Serialize>(&self, template: &str, data: &T) -> ViewResult<Html<String>> {
        debug!(template, "Rendering page");
        self.handlebars
            .render(template, data)
            .map(Html)
            .map_err(|e| ViewError::Render(e.to_string()))
    }

    pub fn register_page(&self, error: Option<&str>) -> ViewResult<Html<String>> {
        self.render(
            "credentials",
            &CredentialsContext {
                title: "Register",
                action: "/register",
                submit: "Register",
                link_href: "/login",
                link_text: "Already registered? Log in",
                error,
            },
        )
    }

    pub fn login_page(&self, error: Option<&str>) -> ViewResult<Html<String>> {
        self.render(
            "credentials",
            &CredentialsContext {
                title: "Login",
                action: "/login",
                submit: "Log in",
                link_href: "/register",
                link_text: "Create an account",
                error,
            },
        )
    }

    /// Product listing, used for both the full list and search results
    pub fn products_page(
        &self,
        title: &str,
        products: &[Product],
        query: Option<&str>,
    ) -> ViewResult<Html<String>> {
        self.render(
            "products",
            &ProductsContext {
                title,
                products,
                query,
            },
        )
    }

    pub fn add_product_page(&self) -> ViewResult<Html<String>> {
        self.render(
            "product_form",
            &ProductFormContext {
                title: "Add Product",
                action: "/products".to_string(),
                submit: "Add",
                product: None,
            },
        )
    }

    pub fn edit_product_page(&self, product: &Product) -> ViewResult<Html<String>> {
        self.render(
            "product_form",
            &ProductFormContext {
                title: "Edit Product",
                action: format!("/products/edit/{}", product.id),
                submit: "Save",
                product: Some(product),
            },
        )
    }

    pub fn error_page(&self, status: StatusCode, message: &str) -> ViewResult<Html<String>> {
        self.render(
            "error",
            &ErrorContext {
                title: status.canonical_reason().unwrap_or("Error"),
                error: message,
            },
        )
    }
}
