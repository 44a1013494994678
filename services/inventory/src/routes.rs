//! Inventory service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    middleware,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::{TypedHeader, headers::Cookie};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{AuthError, ProductError, ViewResult},
    extract::FormOrJson,
    middleware::{CurrentUser, clear_session_cookie, require_session, session_cookie, session_id},
    models::{Credentials, ProductForm, SearchQuery},
    state::AppState,
    views::{self, Views},
};

/// Create the router for the inventory service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/add", get(add_product_form))
        .route("/products/search", get(search_products))
        .route(
            "/products/edit/:id",
            get(edit_product_form).post(update_product),
        )
        .route("/products/delete/:id", post(delete_product))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.products.health_check().await.unwrap_or_else(|e| {
        error!("Database health check failed: {}", e);
        false
    });
    let sessions = state.auth.sessions().health_check().await.unwrap_or_else(|e| {
        error!("Session store health check failed: {}", e);
        false
    });

    let status = if database && sessions {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ok" } else { "degraded" },
            "service": "inventory",
            "database": database,
            "sessions": sessions,
        })),
    )
}

async fn index() -> Redirect {
    Redirect::to("/products")
}

/// Render an auth failure on the form it came from
fn auth_failure(
    views: &Views,
    err: AuthError,
    fallback: &str,
    page: fn(&Views, Option<&str>) -> ViewResult<Html<String>>,
) -> Response {
    let message = err.user_message().unwrap_or_else(|| {
        error!("{}: {}", fallback, err);
        fallback.to_string()
    });
    views::page_response(err.status_code(), page(views, Some(&message)))
}

pub async fn register_form(State(state): State<AppState>) -> impl IntoResponse {
    state.views.register_page(None)
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    FormOrJson(credentials): FormOrJson<Credentials>,
) -> Response {
    match state.auth.register(&credentials).await {
        Ok(user) => {
            info!(user_id = %user.id, "Registered user {}", user.username);
            Redirect::to("/login").into_response()
        }
        Err(e) => auth_failure(
            &state.views,
            e,
            "An error occurred during registration, please try again",
            Views::register_page,
        ),
    }
}

pub async fn login_form(State(state): State<AppState>) -> impl IntoResponse {
    state.views.login_page(None)
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    cookies: Option<TypedHeader<Cookie>>,
    FormOrJson(credentials): FormOrJson<Credentials>,
) -> Response {
    let previous = session_id(cookies.as_deref(), &state.config.session_cookie);

    let session = match state.auth.login(&credentials, previous.as_deref()).await {
        Ok(session) => session,
        Err(e) => {
            return auth_failure(
                &state.views,
                e,
                "An error occurred during login",
                Views::login_page,
            );
        }
    };

    match session_cookie(&state.config, &session.id) {
        Ok(cookie) => (
            AppendHeaders([(header::SET_COOKIE, cookie)]),
            Redirect::to("/products"),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to build session cookie: {}", e);
            if let Err(e) = state.auth.logout(Some(&session.id)).await {
                error!("Failed to destroy session: {}", e);
            }
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            views::page_response(
                status,
                state.views.login_page(Some("An error occurred during login")),
            )
        }
    }
}

/// Logout endpoint
pub async fn logout(
    State(state): State<AppState>,
    cookies: Option<TypedHeader<Cookie>>,
) -> Response {
    let current = session_id(cookies.as_deref(), &state.config.session_cookie);

    if let Err(e) = state.auth.logout(current.as_deref()).await {
        error!("Failed to destroy session: {}", e);
    }

    match clear_session_cookie(&state.config) {
        Ok(cookie) => (
            AppendHeaders([(header::SET_COOKIE, cookie)]),
            Redirect::to("/login"),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to build session cookie: {}", e);
            Redirect::to("/login").into_response()
        }
    }
}

/// Render a product failure. `store_status` is what this route answers when
/// the store itself fails: 400 for mutations and search, 500 for pages that
/// only read.
fn product_failure(views: &Views, err: ProductError, store_status: StatusCode) -> Response {
    let status = match &err {
        ProductError::Database(_) => store_status,
        _ => err.status_code(),
    };
    let message = err.user_message().unwrap_or_else(|| {
        error!("Product store error: {}", err);
        "An error occurred, please try again".to_string()
    });
    views::page_response(status, views.error_page(status, &message))
}

/// Identifiers that are not UUIDs cannot name a stored product
fn parse_product_id(raw: &str) -> Result<Uuid, ProductError> {
    Uuid::parse_str(raw).map_err(|_| ProductError::NotFound(raw.to_string()))
}

/// List all products
pub async fn list_products(State(state): State<AppState>) -> Response {
    match state.products.list().await {
        Ok(products) => state
            .views
            .products_page("Products", &products, None)
            .into_response(),
        Err(e) => product_failure(&state.views, e, StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub async fn add_product_form(State(state): State<AppState>) -> impl IntoResponse {
    state.views.add_product_page()
}

/// Create a new product
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    FormOrJson(form): FormOrJson<ProductForm>,
) -> Response {
    match state.products.create(&form).await {
        Ok(product) => {
            info!(product_id = %product.id, user_id = %user.user_id, "Product added");
            Redirect::to("/products").into_response()
        }
        Err(e) => product_failure(&state.views, e, StatusCode::BAD_REQUEST),
    }
}

/// Show the edit form of a product
pub async fn edit_product_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let product = match parse_product_id(&id) {
        Ok(id) => state.products.get_by_id(id).await,
        Err(e) => Err(e),
    };

    match product {
        Ok(product) => state.views.edit_product_page(&product).into_response(),
        Err(e) => product_failure(&state.views, e, StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Update a product by ID
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    FormOrJson(form): FormOrJson<ProductForm>,
) -> Response {
    let updated = match parse_product_id(&id) {
        Ok(id) => state.products.update(id, &form).await,
        Err(e) => Err(e),
    };

    match updated {
        Ok(product) => {
            info!(product_id = %product.id, user_id = %user.user_id, "Product edited");
            Redirect::to("/products").into_response()
        }
        Err(e) => product_failure(&state.views, e, StatusCode::BAD_REQUEST),
    }
}

/// Delete a product by ID
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Response {
    // nothing can be stored under a malformed id, so there is nothing to delete
    if let Ok(id) = Uuid::parse_str(&id) {
        if let Err(e) = state.products.delete(id).await {
            return product_failure(&state.views, e, StatusCode::BAD_REQUEST);
        }
        info!(product_id = %id, user_id = %user.user_id, "Product deleted");
    }
    Redirect::to("/products").into_response()
}

/// Search products by name
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let name = query.name.unwrap_or_default();
    match state.products.search_by_name(&name).await {
        Ok(products) => state
            .views
            .products_page("Search Results", &products, Some(&name))
            .into_response(),
        Err(e) => product_failure(&state.views, e, StatusCode::BAD_REQUEST),
    }
}
