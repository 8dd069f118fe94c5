//! Admin service routes

use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post},
};
use common::error::BackendError;
use common::models::{OrderStatus, Product};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult, PanelError},
    messages,
    middleware::{CurrentUser, LOGIN_PATH, session_gate},
    models::{
        LoginRequest, LoginResponse, LoginView, PanelQuery, PanelView, ProductCard, ProductForm,
        ProductFormState, SettingsForm, StatusChangeRequest,
        orders::{OrderRow, order_rows},
        product_cards,
    },
    notifications::NotificationKind,
    state::AppState,
    validation,
};

/// Where staff land after sign-in and after saving an edit
const PANEL_PATH: &str = "/";

/// Create the router for the admin service
pub fn create_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    let protected_routes = Router::new()
        .route("/", get(panel))
        .route("/logout", post(logout))
        .route(
            "/products",
            get(list_products)
                .post(create_product)
                .layer(upload_limit.clone()),
        )
        .route("/products/:id", delete(delete_product))
        .route(
            "/edit/:id",
            get(edit_product).put(update_product).layer(upload_limit),
        )
        .route("/settings", get(load_settings).put(update_settings))
        .route("/orders", get(list_orders))
        .route("/orders/:id/status", post(change_order_status))
        .route("/notifications", get(list_notifications))
        .route("/notifications/:id", delete(dismiss_notification))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_gate));

    Router::new()
        .route("/health", get(health_check))
        .route("/login", get(login_view).post(login))
        .merge(protected_routes)
        .with_state(state)
}

/// Queue an error notification for a failed operation and map it to HTTP
async fn report(state: &AppState, user: &CurrentUser, err: PanelError, fallback: &str) -> ApiError {
    let message = err.user_message(fallback);
    state
        .sessions
        .notify(user.id, NotificationKind::Error, &message)
        .await;
    err.into_api_error(message)
}

/// Reload the product list; on failure keep the previous list and notify
async fn refresh_products(state: &AppState, user: &CurrentUser) -> Vec<Product> {
    match state.product_repository.list(&user.access_token).await {
        Ok(products) => {
            state.sessions.set_products(user.id, products.clone()).await;
            products
        }
        Err(_) => {
            state
                .sessions
                .notify(user.id, NotificationKind::Error, messages::ERROR_LOADING_PRODUCTS)
                .await;
            state.sessions.products(user.id).await
        }
    }
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let healthy = match state.backend.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            error!("Backend health check failed: {}", e);
            false
        }
    };

    if healthy {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "admin-service"
            })),
        )
    } else {
        warn!("Backend is unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "service": "admin-service"
            })),
        )
    }
}

pub async fn login_view() -> impl IntoResponse {
    Json(LoginView::default())
}

/// Sign in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = validation::required(&payload.email, messages::FIELD_EMAIL)
        .map_err(|e| ApiError::BadRequest(e.user_message(messages::ERROR_OCCURRED)))?;
    let password = validation::required(&payload.password, messages::FIELD_PASSWORD)
        .map_err(|e| ApiError::BadRequest(e.user_message(messages::ERROR_OCCURRED)))?;

    let session = state
        .backend
        .auth
        .sign_in(&email, &password)
        .await
        .map_err(|e| match e {
            BackendError::InvalidCredentials => {
                ApiError::Unauthorized(messages::INVALID_CREDENTIALS.to_string())
            }
            other => {
                error!("Sign-in failed: {}", other);
                ApiError::BadGateway(messages::CONNECTION_FAILED.to_string())
            }
        })?;

    state.sessions.create_session(&session).await;
    info!("Staff member {} signed in", session.user.id);

    Ok(Json(LoginResponse {
        access_token: session.access_token,
        token_type: "Bearer",
        expires_in: session.expires_in,
        user: session.user,
        redirect_to: PANEL_PATH,
    }))
}

/// Sign out; the local session is dropped even if the backend call fails
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    let notification = match state.backend.auth.sign_out(&user.access_token).await {
        Ok(()) => None,
        Err(e) => {
            error!("Failed to sign out user {}: {}", user.id, e);
            state
                .sessions
                .notify(user.id, NotificationKind::Error, messages::ERROR_SIGN_OUT)
                .await
        }
    };

    state.sessions.delete_session(user.id).await;

    Json(json!({
        "redirect_to": LOGIN_PATH,
        "notification": notification,
    }))
}

/// Combined panel view; refreshes products and loads settings
pub async fn panel(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PanelQuery>,
) -> ApiResult<impl IntoResponse> {
    if let Some(tab) = query.tab {
        state.sessions.set_tab(user.id, tab).await;
    }

    let products = refresh_products(&state, &user).await;

    match state.settings_repository.load(&user.access_token).await {
        Ok(settings) => state.sessions.set_settings(user.id, settings).await,
        Err(_) => {
            state
                .sessions
                .notify(user.id, NotificationKind::Error, messages::ERROR_LOADING_SETTINGS)
                .await;
        }
    }

    let panel = state
        .sessions
        .panel(user.id)
        .await
        .ok_or(ApiError::InternalServerError)?;
    let notifications = state.sessions.notifications(user.id).await;

    Ok(Json(PanelView::new(
        panel.tab,
        &products,
        panel.settings,
        notifications,
    )))
}

/// Refresh and return the product list
pub async fn list_products(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    let products = refresh_products(&state, &user).await;

    Json(json!({
        "products": product_cards(&products),
        "notifications": state.sessions.notifications(user.id).await,
    }))
}

/// Create a product from a multipart form
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let form = ProductForm::from_multipart(multipart).await.map_err(|e| {
        error!("Failed to read product form: {}", e);
        ApiError::BadRequest(messages::ERROR_SAVING_PRODUCT.to_string())
    })?;

    let created = match form.validate() {
        Ok(input) => {
            state
                .product_repository
                .create(&user.access_token, input, user.id)
                .await
        }
        Err(e) => Err(e),
    };
    let product = match created {
        Ok(product) => product,
        Err(e) => return Err(report(&state, &user, e, messages::ERROR_SAVING_PRODUCT).await),
    };

    let notification = state
        .sessions
        .notify(user.id, NotificationKind::Success, messages::PRODUCT_CREATED)
        .await;
    let products = refresh_products(&state, &user).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "product": ProductCard::from(&product),
            "form": ProductFormState::default(),
            "products": product_cards(&products),
            "notification": notification,
        })),
    ))
}

/// Edit view of one product; a failed load returns to the panel
pub async fn edit_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.product_repository.get(&user.access_token, id).await {
        Ok(product) => Json(json!({
            "product": ProductCard::from(&product),
            "form": ProductFormState::from(&product),
            "notifications": state.sessions.notifications(user.id).await,
        }))
        .into_response(),
        Err(_) => {
            state
                .sessions
                .notify(user.id, NotificationKind::Error, messages::ERROR_LOADING_PRODUCT)
                .await;
            Redirect::to(PANEL_PATH).into_response()
        }
    }
}

/// Update a product from a multipart form
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let form = ProductForm::from_multipart(multipart).await.map_err(|e| {
        error!("Failed to read product form: {}", e);
        ApiError::BadRequest(messages::ERROR_SAVING_PRODUCT.to_string())
    })?;

    let updated = match form.validate() {
        Ok(input) => {
            state
                .product_repository
                .update(&user.access_token, id, input, user.id)
                .await
        }
        Err(e) => Err(e),
    };
    let product = match updated {
        Ok(product) => product,
        Err(e) => return Err(report(&state, &user, e, messages::ERROR_SAVING_PRODUCT).await),
    };

    let notification = state
        .sessions
        .notify(user.id, NotificationKind::Success, messages::PRODUCT_UPDATED)
        .await;

    Ok(Json(json!({
        "product": ProductCard::from(&product),
        "notification": notification,
        "redirect_to": PANEL_PATH,
    })))
}

/// Delete a product and its image
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if let Err(e) = state.product_repository.delete(&user.access_token, id).await {
        return Err(report(&state, &user, e, messages::ERROR_DELETING_PRODUCT).await);
    }

    let notification = state
        .sessions
        .notify(user.id, NotificationKind::Success, messages::PRODUCT_DELETED)
        .await;
    let products = refresh_products(&state, &user).await;

    Ok(Json(json!({
        "products": product_cards(&products),
        "notification": notification,
    })))
}

/// Load the settings row into the session
pub async fn load_settings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    let settings = match state.settings_repository.load(&user.access_token).await {
        Ok(settings) => settings,
        Err(e) => return Err(report(&state, &user, e, messages::ERROR_LOADING_SETTINGS).await),
    };

    state.sessions.set_settings(user.id, settings.clone()).await;
    Ok(Json(settings))
}

/// Update the loaded settings row
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(form): Json<SettingsForm>,
) -> ApiResult<impl IntoResponse> {
    let current = state.sessions.settings(user.id).await;

    let updated = match form.validate() {
        Ok(changes) => {
            state
                .settings_repository
                .update(&user.access_token, &current, &changes)
                .await
        }
        Err(e) => Err(e),
    };
    let settings = match updated {
        Ok(settings) => settings,
        Err(e) => return Err(report(&state, &user, e, messages::ERROR_UPDATING_SETTINGS).await),
    };

    state.sessions.set_settings(user.id, settings.clone()).await;
    let notification = state
        .sessions
        .notify(user.id, NotificationKind::Success, messages::SETTINGS_UPDATED)
        .await;

    Ok(Json(json!({
        "settings": settings,
        "notification": notification,
    })))
}

/// Orders newest first
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    match state.order_repository.list(&user.access_token).await {
        Ok(orders) => Ok(Json(json!({ "orders": order_rows(&orders) }))),
        Err(e) => Err(report(&state, &user, e, messages::ERROR_LOADING_ORDERS).await),
    }
}

/// Move an order to another status
pub async fn change_order_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusChangeRequest>,
) -> ApiResult<impl IntoResponse> {
    let changed = match OrderStatus::try_from(payload.status) {
        Ok(target) => {
            state
                .order_repository
                .change_status(&user.access_token, id, target, user.id)
                .await
        }
        Err(_) => Err(PanelError::Validation(messages::INVALID_ORDER_STATUS.to_string())),
    };
    let order = match changed {
        Ok(order) => order,
        Err(e) => return Err(report(&state, &user, e, messages::ERROR_UPDATING_ORDER_STATUS).await),
    };

    let notification = state
        .sessions
        .notify(user.id, NotificationKind::Success, messages::ORDER_STATUS_UPDATED)
        .await;

    // The write already happened; a failed reload only loses the list
    let orders = match state.order_repository.list(&user.access_token).await {
        Ok(orders) => Some(order_rows(&orders)),
        Err(_) => {
            state
                .sessions
                .notify(user.id, NotificationKind::Error, messages::ERROR_LOADING_ORDERS)
                .await;
            None
        }
    };

    Ok(Json(json!({
        "order": OrderRow::from(&order),
        "orders": orders,
        "notification": notification,
        "notifications": state.sessions.notifications(user.id).await,
    })))
}

/// Active notifications, oldest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    Json(state.sessions.notifications(user.id).await)
}

/// Dismiss a notification before it expires
pub async fn dismiss_notification(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if state.sessions.dismiss(user.id, id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(messages::NOTIFICATION_NOT_FOUND.to_string()))
    }
}
