//! In-process fake of the emarket REST backend.
//!
//! [`FakeBackend`] serves, from memory, the endpoints the client's stores
//! talk to, on a random local port under `/api/v1`. Tests point a real
//! [`ApiClient`] at it, so requests go through the actual HTTP stack.
//!
//! Two accounts exist: [`CUSTOMER_EMAIL`] and [`ADMIN_EMAIL`], both with
//! [`PASSWORD`]. Tokens are `token-<user id>`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use emarket_client::{ApiClient, ClientConfig, Session};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

pub const CUSTOMER_EMAIL: &str = "an@example.com";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const PASSWORD: &str = "secret";

const TIMESTAMP: &str = "2024-05-01T09:30:00.123456";

struct Account {
    id: i32,
    email: &'static str,
    full_name: &'static str,
    role: &'static str,
}

const ACCOUNTS: [Account; 2] = [
    Account {
        id: 1,
        email: CUSTOMER_EMAIL,
        full_name: "Nguyễn Văn An",
        role: "customer",
    },
    Account {
        id: 2,
        email: ADMIN_EMAIL,
        full_name: "Quản trị",
        role: "admin",
    },
];

impl Account {
    fn token(&self) -> String {
        format!("token-{}", self.id)
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "full_name": self.full_name,
            "phone": null,
            "role": self.role,
            "is_active": true,
        })
    }
}

/// Mutable backend state.
#[derive(Debug, Default)]
struct BackendState {
    products: Vec<Value>,
    cart: Vec<Value>,
    orders: Vec<Value>,
    next_order_id: i32,
    fail_cart_writes: bool,
    last_authorization: Option<String>,
}

type Shared = Arc<RwLock<BackendState>>;

/// The running fake. Dropping it leaves the server task running until the
/// test runtime shuts down.
pub struct FakeBackend {
    state: Shared,
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl FakeBackend {
    /// Start on a random port with three seeded products.
    ///
    /// # Panics
    ///
    /// Panics if the listener can't bind.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(RwLock::new(BackendState {
            products: seed_products(),
            next_order_id: 1,
            ..BackendState::default()
        }));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Failed to get local address");

        let app = Router::new()
            .nest("/api/v1", api_routes())
            .layer(middleware::from_fn_with_state(state.clone(), record_authorization))
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake backend failed");
        });

        Self {
            state,
            addr,
            _handle: handle,
        }
    }

    /// Base URL including the `/api/v1` prefix.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// An anonymous client pointed at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the client can't be built.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        let config = ClientConfig::new(&self.url()).expect("valid fake backend URL");
        ApiClient::new(&config, Session::new()).expect("client builds")
    }

    /// A client signed in as `email`.
    ///
    /// # Panics
    ///
    /// Panics if the login is refused.
    pub async fn signed_in(&self, email: &str) -> ApiClient {
        let api = self.client();
        let request = emarket_client::types::LoginRequest {
            email: email.parse().expect("valid email"),
            password: PASSWORD.to_string(),
        };
        api.login(&request).await.expect("fake login succeeds");
        api
    }

    /// Insert an order directly, as if another customer had placed it.
    pub async fn seed_order(&self, status: &str) -> i32 {
        let mut state = self.state.write().await;
        let id = state.next_order_id;
        state.next_order_id += 1;
        state.orders.push(json!({
            "id": id,
            "order_number": format!("ORD-{id:05}"),
            "user_id": 1,
            "user_name": "Nguyễn Văn An",
            "user_email": CUSTOMER_EMAIL,
            "items": [{
                "id": id * 10,
                "product_id": 1,
                "product_name": "Áo thun",
                "quantity": 2,
                "price": 150_000.0
            }],
            "total": 300_000.0,
            "status": status,
            "shipping_address": "12 Lê Lợi, Q1",
            "payment_method": "cod",
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        }));
        id
    }

    /// Make every cart add/update/remove answer 500 until reset.
    pub async fn fail_cart_writes(&self, fail: bool) {
        self.state.write().await.fail_cart_writes = fail;
    }

    /// Rows the server holds, in insertion order.
    pub async fn cart_rows(&self) -> Vec<Value> {
        self.state.read().await.cart.clone()
    }

    /// Status of a stored order.
    pub async fn order_status(&self, id: i32) -> Option<String> {
        let state = self.state.read().await;
        state
            .orders
            .iter()
            .find(|o| o["id"] == id)
            .and_then(|o| o["status"].as_str().map(str::to_owned))
    }

    /// Number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// The `Authorization` header of the most recent request.
    pub async fn last_authorization(&self) -> Option<String> {
        self.state.read().await.last_authorization.clone()
    }
}

fn api_routes() -> Router<Shared> {
    Router::new()
        .route("/broken", get(broken))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/users/me", get(me))
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/cart", get(get_cart).post(add_to_cart))
        .route("/cart/checkout", post(checkout))
        .route("/cart/{id}", put(update_cart_row).delete(remove_cart_row))
        .route("/orders", post(create_order))
        .route("/admin/orders", get(admin_orders))
        .route("/admin/orders/{id}/status", put(set_order_status))
        .route("/admin/orders/{id}/cancel", post(cancel_order))
        .route("/admin/orders/{id}/refund", post(refund_order))
}

fn seed_products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "Áo thun",
            "description": "Cotton 100%",
            "price": 150_000.0,
            "stock": 20,
            "category": "Thời trang",
            "image": "/img/ao-thun.jpg",
            "images": null,
            "created_at": "2024-04-01T08:00:00",
        }),
        json!({
            "id": 2,
            "name": "Quần jean",
            "price": 350_000.0,
            "stock": 5,
            "category": "Thời trang",
            "images": ["/img/jean-1.jpg"],
        }),
        json!({
            "id": 3,
            "name": "Mũ lưỡi trai",
            "price": 90_000.0,
            "stock": 0,
            "category": {"id": 4, "name": "Phụ kiện"},
        }),
    ]
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn account_for(headers: &HeaderMap) -> Option<&'static Account> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    ACCOUNTS.iter().find(|account| account.token() == token)
}

async fn record_authorization(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state.write().await.last_authorization = header;
    next.run(request).await
}

async fn broken() -> &'static str {
    "<html>maintenance</html>"
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(Form(form): Form<LoginForm>) -> Response {
    match ACCOUNTS.iter().find(|a| a.email == form.username) {
        Some(account) if form.password == PASSWORD => Json(json!({
            "access_token": account.token(),
            "token_type": "bearer",
            "user_id": account.id,
            "full_name": account.full_name,
            "role": account.role,
        }))
        .into_response(),
        _ => detail(StatusCode::UNAUTHORIZED, "Incorrect email or password"),
    }
}

async fn logout() -> Json<Value> {
    Json(json!({ "message": "Logged out" }))
}

async fn me(headers: HeaderMap) -> Response {
    account_for(&headers).map_or_else(
        || detail(StatusCode::UNAUTHORIZED, "Not authenticated"),
        |account| Json(account.to_json()).into_response(),
    )
}

// =============================================================================
// Catalog
// =============================================================================

async fn list_products(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.read().await.products.clone()))
}

async fn get_product(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = state.read().await;
    state.products.iter().find(|p| p["id"] == id).map_or_else(
        || detail(StatusCode::NOT_FOUND, "Product not found"),
        |product| Json(product.clone()).into_response(),
    )
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Deserialize)]
struct AddBody {
    product_id: i64,
    quantity: u64,
    price: f64,
    name: String,
    image: String,
}

#[derive(Deserialize)]
struct QuantityBody {
    quantity: u64,
}

async fn get_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if account_for(&headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    Json(Value::Array(state.read().await.cart.clone())).into_response()
}

async fn add_to_cart(State(state): State<Shared>, Json(body): Json<AddBody>) -> Response {
    let mut state = state.write().await;
    if state.fail_cart_writes {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Cart service unavailable");
    }

    let product_id = body.product_id.to_string();
    if let Some(row) = state.cart.iter_mut().find(|r| r["product_id"] == product_id.as_str()) {
        let quantity = row["quantity"].as_u64().unwrap_or(0) + body.quantity;
        row["quantity"] = json!(quantity);
        return Json(row.clone()).into_response();
    }

    let row = json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "product_id": product_id,
        "name": body.name,
        "price": body.price,
        "quantity": body.quantity,
        "image": body.image,
    });
    state.cart.push(row.clone());
    Json(row).into_response()
}

async fn update_cart_row(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<QuantityBody>,
) -> Response {
    let mut state = state.write().await;
    if state.fail_cart_writes {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Cart service unavailable");
    }
    match state.cart.iter_mut().find(|r| r["id"] == id.as_str()) {
        Some(row) => {
            row["quantity"] = json!(body.quantity);
            Json(json!({ "message": "Cart item updated", "success": true })).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "Item not found"),
    }
}

async fn remove_cart_row(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = state.write().await;
    if state.fail_cart_writes {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Cart service unavailable");
    }
    let before = state.cart.len();
    state.cart.retain(|r| r["id"] != id.as_str());
    if state.cart.len() == before {
        return detail(StatusCode::NOT_FOUND, "Item not found");
    }
    Json(json!({ "message": "Item removed", "success": true })).into_response()
}

async fn checkout(State(state): State<Shared>) -> Json<Value> {
    state.write().await.cart.clear();
    Json(json!({ "message": "Checkout successful" }))
}

// =============================================================================
// Orders
// =============================================================================

async fn create_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if account_for(&headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }

    let items = body["items"].as_array().cloned().unwrap_or_default();
    let total: f64 = items
        .iter()
        .map(|item| {
            let price = item["price"].as_f64().unwrap_or(0.0);
            #[allow(clippy::cast_precision_loss)]
            let quantity = item["quantity"].as_u64().unwrap_or(0) as f64;
            price * quantity
        })
        .sum();

    let mut state = state.write().await;
    let id = state.next_order_id;
    state.next_order_id += 1;
    let order = json!({
        "id": id,
        "order_number": format!("ORD-{id:05}"),
        "user_id": body["user_id"],
        "user_name": body["user_name"],
        "user_email": body["user_email"],
        "items": items,
        "total": total,
        "status": "pending",
        "shipping_address": body["shipping_address"],
        "payment_method": body["payment_method"],
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    });
    state.orders.push(order.clone());
    Json(order).into_response()
}

#[derive(Deserialize)]
struct OrderWindow {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
    status: Option<String>,
}

const fn default_limit() -> usize {
    100
}

async fn admin_orders(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(window): Query<OrderWindow>,
) -> Response {
    if account_for(&headers).is_none_or(|a| a.role != "admin") {
        return detail(StatusCode::FORBIDDEN, "Not enough permissions");
    }

    let state = state.read().await;
    let matching: Vec<&Value> = state
        .orders
        .iter()
        .filter(|o| {
            window
                .status
                .as_deref()
                .is_none_or(|status| o["status"] == status)
        })
        .collect();
    let orders: Vec<&Value> = matching
        .iter()
        .skip(window.skip)
        .take(window.limit)
        .copied()
        .collect();

    Json(json!({
        "orders": orders,
        "total": matching.len(),
        "page": window.skip.checked_div(window.limit).unwrap_or(0) + 1,
        "limit": window.limit,
    }))
    .into_response()
}

#[derive(Deserialize)]
struct StatusBody {
    status: String,
}

fn with_order(state: &mut BackendState, id: i32, f: impl FnOnce(&mut Value) -> Result<(), String>) -> Response {
    match state.orders.iter_mut().find(|o| o["id"] == id) {
        Some(order) => match f(order) {
            Ok(()) => Json(order.clone()).into_response(),
            Err(message) => detail(StatusCode::BAD_REQUEST, &message),
        },
        None => detail(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn set_order_status(
    State(state): State<Shared>,
    Path(id): Path<i32>,
    Json(body): Json<StatusBody>,
) -> Response {
    with_order(&mut *state.write().await, id, |order| {
        order["status"] = json!(body.status);
        Ok(())
    })
}

async fn cancel_order(State(state): State<Shared>, Path(id): Path<i32>) -> Response {
    with_order(&mut *state.write().await, id, |order| {
        let status = order["status"].as_str().unwrap_or_default().to_owned();
        if matches!(status.as_str(), "shipping" | "delivered" | "cancelled") {
            return Err(format!("Cannot cancel order in status {status}"));
        }
        order["status"] = json!("cancelled");
        Ok(())
    })
}

async fn refund_order(State(state): State<Shared>, Path(id): Path<i32>) -> Response {
    with_order(&mut *state.write().await, id, |order| {
        if order["status"] == "cancelled" {
            return Err("Cancelled orders cannot be refunded".to_string());
        }
        order["status"] = json!("cancelled");
        Ok(())
    })
}
