//! Shared test harness
//!
//! Spins up a full application over a temporary SQLite database and
//! drives it through `tower::ServiceExt::oneshot`, no listening socket.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use stockroom::auth::JwtConfig;
use stockroom::db::models::{
    CategoryAttrs, Location, LocationCreate, Product, ProductCreate, StockLevel, User, UserCreate,
};
use stockroom::{Config, Role, ServerState};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "test-admin-password";
pub const USER_PASSWORD: &str = "user-password-1";
pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    _dir: TempDir,
}

/// Initialize a fresh application over a temp database
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Same, with a config tweak applied before initialization
pub async fn spawn_app_with(tweak: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let mut config = Config {
        http_port: 0,
        database_path: dir.path().join("test.db").to_string_lossy().into_owned(),
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            access_ttl_minutes: 15,
        },
        refresh_ttl_seconds: 3600,
        cookie_secure: false,
        admin_username: ADMIN_USERNAME.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        environment: "test".to_string(),
    };
    tweak(&mut config);

    let state = ServerState::initialize(&config)
        .await
        .expect("failed to initialize server state");
    let app = stockroom::api::build_app(&state);

    TestApp {
        app,
        state,
        _dir: dir,
    }
}

/// Cookies returned by a successful login or refresh
pub struct Session {
    pub user_id: String,
    pub access: String,
    pub refresh: String,
}

impl Session {
    pub fn cookie_header(&self) -> String {
        format!("access_token={}; refresh_token={}", self.access, self.refresh)
    }
}

impl TestApp {
    /// Send one request through the router
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        cookies: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookies) = cookies {
            builder = builder.header(header::COOKIE, cookies);
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed")
    }

    /// Send a request with a raw (possibly malformed) JSON body
    pub async fn request_text(
        &self,
        method: &str,
        uri: &str,
        cookies: Option<&str>,
        body: &str,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookies) = cookies {
            builder = builder.header(header::COOKIE, cookies);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("failed to build request");

        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed")
    }

    /// Login and capture the session cookies
    pub async fn login(&self, username: &str, password: &str) -> Session {
        let resp = self
            .request(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK, "login should succeed");

        let access = set_cookie(&resp, "access_token").expect("access cookie missing");
        let refresh = set_cookie(&resp, "refresh_token").expect("refresh cookie missing");
        let body = body_json(resp).await;
        let user_id = body["data"]
            .as_str()
            .expect("login data should be the user id")
            .to_string();

        Session {
            user_id,
            access,
            refresh,
        }
    }

    pub async fn login_admin(&self) -> Session {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }
}

/// Value of one cookie from the Set-Cookie headers
pub fn set_cookie(resp: &Response<Body>, name: &str) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .find_map(|header_value| {
            let raw = header_value.to_str().ok()?;
            let pair = raw.split(';').next()?;
            let (cookie_name, value) = pair.split_once('=')?;
            (cookie_name == name).then(|| value.to_string())
        })
}

/// Full Set-Cookie header line for one cookie, attributes included
pub fn set_cookie_raw(resp: &Response<Body>, name: &str) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .find_map(|header_value| {
            let raw = header_value.to_str().ok()?;
            raw.starts_with(&format!("{name}=")).then(|| raw.to_string())
        })
}

/// Read the response body as JSON
pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body was not JSON")
}

// ===== storage seeding, bypassing HTTP =====

pub async fn seed_user(state: &ServerState, username: &str, role: Role) -> User {
    state
        .users()
        .create(UserCreate {
            username: username.to_string(),
            password: USER_PASSWORD.to_string(),
            display_name: None,
            role,
        })
        .await
        .expect("failed to seed user")
}

pub async fn seed_location(state: &ServerState, address: &str) -> Location {
    state
        .locations()
        .create(LocationCreate {
            address: address.to_string(),
        })
        .await
        .expect("failed to seed location")
}

pub async fn seed_product(state: &ServerState, name: &str) -> Product {
    state
        .products()
        .create(ProductCreate {
            name: name.to_string(),
            description: None,
            price_cents: 1999,
            attributes: CategoryAttrs::Book {
                author: "N. K. Jemisin".to_string(),
                isbn: None,
                pages: None,
            },
        })
        .await
        .expect("failed to seed product")
}

pub async fn set_stock(state: &ServerState, product_id: &str, location_id: &str, quantity: i64) {
    state
        .stock()
        .bulk_set(
            product_id,
            &[StockLevel {
                location_id: location_id.to_string(),
                quantity,
            }],
        )
        .await
        .expect("failed to set stock");
}

/// Current stock quantity, zero when no row exists
pub async fn stock_quantity(state: &ServerState, product_id: &str, location_id: &str) -> i64 {
    state
        .stock()
        .level(product_id, location_id)
        .await
        .expect("failed to read stock")
        .map(|s| s.quantity)
        .unwrap_or(0)
}

pub async fn sales_count(state: &ServerState) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sales")
        .fetch_one(state.pool())
        .await
        .expect("count query failed")
}

pub async fn sale_items_count(state: &ServerState) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
        .fetch_one(state.pool())
        .await
        .expect("count query failed")
}
