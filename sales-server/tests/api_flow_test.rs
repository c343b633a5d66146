//! HTTP API integration tests
//!
//! Drives the assembled router in-process via `tower::ServiceExt`, the
//! same `Service` surface the production listener serves. Each test gets
//! its own in-memory state.

use axum::Router;
use axum::body::Body;
use http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use sales_server::core::server::build_app;
use sales_server::{Config, ServerState};

fn test_app() -> Router {
    let config = Config::from_env();
    let state = ServerState::in_memory(&config).expect("Failed to build state");
    build_app().with_state(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("Failed to build request")
}

fn send_json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Register a seller and log in; returns (token, user_id)
async fn register_and_login(app: &Router, email: &str) -> (String, i64) {
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": email,
                "password": "hunter2!",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": email, "password": "hunter2!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["token"].as_str().expect("login returns a token");
    let user_id = body["user"]["id"].as_i64().expect("login returns the user");
    (token.to_string(), user_id)
}

async fn create_product(app: &Router, name: &str, price: &str, stock: u32) -> i64 {
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/products",
            None,
            json!({ "name": name, "price": price, "stock": stock }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().expect("product id")
}

async fn create_client(app: &Router, token: &str, email: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/clients",
            Some(token),
            json!({
                "first_name": "Grace",
                "last_name": "Hopper",
                "company": "Initech",
                "email": email,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().expect("client id")
}

#[tokio::test]
async fn test_register_login_me_roundtrip() {
    let app = test_app();

    // 1. Register never leaks credential fields
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "password": "hunter2!",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["email"], "ada@example.com");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    // 2. Wrong password gets the unified credentials error
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "ada@example.com", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], 1002);

    // 3. Unknown email reads exactly the same as a wrong password
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "hunter2!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], 1002);

    // 4. Correct credentials yield a token that introspects
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "ada@example.com", "password": "hunter2!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_auth("/api/auth/me", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], "ada@example.com");

    // 5. No token, no identity
    let response = app.clone().oneshot(get("/api/auth/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], 1001);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = test_app();
    register_and_login(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "first_name": "Fake",
                "last_name": "Ada",
                "email": "ada@example.com",
                "password": "different",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], 5002);
    assert!(body["message"].as_str().unwrap().contains("ada@example.com"));
}

#[tokio::test]
async fn test_product_catalog_over_http() {
    let app = test_app();

    // Create and read back, price scale preserved
    let laptop = create_product(&app, "Laptop", "1200.50", 10).await;
    create_product(&app, "Laptop Stand", "49.90", 30).await;
    create_product(&app, "USB-C Dock", "150.00", 4).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/api/products/{}", laptop)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Laptop");
    assert_eq!(body["price"], "1200.50");
    assert_eq!(body["stock"], 10);

    let response = app.clone().oneshot(get("/api/products")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);

    // Case-insensitive name search
    let response = app
        .clone()
        .oneshot(get("/api/products/search?q=lap"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let matches = body_json(response).await;
    let names: Vec<&str> = matches
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Laptop"));
    assert!(names.contains(&"Laptop Stand"));

    // Partial update: restock without touching the rest
    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/products/{}", laptop),
            None,
            json!({ "stock": 99 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["stock"], 99);
    assert_eq!(body["name"], "Laptop");

    // Rejected payloads
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/products",
            None,
            json!({ "name": "", "price": "10.00", "stock": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 2);

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/products",
            None,
            json!({ "name": "Refund", "price": "-5.00", "stock": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Delete, then the record is gone
    let response = app
        .clone()
        .oneshot(send_json(
            "DELETE",
            &format!("/api/products/{}", laptop),
            None,
            json!(null),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/products/{}", laptop)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], 6001);
}

#[tokio::test]
async fn test_client_ownership_over_http() {
    let app = test_app();
    let (alice, alice_id) = register_and_login(&app, "alice@example.com").await;
    let (bob, _) = register_and_login(&app, "bob@example.com").await;

    // Anonymous callers cannot create clients
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/clients",
            None,
            json!({
                "first_name": "Grace",
                "last_name": "Hopper",
                "company": "Initech",
                "email": "grace@initech.test",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], 1001);

    let client_id = create_client(&app, &alice, "grace@initech.test").await;

    // The record landed under Alice
    let response = app
        .clone()
        .oneshot(get_auth(&format!("/api/clients/{}", client_id), &alice))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["seller_id"], alice_id);

    // Anonymous reads on a protected record say "log in", not "not yours"
    let response = app
        .clone()
        .oneshot(get(&format!("/api/clients/{}", client_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], 1001);

    // Bob can see the shared directory but not Alice's record
    let response = app.clone().oneshot(get("/api/clients")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get_auth(&format!("/api/clients/{}", client_id), &bob))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], 2001);

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/clients/{}", client_id),
            Some(&bob),
            json!({ "company": "Hostile Takeover Inc" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(send_json(
            "DELETE",
            &format!("/api/clients/{}", client_id),
            Some(&bob),
            json!(null),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // /mine is scoped per seller
    let response = app
        .clone()
        .oneshot(get_auth("/api/clients/mine", &alice))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get_auth("/api/clients/mine", &bob))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

    // Client emails are unique across sellers
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/clients",
            Some(&bob),
            json!({
                "first_name": "Grace",
                "last_name": "Hopper",
                "company": "Initech",
                "email": "grace@initech.test",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], 3002);

    // Owner update works and the email index follows the change
    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/clients/{}", client_id),
            Some(&alice),
            json!({ "email": "grace@newcorp.test" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], "grace@newcorp.test");

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/clients",
            Some(&bob),
            json!({
                "first_name": "Grace",
                "last_name": "Hopper",
                "company": "Initech",
                "email": "grace@initech.test",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "freed email is reusable");

    // Unknown IDs are a 404 for authenticated callers
    let response = app
        .clone()
        .oneshot(get_auth("/api/clients/999999", &alice))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], 3001);
}

#[tokio::test]
async fn test_order_flow_over_http() {
    let app = test_app();
    let (alice, _) = register_and_login(&app, "alice@example.com").await;
    let (bob, _) = register_and_login(&app, "bob@example.com").await;

    let product = create_product(&app, "Laptop", "100", 5).await;
    let client = create_client(&app, &alice, "grace@initech.test").await;

    // Anonymous callers cannot place orders
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/orders",
            None,
            json!({
                "client_id": client,
                "items": [{ "product_id": product, "quantity": 1 }],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 1. Place an order; total is computed server-side
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/orders",
            Some(&alice),
            json!({
                "client_id": client,
                "items": [{ "product_id": product, "quantity": 3 }],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let order_id = body["id"].as_i64().unwrap();
    assert_eq!(body["total"], "300");
    assert_eq!(body["status"], "PENDING");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/products/{}", product)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["stock"], 2);

    // 2. A second order for more than the remainder is refused with the
    //    shortfall spelled out
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/orders",
            Some(&alice),
            json!({
                "client_id": client,
                "items": [{ "product_id": product, "quantity": 3 }],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], 6003);
    assert_eq!(body["details"]["requested"], 3);
    assert_eq!(body["details"]["available"], 2);
    assert_eq!(body["details"]["product"], "Laptop");

    // 3. Growing the first order moves only the delta
    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/orders/{}", order_id),
            Some(&alice),
            json!({
                "client_id": client,
                "items": [{ "product_id": product, "quantity": 5 }],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["total"], "500");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/products/{}", product)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["stock"], 0);

    // 4. Ownership: Bob sees nothing of Alice's order
    let response = app
        .clone()
        .oneshot(get_auth(&format!("/api/orders/{}", order_id), &bob))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get_auth("/api/orders/mine", &bob))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(get_auth("/api/orders/mine", &alice))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    // 5. Complete, then the status listing finds it (case-insensitive)
    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/orders/{}", order_id),
            Some(&alice),
            json!({ "client_id": client, "status": "COMPLETED" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "COMPLETED");

    let response = app
        .clone()
        .oneshot(get_auth("/api/orders/status/completed", &alice))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get_auth("/api/orders/status/BOGUS", &alice))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 4002);

    // 6. Deleting the order keeps the delivered units out of stock
    let response = app
        .clone()
        .oneshot(send_json(
            "DELETE",
            &format!("/api/orders/{}", order_id),
            Some(&alice),
            json!(null),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/products/{}", product)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["stock"], 0);
}

#[tokio::test]
async fn test_statistics_leaderboards_over_http() {
    let app = test_app();
    let (alice, alice_id) = register_and_login(&app, "alice@example.com").await;
    let (bob, bob_id) = register_and_login(&app, "bob@example.com").await;

    let product = create_product(&app, "Laptop", "100", 100).await;
    let c1 = create_client(&app, &alice, "c1@initech.test").await;
    let c2 = create_client(&app, &alice, "c2@initech.test").await;
    let c3 = create_client(&app, &bob, "c3@initech.test").await;

    let place = |token: String, client: i64, quantity: u32, status: &'static str| {
        let app = app.clone();
        async move {
            let response = app
                .oneshot(send_json(
                    "POST",
                    "/api/orders",
                    Some(&token),
                    json!({
                        "client_id": client,
                        "items": [{ "product_id": product, "quantity": quantity }],
                        "status": status,
                    }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    };

    place(alice.clone(), c1, 3, "COMPLETED").await;
    place(alice.clone(), c2, 1, "COMPLETED").await;
    place(bob.clone(), c3, 5, "COMPLETED").await;
    // pending volume must not count
    place(alice.clone(), c2, 9, "PENDING").await;

    let response = app
        .clone()
        .oneshot(get("/api/statistics/top-clients"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["client"]["id"], c3);
    assert_eq!(rows[0]["total"], "500");
    assert_eq!(rows[1]["client"]["id"], c1);
    assert_eq!(rows[1]["total"], "300");
    assert_eq!(rows[2]["client"]["id"], c2);
    assert_eq!(rows[2]["total"], "100");

    let response = app
        .clone()
        .oneshot(get("/api/statistics/top-sellers"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["seller"]["id"], bob_id);
    assert_eq!(rows[0]["total"], "500");
    assert_eq!(rows[1]["seller"]["id"], alice_id);
    assert_eq!(rows[1]["total"], "400");
    // leaderboard rows expose the public profile, not credentials
    assert!(rows[0]["seller"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_health_probes() {
    let app = test_app();

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["reservation_policy"], "sequential");
    assert!(body["version"].as_str().is_some());

    let response = app.clone().oneshot(get("/health/detailed")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "ok");
}
