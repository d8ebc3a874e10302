use std::net::TcpListener;
use std::sync::Arc;

use serde_json::{json, Value};

use ecom_api::configuration::JwtSettings;
use ecom_api::startup::run;
use ecom_api::store::{InMemoryStore, Store};

const TEST_SECRET: &str = "integration-test-secret-key-32-bytes!!";

struct TestApp {
    address: String,
    client: reqwest::Client,
}

fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store: Arc<InMemoryStore> = Arc::new(InMemoryStore::new());
    let jwt = JwtSettings {
        secret: TEST_SECRET.to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 86400,
    };

    let server = run(listener, store as Arc<dyn Store>, jwt).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        client: reqwest::Client::new(),
    }
}

/// Register a user and return an access token for it.
async fn access_token_for(app: &TestApp, email: &str, is_admin: bool) -> String {
    let response = app
        .client
        .post(&format!("{}/users", &app.address))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "pw",
            "isAdmin": is_admin
        }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let response = app
        .client
        .post(&format!("{}/users/login", &app.address))
        .json(&json!({ "email": email, "password": "pw" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse response");
    body["accessToken"].as_str().unwrap().to_string()
}

// --- Products ---

#[tokio::test]
async fn product_catalog_is_publicly_readable() {
    let app = spawn_app();

    let response = app
        .client
        .get(&format!("{}/products", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn creating_a_product_requires_an_admin_token() {
    let app = spawn_app();
    let product = json!({ "name": "Widget", "price": 9.99 });

    // No token at all
    let response = app
        .client
        .post(&format!("{}/products", &app.address))
        .json(&product)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());

    // Valid token, not admin
    let token = access_token_for(&app, "user@b.com", false).await;
    let response = app
        .client
        .post(&format!("{}/products", &app.address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&product)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(403, response.status().as_u16());
}

#[tokio::test]
async fn admin_can_create_patch_and_delete_a_product() {
    let app = spawn_app();
    let token = access_token_for(&app, "admin@b.com", true).await;
    let auth = format!("Bearer {}", token);

    let response = app
        .client
        .post(&format!("{}/products", &app.address))
        .header("Authorization", &auth)
        .json(&json!({
            "name": "Widget",
            "category": "tools",
            "price": 9.99,
            "countInStock": 5
        }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let created: Value = response.json().await.expect("Failed to parse response");
    let id = created["id"].as_i64().unwrap();

    // Publicly readable
    let response = app
        .client
        .get(&format!("{}/products/{}", &app.address, id))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched["name"], "Widget");

    // Patch only overwrites supplied fields
    let response = app
        .client
        .patch(&format!("{}/products/{}", &app.address, id))
        .header("Authorization", &auth)
        .json(&json!({ "price": 19.99 }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let patched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(patched["price"], 19.99);
    assert_eq!(patched["name"], "Widget");
    assert_eq!(patched["countInStock"], 5);

    let response = app
        .client
        .delete(&format!("{}/products/{}", &app.address, id))
        .header("Authorization", &auth)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(204, response.status().as_u16());

    // A missing record is not distinguished from an internal failure.
    let response = app
        .client
        .get(&format!("{}/products/{}", &app.address, id))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(500, response.status().as_u16());
}

// --- Orders ---

#[tokio::test]
async fn order_lifecycle_binds_orders_to_the_caller() {
    let app = spawn_app();
    let user_token = access_token_for(&app, "user@b.com", false).await;
    let admin_token = access_token_for(&app, "admin@b.com", true).await;

    let response = app
        .client
        .post(&format!("{}/orders", &app.address))
        .header("Authorization", format!("Bearer {}", user_token))
        .json(&json!({
            "paymentMethod": "card",
            "taxPrice": 1.0,
            "shippingPrice": 2.0,
            "totalPrice": 13.0,
            "items": [
                { "name": "Widget", "quantity": 2, "price": 5.0, "productId": 1 }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let created: Value = response.json().await.expect("Failed to parse response");
    let order_id = created["id"].as_i64().unwrap();
    assert_eq!(created["items"].as_array().unwrap().len(), 1);

    // The caller sees their own order with items attached
    let response = app
        .client
        .get(&format!("{}/myorder", &app.address))
        .header("Authorization", format!("Bearer {}", user_token))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let mine: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(mine["id"], order_id);
    assert_eq!(mine["items"][0]["name"], "Widget");

    // The admin listing returns all orders without items attached
    let response = app
        .client
        .get(&format!("{}/orders", &app.address))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let listed: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["items"], json!([]));

    // Listing orders is admin-only
    let response = app
        .client
        .get(&format!("{}/orders", &app.address))
        .header("Authorization", format!("Bearer {}", user_token))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(403, response.status().as_u16());

    let response = app
        .client
        .delete(&format!("{}/orders/{}", &app.address, order_id))
        .header("Authorization", format!("Bearer {}", user_token))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(204, response.status().as_u16());
}

// --- Users ---

#[tokio::test]
async fn duplicate_email_registration_is_a_conflict() {
    let app = spawn_app();
    let body = json!({ "name": "John", "email": "john@b.com", "password": "pw" });

    let response = app
        .client
        .post(&format!("{}/users", &app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let response = app
        .client
        .post(&format!("{}/users", &app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(409, response.status().as_u16());
}

#[tokio::test]
async fn user_registration_rejects_invalid_input() {
    let app = spawn_app();

    for (body, reason) in [
        (json!({ "name": "John", "email": "notanemail", "password": "pw" }), "bad email"),
        (json!({ "name": "", "email": "john@b.com", "password": "pw" }), "empty name"),
    ] {
        let response = app
            .client
            .post(&format!("{}/users", &app.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(400, response.status().as_u16(), "Should reject: {}", reason);
    }
}

#[tokio::test]
async fn a_user_can_update_their_own_record() {
    let app = spawn_app();
    let token = access_token_for(&app, "user@b.com", false).await;

    let response = app
        .client
        .patch(&format!("{}/users", &app.address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "Renamed" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["email"], "user@b.com");
}
