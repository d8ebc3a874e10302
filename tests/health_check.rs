use std::net::TcpListener;
use std::sync::Arc;

use ecom_api::configuration::JwtSettings;
use ecom_api::startup::run;
use ecom_api::store::{InMemoryStore, Store};

const TEST_SECRET: &str = "integration-test-secret-key-32-bytes!!";

fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let store: Arc<InMemoryStore> = Arc::new(InMemoryStore::new());
    let jwt = JwtSettings {
        secret: TEST_SECRET.to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 86400,
    };

    let server = run(listener, store as Arc<dyn Store>, jwt).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn health_check_works() {
    let address = spawn_app();
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/health_check", &address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}
