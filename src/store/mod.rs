/// Persistence layer
///
/// The `Store` trait is the repository contract the handlers are written
/// against: plain record-level operations, each atomic on a single row (or a
/// single order-with-items transaction). `PostgresStore` is the production
/// implementation; `InMemoryStore` backs the integration tests.

mod memory;
mod models;
mod postgres;

pub use memory::InMemoryStore;
pub use models::{Order, OrderItem, Product, Session, User};
pub use postgres::PostgresStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;

#[async_trait]
pub trait Store: Send + Sync {
    // Products
    async fn create_product(&self, product: Product) -> Result<Product, AppError>;
    async fn get_product(&self, id: i64) -> Result<Product, AppError>;
    async fn list_products(&self) -> Result<Vec<Product>, AppError>;
    async fn update_product(&self, product: Product) -> Result<Product, AppError>;
    async fn delete_product(&self, id: i64) -> Result<(), AppError>;

    // Orders
    async fn create_order(&self, order: Order) -> Result<Order, AppError>;
    async fn get_user_order(&self, user_id: Uuid) -> Result<Order, AppError>;
    async fn list_orders(&self) -> Result<Vec<Order>, AppError>;
    async fn delete_order(&self, id: i64) -> Result<(), AppError>;

    // Users
    async fn create_user(&self, user: User) -> Result<User, AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn update_user(&self, user: User) -> Result<User, AppError>;
    async fn delete_user(&self, id: Uuid) -> Result<(), AppError>;

    // Sessions
    async fn create_session(&self, session: Session) -> Result<Session, AppError>;
    async fn get_session(&self, id: &str) -> Result<Session, AppError>;
    async fn revoke_session(&self, id: &str) -> Result<(), AppError>;
    async fn delete_session(&self, id: &str) -> Result<(), AppError>;
}
