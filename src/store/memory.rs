/// In-memory store
///
/// HashMaps behind async RwLocks, one per record type. Used by the
/// integration tests to run the full HTTP stack without a database; the
/// observable behavior mirrors `PostgresStore`, including surfacing missing
/// records as store-level NotFound.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, DatabaseError};
use crate::store::models::{Order, Product, Session, User};
use crate::store::Store;

#[derive(Default)]
pub struct InMemoryStore {
    products: RwLock<HashMap<i64, Product>>,
    orders: RwLock<HashMap<i64, Order>>,
    users: RwLock<HashMap<Uuid, User>>,
    sessions: RwLock<HashMap<String, Session>>,
    next_product_id: AtomicI64,
    next_order_id: AtomicI64,
    next_item_id: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(what: &str) -> AppError {
        AppError::Database(DatabaseError::NotFound(what.to_string()))
    }

    /// Number of live session records.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_product(&self, mut product: Product) -> Result<Product, AppError> {
        product.id = self.next_product_id.fetch_add(1, Ordering::SeqCst) + 1;
        product.created_at = Utc::now();
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: i64) -> Result<Product, AppError> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found("product"))
    }

    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let mut products: Vec<Product> = self.products.read().await.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn update_product(&self, product: Product) -> Result<Product, AppError> {
        let mut products = self.products.write().await;
        if !products.contains_key(&product.id) {
            return Err(Self::not_found("product"));
        }
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        self.products.write().await.remove(&id);
        Ok(())
    }

    async fn create_order(&self, mut order: Order) -> Result<Order, AppError> {
        order.id = self.next_order_id.fetch_add(1, Ordering::SeqCst) + 1;
        order.created_at = Utc::now();
        for item in order.items.iter_mut() {
            item.id = self.next_item_id.fetch_add(1, Ordering::SeqCst) + 1;
            item.order_id = order.id;
        }
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get_user_order(&self, user_id: Uuid) -> Result<Order, AppError> {
        self.orders
            .read()
            .await
            .values()
            .find(|o| o.user_id == user_id)
            .cloned()
            .ok_or_else(|| Self::not_found("order"))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        // Items are not attached here.
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .cloned()
            .map(|mut o| {
                o.items = Vec::new();
                o
            })
            .collect();
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    async fn delete_order(&self, id: i64) -> Result<(), AppError> {
        self.orders.write().await.remove(&id);
        Ok(())
    }

    async fn create_user(&self, mut user: User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
                user.email.clone(),
            )));
        }
        user.id = Uuid::new_v4();
        user.created_at = Utc::now();
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, AppError> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| Self::not_found("user"))
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update_user(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(Self::not_found("user"));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        self.users.write().await.remove(&id);
        Ok(())
    }

    async fn create_session(&self, session: Session) -> Result<Session, AppError> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: &str) -> Result<Session, AppError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found("session"))
    }

    async fn revoke_session(&self, id: &str) -> Result<(), AppError> {
        if let Some(session) = self.sessions.write().await.get_mut(id) {
            session.is_revoked = true;
        }
        Ok(())
    }

    async fn delete_session(&self, id: &str) -> Result<(), AppError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}
