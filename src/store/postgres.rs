/// Postgres-backed store
///
/// One connection pool shared across workers; every method is a single
/// statement except the order operations, which wrap the order row and its
/// items in a transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::store::models::{Order, OrderItem, Product, Session, User};
use crate::store::Store;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn create_product(&self, mut product: Product) -> Result<Product, AppError> {
        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO products (name, image, category, description, rating, num_reviews, price, count_in_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, created_at
            "#,
        )
        .bind(&product.name)
        .bind(&product.image)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.rating)
        .bind(product.num_reviews)
        .bind(product.price)
        .bind(product.count_in_stock)
        .fetch_one(&self.pool)
        .await?;

        product.id = id;
        product.created_at = created_at;
        Ok(product)
    }

    async fn get_product(&self, id: i64) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, image, category, description, rating, num_reviews, price, count_in_stock, created_at, updated_at FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, image, category, description, rating, num_reviews, price, count_in_stock, created_at, updated_at FROM products",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn update_product(&self, product: Product) -> Result<Product, AppError> {
        sqlx::query(
            r#"
            UPDATE products
            SET name = $1, image = $2, category = $3, description = $4, rating = $5,
                num_reviews = $6, price = $7, count_in_stock = $8, updated_at = $9
            WHERE id = $10
            "#,
        )
        .bind(&product.name)
        .bind(&product.image)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.rating)
        .bind(product.num_reviews)
        .bind(product.price)
        .bind(product.count_in_stock)
        .bind(product.updated_at)
        .bind(product.id)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn create_order(&self, mut order: Order) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO orders (payment_method, tax_price, shipping_price, total_price, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at
            "#,
        )
        .bind(&order.payment_method)
        .bind(order.tax_price)
        .bind(order.shipping_price)
        .bind(order.total_price)
        .bind(order.user_id)
        .fetch_one(&mut tx)
        .await?;

        order.id = id;
        order.created_at = created_at;

        for item in order.items.iter_mut() {
            item.order_id = id;
            let (item_id,): (i64,) = sqlx::query_as(
                r#"
                INSERT INTO order_items (name, quantity, image, price, product_id, order_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
                "#,
            )
            .bind(&item.name)
            .bind(item.quantity)
            .bind(&item.image)
            .bind(item.price)
            .bind(item.product_id)
            .bind(item.order_id)
            .fetch_one(&mut tx)
            .await?;
            item.id = item_id;
        }

        tx.commit().await?;
        Ok(order)
    }

    async fn get_user_order(&self, user_id: Uuid) -> Result<Order, AppError> {
        let mut order = sqlx::query_as::<_, Order>(
            "SELECT id, payment_method, tax_price, shipping_price, total_price, user_id, created_at, updated_at FROM orders WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, name, quantity, image, price, product_id, order_id FROM order_items WHERE order_id = $1",
        )
        .bind(order.id)
        .fetch_all(&self.pool)
        .await?;

        order.items = items;
        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        // Items are not attached here.
        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, payment_method, tax_price, shipping_price, total_price, user_id, created_at, updated_at FROM orders",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn delete_order(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(id)
            .execute(&mut tx)
            .await?;
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn create_user(&self, mut user: User) -> Result<User, AppError> {
        user.id = Uuid::new_v4();

        let (created_at,): (DateTime<Utc>,) = sqlx::query_as(
            r#"
            INSERT INTO users (id, name, email, password_hash, is_admin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .fetch_one(&self.pool)
        .await?;

        user.created_at = created_at;
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, is_admin, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, is_admin, created_at, updated_at FROM users",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn update_user(&self, user: User) -> Result<User, AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $1, email = $2, password_hash = $3, is_admin = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn create_session(&self, session: Session) -> Result<Session, AppError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_email, refresh_token, is_revoked, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&session.id)
        .bind(&session.user_email)
        .bind(&session.refresh_token)
        .bind(session.is_revoked)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(session)
    }

    async fn get_session(&self, id: &str) -> Result<Session, AppError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, user_email, refresh_token, is_revoked, created_at, expires_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    async fn revoke_session(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE sessions SET is_revoked = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_session(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
