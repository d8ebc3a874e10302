/// Records persisted in the relational store.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub rating: i32,
    pub num_reviews: i32,
    pub price: f64,
    pub count_in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: i64,
    pub payment_method: String,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub user_id: Uuid,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Items live in their own table; a row maps to an order with no items
// attached and callers load them separately when needed.
impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Order {
            id: row.try_get("id")?,
            payment_method: row.try_get("payment_method")?,
            tax_price: row.try_get("tax_price")?,
            shipping_price: row.try_get("shipping_price")?,
            total_price: row.try_get("total_price")?,
            user_id: row.try_get("user_id")?,
            items: Vec::new(),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub name: String,
    pub quantity: i32,
    pub image: String,
    pub price: f64,
    pub product_id: i64,
    pub order_id: i64,
}

/// Server-side record tracking a refresh token's validity.
///
/// The row is keyed by the refresh token's unique claim id; it is what makes
/// logout and revocation possible even though the tokens themselves are
/// self-verifying.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub user_email: String,
    pub refresh_token: String,
    pub is_revoked: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Expiry is derived at use time, never stored as a state.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
