/// Order endpoints
///
/// Orders always belong to the authenticated caller; the admin listing
/// returns every order without items attached.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::{AdminUser, AuthenticatedUser};
use crate::store::{Order, OrderItem, Store};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub payment_method: String,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub name: String,
    pub quantity: i32,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    pub product_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub payment_method: String,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub name: String,
    pub quantity: i32,
    pub image: String,
    pub price: f64,
    pub product_id: i64,
}

impl From<&Order> for OrderResponse {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id,
            payment_method: o.payment_method.clone(),
            tax_price: o.tax_price,
            shipping_price: o.shipping_price,
            total_price: o.total_price,
            items: o
                .items
                .iter()
                .map(|item| OrderItemResponse {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    image: item.image.clone(),
                    price: item.price,
                    product_id: item.product_id,
                })
                .collect(),
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

/// POST /orders
pub async fn create_order(
    user: AuthenticatedUser,
    form: web::Json<OrderRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let claims = user.0;
    let user_id = claims.user_id()?;

    let items = form
        .items
        .iter()
        .map(|item| OrderItem {
            id: 0,
            name: item.name.clone(),
            quantity: item.quantity,
            image: item.image.clone(),
            price: item.price,
            product_id: item.product_id,
            order_id: 0,
        })
        .collect();

    let order = store
        .create_order(Order {
            id: 0,
            payment_method: form.payment_method.clone(),
            tax_price: form.tax_price,
            shipping_price: form.shipping_price,
            total_price: form.total_price,
            user_id,
            items,
            created_at: Utc::now(),
            updated_at: None,
        })
        .await?;

    tracing::info!(order_id = order.id, user_id = %user_id, "Order created");

    Ok(HttpResponse::Ok().json(OrderResponse::from(&order)))
}

/// GET /myorder
pub async fn get_my_order(
    user: AuthenticatedUser,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.0.user_id()?;
    let order = store.get_user_order(user_id).await?;

    Ok(HttpResponse::Ok().json(OrderResponse::from(&order)))
}

/// GET /orders (admin)
pub async fn list_orders(
    _admin: AdminUser,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let orders = store.list_orders().await?;

    let res: Vec<OrderResponse> = orders.iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(res))
}

/// DELETE /orders/{id}
pub async fn delete_order(
    _user: AuthenticatedUser,
    path: web::Path<i64>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    store.delete_order(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
