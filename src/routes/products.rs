/// Product endpoints
///
/// Catalog reads are public; writes are admin-only.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::AdminUser;
use crate::store::{Product, Store};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: i32,
    #[serde(default)]
    pub num_reviews: i32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub count_in_stock: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
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

impl From<&Product> for ProductResponse {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            image: p.image.clone(),
            category: p.category.clone(),
            description: p.description.clone(),
            rating: p.rating,
            num_reviews: p.num_reviews,
            price: p.price,
            count_in_stock: p.count_in_stock,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// GET /products
pub async fn list_products(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let products = store.list_products().await?;

    let res: Vec<ProductResponse> = products.iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(res))
}

/// GET /products/{id}
pub async fn get_product(
    path: web::Path<i64>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let product = store.get_product(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ProductResponse::from(&product)))
}

/// POST /products (admin)
pub async fn create_product(
    _admin: AdminUser,
    form: web::Json<ProductRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let product = store
        .create_product(Product {
            id: 0,
            name: form.name.clone(),
            image: form.image.clone(),
            category: form.category.clone(),
            description: form.description.clone(),
            rating: form.rating,
            num_reviews: form.num_reviews,
            price: form.price,
            count_in_stock: form.count_in_stock,
            created_at: Utc::now(),
            updated_at: None,
        })
        .await?;

    tracing::info!(product_id = product.id, "Product created");

    Ok(HttpResponse::Ok().json(ProductResponse::from(&product)))
}

/// PATCH /products/{id} (admin)
pub async fn update_product(
    _admin: AdminUser,
    path: web::Path<i64>,
    form: web::Json<ProductRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let mut product = store.get_product(path.into_inner()).await?;

    patch_product(&mut product, &form);
    product.updated_at = Some(Utc::now());

    let updated = store.update_product(product).await?;

    Ok(HttpResponse::Ok().json(ProductResponse::from(&updated)))
}

/// DELETE /products/{id} (admin)
pub async fn delete_product(
    _admin: AdminUser,
    path: web::Path<i64>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    store.delete_product(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

// Only supplied (non-empty, non-zero) fields overwrite the stored record.
fn patch_product(product: &mut Product, req: &ProductRequest) {
    if !req.name.is_empty() {
        product.name = req.name.clone();
    }
    if !req.image.is_empty() {
        product.image = req.image.clone();
    }
    if !req.category.is_empty() {
        product.category = req.category.clone();
    }
    if !req.description.is_empty() {
        product.description = req.description.clone();
    }
    if req.rating != 0 {
        product.rating = req.rating;
    }
    if req.num_reviews != 0 {
        product.num_reviews = req.num_reviews;
    }
    if req.price != 0.0 {
        product.price = req.price;
    }
    if req.count_in_stock != 0 {
        product.count_in_stock = req.count_in_stock;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing_product() -> Product {
        Product {
            id: 1,
            name: "Widget".to_string(),
            image: "widget.png".to_string(),
            category: "tools".to_string(),
            description: "A widget".to_string(),
            rating: 4,
            num_reviews: 10,
            price: 9.99,
            count_in_stock: 5,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn patch_overwrites_only_supplied_fields() {
        let mut product = existing_product();
        let req = ProductRequest {
            name: "Gadget".to_string(),
            image: String::new(),
            category: String::new(),
            description: String::new(),
            rating: 0,
            num_reviews: 0,
            price: 19.99,
            count_in_stock: 0,
        };

        patch_product(&mut product, &req);

        assert_eq!(product.name, "Gadget");
        assert_eq!(product.image, "widget.png");
        assert_eq!(product.rating, 4);
        assert_eq!(product.price, 19.99);
        assert_eq!(product.count_in_stock, 5);
    }
}
