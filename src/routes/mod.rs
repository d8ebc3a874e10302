mod auth;
mod health_check;
mod orders;
mod products;
mod users;

pub use auth::{login, logout, renew_access_token, revoke_session};
pub use health_check::health_check;
pub use orders::{create_order, delete_order, get_my_order, list_orders};
pub use products::{create_product, delete_product, get_product, list_products, update_product};
pub use users::{create_user, delete_user, list_users, update_user};
