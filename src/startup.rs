use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::TokenService;
use crate::configuration::JwtSettings;
use crate::logger::RequestLogger;
use crate::routes::{
    create_order, create_product, create_user, delete_order, delete_product, delete_user,
    get_my_order, get_product, health_check, list_orders, list_products, list_users, login,
    logout, renew_access_token, revoke_session, update_product, update_user,
};
use crate::store::Store;

/// Assemble and start the HTTP server.
///
/// The router is constructed here and nowhere else; the store and the token
/// service are the only shared state, both read-only handles.
pub fn run(
    listener: TcpListener,
    store: Arc<dyn Store>,
    jwt_settings: JwtSettings,
) -> Result<Server, std::io::Error> {
    let token_service = web::Data::new(TokenService::new(&jwt_settings.secret));
    let store = web::Data::from(store);
    let jwt_settings = web::Data::new(jwt_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(RequestLogger)
            .app_data(store.clone())
            .app_data(token_service.clone())
            .app_data(jwt_settings.clone())
            .route("/health_check", web::get().to(health_check))
            // Users & sessions
            .route("/users", web::post().to(create_user))
            .route("/users", web::get().to(list_users))
            .route("/users", web::patch().to(update_user))
            .route("/users/login", web::post().to(login))
            .route("/users/logout", web::post().to(logout))
            .route("/users/{id}", web::delete().to(delete_user))
            // Tokens
            .route("/tokens/renew", web::post().to(renew_access_token))
            .route("/tokens/revoke", web::post().to(revoke_session))
            // Products
            .route("/products", web::get().to(list_products))
            .route("/products", web::post().to(create_product))
            .route("/products/{id}", web::get().to(get_product))
            .route("/products/{id}", web::patch().to(update_product))
            .route("/products/{id}", web::delete().to(delete_product))
            // Orders
            .route("/orders", web::post().to(create_order))
            .route("/orders", web::get().to(list_orders))
            .route("/orders/{id}", web::delete().to(delete_order))
            .route("/myorder", web::get().to(get_my_order))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
