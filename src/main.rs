use std::env;

use actix::{Addr, SyncArbiter};
use actix_cors::Cors;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use tracing::{error, info};

use services::db_utils::{get_db_pool, AppState, DbActor};

mod schema;
mod services;
mod types;

#[cfg(test)]
mod test;

/// Opens the store, brings the schema up to date and seeds it if empty.
/// Serving must not start against a partially migrated store, so any
/// failure here ends the process.
fn init_db() -> Addr<DbActor> {
    let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "lazzat-menu.db".to_owned());
    let pool = get_db_pool(&db_url).expect("failed to build the SQLite pool");

    {
        let mut conn = pool.get().expect("failed to open a bootstrap connection");
        if let Err(err) = services::bootstrap::init_schema(&mut conn) {
            error!("schema bootstrap failed: {err}");
            std::process::exit(1);
        }
        if let Err(err) = services::bootstrap::migrate_legacy_prices(&mut conn) {
            error!("refusing to serve a mixed schema: {err}");
            std::process::exit(1);
        }
        if let Err(err) = services::bootstrap::seed_if_empty(&mut conn) {
            error!("seeding the starter catalog failed: {err}");
            std::process::exit(1);
        }
    }

    SyncArbiter::start(4, move || DbActor(pool.clone()))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let db = init_db();
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_owned());
    info!("catalog ready, listening on {bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(Data::new(AppState { db: db.clone() }))
            .service(services::home_page)
            .service(
                web::scope("/api")
                    .service(services::healthcheck)
                    .service(services::menu_route::fetch_all_data)
                    .service(services::settings_route::save_settings)
                    .service(
                        web::scope("/branches")
                            .service(services::branches_route::add_branch)
                            .service(services::branches_route::update_branch)
                            .service(services::branches_route::delete_branch),
                    )
                    .service(
                        web::scope("/categories")
                            .service(services::categories_route::add_category)
                            .service(services::categories_route::update_category)
                            .service(services::categories_route::delete_category),
                    )
                    .service(
                        web::scope("/items")
                            .service(services::items_route::add_item)
                            .service(services::items_route::update_item)
                            .service(services::items_route::set_item_active)
                            .service(services::items_route::delete_item),
                    ),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
