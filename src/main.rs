use actix::{Addr, SyncArbiter};
use actix_cors::Cors;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use services::db_utils::{get_db_pool, AppState, PgActor};
use settings::Settings;

mod schema;
mod services;
mod settings;
mod types;

fn init_pg_db(settings: &Settings) -> Addr<PgActor> {
    let pool = get_db_pool(&settings.pg_database_url).expect("failed to build postgres pool");

    SyncArbiter::start(settings.pg_workers, move || PgActor(pool.clone()))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load().expect("invalid configuration");
    let pg_db = init_pg_db(&settings);

    tracing::info!(addr = %settings.bind_addr, pg_workers = settings.pg_workers, "starting POS backend");

    let bind_addr = settings.bind_addr.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(Data::new(AppState { pg_db: pg_db.clone() }))
            .service(services::home_page)
            .service(
                web::scope("/api/products")
                    .service(services::product_route::create_product)
                    .service(services::product_route::fetch_products),
            )
            .service(
                web::scope("/api/menu-groups")
                    .service(services::menu_group_route::create_menu_group)
                    .service(services::menu_group_route::fetch_menu_groups),
            )
            .service(
                web::scope("/api/menus")
                    .service(services::menu_route::create_menu)
                    .service(services::menu_route::fetch_menus),
            )
            .service(
                web::scope("/api/tables")
                    .service(services::table_route::create_table)
                    .service(services::table_route::fetch_tables)
                    .service(services::table_route::change_empty)
                    .service(services::table_route::change_number_of_guests),
            )
            .service(
                web::scope("/api/table-groups")
                    .service(services::table_group_route::create_table_group)
                    .service(services::table_group_route::ungroup),
            )
            .service(
                web::scope("/api/orders")
                    .service(services::order_route::place_order)
                    .service(services::order_route::fetch_orders)
                    .service(services::order_route::change_order_status),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
