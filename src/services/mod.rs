use actix_web::{get, HttpResponse, Responder};

pub mod db_models;
pub mod db_utils;
pub mod insertable;
pub mod messages;
pub mod order_workflow;
pub mod pg_handling;

#[get("/")]
pub async fn home_page() -> impl Responder {
    HttpResponse::Ok().body("Restaurant POS backend")
}

// sub-route "/api/products"
pub mod product_route {
    use actix_web::web::{Data, Json};
    use actix_web::{get, post, HttpResponse, Responder};
    use serde::Deserialize;

    use crate::services::db_utils::AppState;
    use crate::services::messages::{CreateProduct, FetchProducts};
    use crate::types::ServiceError;

    #[derive(Deserialize)]
    pub struct CreateProductBody {
        pub name: String,
        pub price: i32,
    }

    #[post("")]
    pub async fn create_product(state: Data<AppState>, body: Json<CreateProductBody>) -> impl Responder {
        match state.pg_db.send(CreateProduct {
            name: body.name.clone(),
            price: body.price,
        }).await {
            Ok(Ok(resp)) => HttpResponse::Created()
                .insert_header(("Location", format!("/api/products/{}", resp.id)))
                .json(resp),
            Ok(Err(ServiceError::Invalid(msg))) => HttpResponse::BadRequest().json(msg),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
        }
    }

    #[get("")]
    pub async fn fetch_products(state: Data<AppState>) -> impl Responder {
        match state.pg_db.send(FetchProducts).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to fetch products: {err}")),
        }
    }
}

// sub-route "/api/menu-groups"
pub mod menu_group_route {
    use actix_web::web::{Data, Json};
    use actix_web::{get, post, HttpResponse, Responder};
    use serde::Deserialize;

    use crate::services::db_utils::AppState;
    use crate::services::messages::{CreateMenuGroup, FetchMenuGroups};
    use crate::types::ServiceError;

    #[derive(Deserialize)]
    pub struct CreateMenuGroupBody {
        pub name: String,
    }

    #[post("")]
    pub async fn create_menu_group(state: Data<AppState>, body: Json<CreateMenuGroupBody>) -> impl Responder {
        match state.pg_db.send(CreateMenuGroup { name: body.name.clone() }).await {
            Ok(Ok(resp)) => HttpResponse::Created()
                .insert_header(("Location", format!("/api/menu-groups/{}", resp.id)))
                .json(resp),
            Ok(Err(ServiceError::Invalid(msg))) => HttpResponse::BadRequest().json(msg),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
        }
    }

    #[get("")]
    pub async fn fetch_menu_groups(state: Data<AppState>) -> impl Responder {
        match state.pg_db.send(FetchMenuGroups).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to fetch menu groups: {err}")),
        }
    }
}

// sub-route "/api/menus"
pub mod menu_route {
    use actix_web::web::{Data, Json};
    use actix_web::{get, post, HttpResponse, Responder};
    use serde::Deserialize;

    use crate::services::db_utils::AppState;
    use crate::services::messages::{CreateMenu, FetchMenus, MenuProductRequest};
    use crate::types::ServiceError;

    #[derive(Deserialize)]
    pub struct CreateMenuBody {
        pub name: String,
        pub price: i32,
        pub menu_group_id: i64,
        pub menu_products: Vec<MenuProductRequest>,
    }

    #[post("")]
    pub async fn create_menu(state: Data<AppState>, body: Json<CreateMenuBody>) -> impl Responder {
        match state.pg_db.send(CreateMenu {
            name: body.name.clone(),
            price: body.price,
            menu_group_id: body.menu_group_id,
            menu_products: body.menu_products.clone(),
        }).await {
            Ok(Ok(resp)) => HttpResponse::Created()
                .insert_header(("Location", format!("/api/menus/{}", resp.id)))
                .json(resp),
            Ok(Err(ServiceError::Invalid(msg))) => HttpResponse::BadRequest().json(msg),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
        }
    }

    #[get("")]
    pub async fn fetch_menus(state: Data<AppState>) -> impl Responder {
        match state.pg_db.send(FetchMenus).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to fetch menus: {err}")),
        }
    }
}

// sub-route "/api/tables"
pub mod table_route {
    use actix_web::web::{Data, Json, Path};
    use actix_web::{get, post, put, HttpResponse, Responder};
    use serde::Deserialize;

    use crate::services::db_utils::AppState;
    use crate::services::messages::{ChangeTableEmpty, ChangeTableGuests, CreateTable, FetchTables};
    use crate::types::ServiceError;

    #[derive(Deserialize)]
    pub struct CreateTableBody {
        pub number_of_guests: i32,
        pub empty: bool,
    }

    #[post("")]
    pub async fn create_table(state: Data<AppState>, body: Json<CreateTableBody>) -> impl Responder {
        match state.pg_db.send(CreateTable {
            number_of_guests: body.number_of_guests,
            empty: body.empty,
        }).await {
            Ok(Ok(resp)) => HttpResponse::Created()
                .insert_header(("Location", format!("/api/tables/{}", resp.id)))
                .json(resp),
            Ok(Err(ServiceError::Invalid(msg))) => HttpResponse::BadRequest().json(msg),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
        }
    }

    #[get("")]
    pub async fn fetch_tables(state: Data<AppState>) -> impl Responder {
        match state.pg_db.send(FetchTables).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to fetch tables: {err}")),
        }
    }

    #[derive(Deserialize)]
    pub struct ChangeEmptyBody {
        pub empty: bool,
    }

    #[put("/{table_id}/empty")]
    pub async fn change_empty(
        state: Data<AppState>,
        path: Path<i64>,
        body: Json<ChangeEmptyBody>,
    ) -> impl Responder {
        match state.pg_db.send(ChangeTableEmpty {
            table_id: path.into_inner(),
            empty: body.empty,
        }).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(ServiceError::Invalid(msg))) => HttpResponse::BadRequest().json(msg),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
        }
    }

    #[derive(Deserialize)]
    pub struct ChangeGuestsBody {
        pub number_of_guests: i32,
    }

    #[put("/{table_id}/number-of-guests")]
    pub async fn change_number_of_guests(
        state: Data<AppState>,
        path: Path<i64>,
        body: Json<ChangeGuestsBody>,
    ) -> impl Responder {
        match state.pg_db.send(ChangeTableGuests {
            table_id: path.into_inner(),
            number_of_guests: body.number_of_guests,
        }).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(ServiceError::Invalid(msg))) => HttpResponse::BadRequest().json(msg),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
        }
    }
}

// sub-route "/api/table-groups"
pub mod table_group_route {
    use actix_web::web::{Data, Json, Path};
    use actix_web::{delete, post, HttpResponse, Responder};
    use serde::Deserialize;

    use crate::services::db_utils::AppState;
    use crate::services::messages::{CreateTableGroup, UngroupTables};
    use crate::types::ServiceError;

    #[derive(Deserialize)]
    pub struct CreateTableGroupBody {
        pub order_table_ids: Vec<i64>,
    }

    #[post("")]
    pub async fn create_table_group(
        state: Data<AppState>,
        body: Json<CreateTableGroupBody>,
    ) -> impl Responder {
        match state.pg_db.send(CreateTableGroup {
            table_ids: body.order_table_ids.clone(),
        }).await {
            Ok(Ok(resp)) => HttpResponse::Created()
                .insert_header(("Location", format!("/api/table-groups/{}", resp.id)))
                .json(resp),
            Ok(Err(ServiceError::Invalid(msg))) => HttpResponse::BadRequest().json(msg),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
        }
    }

    #[delete("/{group_id}")]
    pub async fn ungroup(state: Data<AppState>, path: Path<i64>) -> impl Responder {
        match state.pg_db.send(UngroupTables(path.into_inner())).await {
            Ok(Ok(())) => HttpResponse::NoContent().finish(),
            Ok(Err(ServiceError::Invalid(msg))) => HttpResponse::BadRequest().json(msg),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
        }
    }
}

// sub-route "/api/orders"
pub mod order_route {
    use std::str::FromStr;

    use actix_web::web::{Data, Json, Path};
    use actix_web::{get, post, put, HttpResponse, Responder};
    use serde::Deserialize;

    use crate::services::db_models::OrderStatus;
    use crate::services::db_utils::AppState;
    use crate::services::messages::{ChangeOrderStatus, FetchOrders, PlaceOrder};
    use crate::services::order_workflow::OrderCreateRequest;
    use crate::types::ServiceError;

    #[post("")]
    pub async fn place_order(state: Data<AppState>, body: Json<OrderCreateRequest>) -> impl Responder {
        match state.pg_db.send(PlaceOrder(body.into_inner())).await {
            Ok(Ok(resp)) => HttpResponse::Created()
                .insert_header(("Location", format!("/api/orders/{}", resp.id)))
                .json(resp),
            Ok(Err(ServiceError::Invalid(msg))) => HttpResponse::BadRequest().json(msg),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => {
                tracing::error!("pg actor mailbox error: {err}");
                HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}"))
            }
        }
    }

    #[get("")]
    pub async fn fetch_orders(state: Data<AppState>) -> impl Responder {
        match state.pg_db.send(FetchOrders).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => {
                tracing::error!("pg actor mailbox error: {err}");
                HttpResponse::InternalServerError().json(format!("Unable to fetch orders: {err}"))
            }
        }
    }

    #[derive(Deserialize)]
    pub struct OrderStatusBody {
        pub order_status: String,
    }

    #[put("/{order_id}/order-status")]
    pub async fn change_order_status(
        state: Data<AppState>,
        path: Path<i64>,
        body: Json<OrderStatusBody>,
    ) -> impl Responder {
        let status = match OrderStatus::from_str(&body.order_status) {
            Ok(val) => val,
            Err(err) => return HttpResponse::BadRequest().json(err.to_string()),
        };

        match state.pg_db.send(ChangeOrderStatus {
            order_id: path.into_inner(),
            status,
        }).await {
            Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
            Ok(Err(ServiceError::Invalid(msg))) => HttpResponse::BadRequest().json(msg),
            Ok(Err(err)) => HttpResponse::InternalServerError().json(err.to_string()),
            Err(err) => {
                tracing::error!("pg actor mailbox error: {err}");
                HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}"))
            }
        }
    }
}
