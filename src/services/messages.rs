use actix::Message;
use serde::Deserialize;

use crate::services::db_models::{
    MenuGroup, MenuResponse, OrderStatus, OrderTable, Product, TableGroupResponse,
};
use crate::services::order_workflow::{OrderCreateRequest, OrderResponse};
use crate::types::ServiceError;

#[derive(Message)]
#[rtype(result = "Result<Product, ServiceError>")]
pub struct CreateProduct {
    pub name: String,
    pub price: i32,
}

#[derive(Message)]
#[rtype(result = "Result<Vec<Product>, ServiceError>")]
pub struct FetchProducts;

#[derive(Message)]
#[rtype(result = "Result<MenuGroup, ServiceError>")]
pub struct CreateMenuGroup {
    pub name: String,
}

#[derive(Message)]
#[rtype(result = "Result<Vec<MenuGroup>, ServiceError>")]
pub struct FetchMenuGroups;

#[derive(Debug, Clone, Deserialize)]
pub struct MenuProductRequest {
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Message)]
#[rtype(result = "Result<MenuResponse, ServiceError>")]
pub struct CreateMenu {
    pub name: String,
    pub price: i32,
    pub menu_group_id: i64,
    pub menu_products: Vec<MenuProductRequest>,
}

#[derive(Message)]
#[rtype(result = "Result<Vec<MenuResponse>, ServiceError>")]
pub struct FetchMenus;

#[derive(Message)]
#[rtype(result = "Result<OrderTable, ServiceError>")]
pub struct CreateTable {
    pub number_of_guests: i32,
    pub empty: bool,
}

#[derive(Message)]
#[rtype(result = "Result<Vec<OrderTable>, ServiceError>")]
pub struct FetchTables;

#[derive(Message)]
#[rtype(result = "Result<OrderTable, ServiceError>")]
pub struct ChangeTableEmpty {
    pub table_id: i64,
    pub empty: bool,
}

#[derive(Message)]
#[rtype(result = "Result<OrderTable, ServiceError>")]
pub struct ChangeTableGuests {
    pub table_id: i64,
    pub number_of_guests: i32,
}

#[derive(Message)]
#[rtype(result = "Result<TableGroupResponse, ServiceError>")]
pub struct CreateTableGroup {
    pub table_ids: Vec<i64>,
}

#[derive(Message)]
#[rtype(result = "Result<(), ServiceError>")]
pub struct UngroupTables(pub i64);

#[derive(Message)]
#[rtype(result = "Result<OrderResponse, ServiceError>")]
pub struct PlaceOrder(pub OrderCreateRequest);

#[derive(Message)]
#[rtype(result = "Result<Vec<OrderResponse>, ServiceError>")]
pub struct FetchOrders;

#[derive(Message)]
#[rtype(result = "Result<OrderResponse, ServiceError>")]
pub struct ChangeOrderStatus {
    pub order_id: i64,
    pub status: OrderStatus,
}
