use chrono::NaiveDateTime;
use diesel::Insertable;
use serde::Serialize;

use crate::schema::menu_groups;
use crate::schema::menu_products;
use crate::schema::menus;
use crate::schema::order_line_items;
use crate::schema::order_tables;
use crate::schema::orders;
use crate::schema::products;
use crate::schema::table_groups;

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = products)]
pub struct NewProduct {
    pub name: String,
    pub price: i32,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = menu_groups)]
pub struct NewMenuGroup {
    pub name: String,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = menus)]
pub struct NewMenu {
    pub name: String,
    pub price: i32,
    pub menu_group_id: i64,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = menu_products)]
pub struct MenuProductMapping {
    pub menu_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = order_tables)]
pub struct NewOrderTable {
    pub table_group_id: Option<i64>,
    pub number_of_guests: i32,
    pub is_empty: bool,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = table_groups)]
pub struct NewTableGroup {
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub order_table_id: i64,
    pub order_status: String,
    pub ordered_at: NaiveDateTime,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = order_line_items)]
pub struct NewOrderLineItem {
    pub order_id: i64,
    pub menu_id: i64,
    pub quantity: i32,
}
