use std::fmt::{self, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::Queryable;
use serde::Serialize;

use crate::types::ServiceError;

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: i32,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct MenuGroup {
    pub id: i64,
    pub name: String,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Menu {
    pub id: i64,
    pub name: String,
    pub price: i32,
    pub menu_group_id: i64,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct MenuProduct {
    pub id: i64,
    pub menu_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct OrderTable {
    pub id: i64,
    pub table_group_id: Option<i64>,
    pub number_of_guests: i32,
    pub is_empty: bool,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct TableGroup {
    pub id: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub order_table_id: i64,
    pub order_status: String,
    pub ordered_at: NaiveDateTime,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct OrderLineItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_id: i64,
    pub quantity: i32,
}

/// Lifecycle of an order. Stored as text in the `orders` table, parsed back
/// at the workflow boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Cooking,
    Meal,
    Completion,
}

impl OrderStatus {
    /// `Completion` is terminal; every other status may move anywhere.
    pub fn can_transition(&self) -> bool {
        !matches!(self, OrderStatus::Completion)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Cooking => "COOKING",
            OrderStatus::Meal => "MEAL",
            OrderStatus::Completion => "COMPLETION",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COOKING" => Ok(OrderStatus::Cooking),
            "MEAL" => Ok(OrderStatus::Meal),
            "COMPLETION" => Ok(OrderStatus::Completion),
            other => Err(ServiceError::invalid(format!(
                "Unknown order status '{other}'"
            ))),
        }
    }
}

// Response views assembled by the handlers after attaching child rows.

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub id: i64,
    pub name: String,
    pub price: i32,
    pub menu_group_id: i64,
    pub menu_products: Vec<MenuProduct>,
}

impl MenuResponse {
    pub fn new(menu: Menu, menu_products: Vec<MenuProduct>) -> Self {
        Self {
            id: menu.id,
            name: menu.name,
            price: menu.price,
            menu_group_id: menu.menu_group_id,
            menu_products,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TableGroupResponse {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub order_tables: Vec<OrderTable>,
}

impl TableGroupResponse {
    pub fn new(group: TableGroup, order_tables: Vec<OrderTable>) -> Self {
        Self {
            id: group.id,
            created_at: group.created_at,
            order_tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus;
    use std::str::FromStr;

    #[test]
    fn completion_is_the_only_terminal_status() {
        assert!(OrderStatus::Cooking.can_transition());
        assert!(OrderStatus::Meal.can_transition());
        assert!(!OrderStatus::Completion.can_transition());
    }

    #[test]
    fn status_text_round_trips() {
        for status in [
            OrderStatus::Cooking,
            OrderStatus::Meal,
            OrderStatus::Completion,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_text_is_rejected() {
        assert!(OrderStatus::from_str("DELIVERED").is_err());
        assert!(OrderStatus::from_str("cooking").is_err());
    }
}
