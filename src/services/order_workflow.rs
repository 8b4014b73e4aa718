//! Order lifecycle logic, kept apart from the diesel plumbing.
//!
//! The functions here only talk to the narrow store traits below, so the
//! validation rules can be exercised against an in-memory fake. The
//! diesel-backed implementation lives in `pg_handling` and runs inside the
//! per-request transaction.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::QueryResult;
use serde::{Deserialize, Serialize};

use crate::services::db_models::{Order, OrderLineItem, OrderStatus, OrderTable};
use crate::types::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineItemRequest {
    pub menu_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreateRequest {
    pub order_table_id: i64,
    pub order_line_items: Vec<OrderLineItemRequest>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub order_table_id: i64,
    pub order_status: String,
    pub ordered_at: NaiveDateTime,
    pub order_line_items: Vec<OrderLineItem>,
}

impl OrderResponse {
    fn new(order: Order, order_line_items: Vec<OrderLineItem>) -> Self {
        Self {
            id: order.id,
            order_table_id: order.order_table_id,
            order_status: order.order_status,
            ordered_at: order.ordered_at,
            order_line_items,
        }
    }
}

pub trait OrderStore {
    fn insert_order(&mut self, table_id: i64, status: OrderStatus) -> QueryResult<Order>;
    fn insert_line_item(
        &mut self,
        order_id: i64,
        menu_id: i64,
        quantity: i32,
    ) -> QueryResult<OrderLineItem>;
    fn find_order(&mut self, order_id: i64) -> QueryResult<Option<Order>>;
    fn all_orders(&mut self) -> QueryResult<Vec<Order>>;
    fn line_items_by_order(&mut self, order_id: i64) -> QueryResult<Vec<OrderLineItem>>;
    fn update_order_status(&mut self, order_id: i64, status: OrderStatus) -> QueryResult<Order>;
}

pub trait MenuLookup {
    /// Number of distinct menus matching the given ids.
    fn count_menus_by_ids(&mut self, menu_ids: &[i64]) -> QueryResult<i64>;
}

pub trait TableLookup {
    fn find_table(&mut self, table_id: i64) -> QueryResult<Option<OrderTable>>;
}

/// Validates and persists a new order. The order row is saved first so its
/// id exists, then every line item is saved individually against that id.
pub fn place_order<S>(store: &mut S, req: &OrderCreateRequest) -> Result<OrderResponse, ServiceError>
where
    S: OrderStore + MenuLookup + TableLookup,
{
    let line_items = &req.order_line_items;
    if line_items.is_empty() {
        return Err(ServiceError::invalid(
            "An order must contain at least one line item",
        ));
    }

    let menu_ids: Vec<i64> = line_items.iter().map(|item| item.menu_id).collect();
    let known_menus = store.count_menus_by_ids(&menu_ids)?;
    if known_menus != line_items.len() as i64 {
        return Err(ServiceError::invalid(
            "Order references an unknown or duplicate menu",
        ));
    }

    let table = store
        .find_table(req.order_table_id)?
        .ok_or_else(|| ServiceError::invalid(format!("No table with id {}", req.order_table_id)))?;
    if table.is_empty {
        return Err(ServiceError::invalid(
            "Cannot place an order against an empty table",
        ));
    }

    let order = store.insert_order(table.id, OrderStatus::Cooking)?;

    let mut persisted = Vec::with_capacity(line_items.len());
    for item in line_items {
        persisted.push(store.insert_line_item(order.id, item.menu_id, item.quantity)?);
    }

    Ok(OrderResponse::new(order, persisted))
}

pub fn list_orders<S: OrderStore>(store: &mut S) -> Result<Vec<OrderResponse>, ServiceError> {
    let mut responses = vec![];
    for order in store.all_orders()? {
        let line_items = store.line_items_by_order(order.id)?;
        responses.push(OrderResponse::new(order, line_items));
    }

    Ok(responses)
}

pub fn change_order_status<S: OrderStore>(
    store: &mut S,
    order_id: i64,
    new_status: OrderStatus,
) -> Result<OrderResponse, ServiceError> {
    let order = store
        .find_order(order_id)?
        .ok_or_else(|| ServiceError::invalid(format!("No order with id {order_id}")))?;

    let current = OrderStatus::from_str(&order.order_status)?;
    if !current.can_transition() {
        return Err(ServiceError::invalid(
            "Cannot change the status of a completed order",
        ));
    }

    let updated = store.update_order_status(order_id, new_status)?;
    let line_items = store.line_items_by_order(order_id)?;

    Ok(OrderResponse::new(updated, line_items))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Utc;

    use super::*;

    /// Backs all three store traits with plain vectors.
    #[derive(Default)]
    struct InMemoryPos {
        menu_ids: Vec<i64>,
        tables: Vec<OrderTable>,
        orders: Vec<Order>,
        line_items: Vec<OrderLineItem>,
    }

    impl InMemoryPos {
        fn with_menus_and_tables() -> Self {
            InMemoryPos {
                menu_ids: vec![1, 2],
                tables: vec![
                    OrderTable {
                        id: 1,
                        table_group_id: None,
                        number_of_guests: 4,
                        is_empty: false,
                    },
                    OrderTable {
                        id: 2,
                        table_group_id: None,
                        number_of_guests: 0,
                        is_empty: true,
                    },
                ],
                ..Default::default()
            }
        }
    }

    impl OrderStore for InMemoryPos {
        fn insert_order(&mut self, table_id: i64, status: OrderStatus) -> QueryResult<Order> {
            let order = Order {
                id: self.orders.len() as i64 + 1,
                order_table_id: table_id,
                order_status: status.to_string(),
                ordered_at: Utc::now().naive_utc(),
            };
            self.orders.push(order.clone());
            Ok(order)
        }

        fn insert_line_item(
            &mut self,
            order_id: i64,
            menu_id: i64,
            quantity: i32,
        ) -> QueryResult<OrderLineItem> {
            let item = OrderLineItem {
                id: self.line_items.len() as i64 + 1,
                order_id,
                menu_id,
                quantity,
            };
            self.line_items.push(item.clone());
            Ok(item)
        }

        fn find_order(&mut self, order_id: i64) -> QueryResult<Option<Order>> {
            Ok(self.orders.iter().find(|o| o.id == order_id).cloned())
        }

        fn all_orders(&mut self) -> QueryResult<Vec<Order>> {
            Ok(self.orders.clone())
        }

        fn line_items_by_order(&mut self, order_id: i64) -> QueryResult<Vec<OrderLineItem>> {
            Ok(self
                .line_items
                .iter()
                .filter(|item| item.order_id == order_id)
                .cloned()
                .collect())
        }

        fn update_order_status(
            &mut self,
            order_id: i64,
            status: OrderStatus,
        ) -> QueryResult<Order> {
            let order = self
                .orders
                .iter_mut()
                .find(|o| o.id == order_id)
                .expect("update target must exist");
            order.order_status = status.to_string();
            Ok(order.clone())
        }
    }

    impl MenuLookup for InMemoryPos {
        fn count_menus_by_ids(&mut self, menu_ids: &[i64]) -> QueryResult<i64> {
            let requested: HashSet<i64> = menu_ids.iter().copied().collect();
            Ok(self
                .menu_ids
                .iter()
                .filter(|id| requested.contains(id))
                .count() as i64)
        }
    }

    impl TableLookup for InMemoryPos {
        fn find_table(&mut self, table_id: i64) -> QueryResult<Option<OrderTable>> {
            Ok(self.tables.iter().find(|t| t.id == table_id).cloned())
        }
    }

    fn request(table_id: i64, items: &[(i64, i32)]) -> OrderCreateRequest {
        OrderCreateRequest {
            order_table_id: table_id,
            order_line_items: items
                .iter()
                .map(|&(menu_id, quantity)| OrderLineItemRequest { menu_id, quantity })
                .collect(),
        }
    }

    #[test]
    fn place_order_starts_cooking_with_the_requested_items() {
        let mut store = InMemoryPos::with_menus_and_tables();

        let resp = place_order(&mut store, &request(1, &[(1, 2), (2, 1)])).unwrap();

        assert_eq!(resp.order_table_id, 1);
        assert_eq!(resp.order_status, OrderStatus::Cooking.as_str());

        let mut pairs: Vec<(i64, i32)> = resp
            .order_line_items
            .iter()
            .map(|item| (item.menu_id, item.quantity))
            .collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(1, 2), (2, 1)]);
        assert!(resp.order_line_items.iter().all(|item| item.order_id == resp.id));
    }

    #[test]
    fn place_order_rejects_an_unknown_table() {
        let mut store = InMemoryPos::with_menus_and_tables();

        let result = place_order(&mut store, &request(99, &[(1, 1)]));

        assert!(matches!(result, Err(ServiceError::Invalid(_))));
        assert!(store.orders.is_empty());
    }

    #[test]
    fn place_order_rejects_an_empty_table() {
        let mut store = InMemoryPos::with_menus_and_tables();

        let result = place_order(&mut store, &request(2, &[(1, 1)]));

        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }

    #[test]
    fn place_order_rejects_an_unknown_menu() {
        let mut store = InMemoryPos::with_menus_and_tables();

        let result = place_order(&mut store, &request(1, &[(0, 1)]));

        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }

    #[test]
    fn place_order_rejects_duplicate_menu_references() {
        let mut store = InMemoryPos::with_menus_and_tables();

        let result = place_order(&mut store, &request(1, &[(1, 1), (1, 3)]));

        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }

    #[test]
    fn place_order_rejects_an_empty_line_item_list() {
        let mut store = InMemoryPos::with_menus_and_tables();

        let result = place_order(&mut store, &request(1, &[]));

        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }

    #[test]
    fn change_order_status_moves_cooking_to_meal() {
        let mut store = InMemoryPos::with_menus_and_tables();
        let created = place_order(&mut store, &request(1, &[(1, 1)])).unwrap();

        let resp = change_order_status(&mut store, created.id, OrderStatus::Meal).unwrap();

        assert_eq!(resp.order_status, OrderStatus::Meal.as_str());
        assert_eq!(resp.order_line_items.len(), 1);
    }

    #[test]
    fn change_order_status_rejects_an_unknown_order() {
        let mut store = InMemoryPos::with_menus_and_tables();

        let result = change_order_status(&mut store, 42, OrderStatus::Meal);

        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }

    #[test]
    fn completed_orders_refuse_every_transition() {
        let mut store = InMemoryPos::with_menus_and_tables();
        let created = place_order(&mut store, &request(1, &[(1, 1)])).unwrap();
        change_order_status(&mut store, created.id, OrderStatus::Completion).unwrap();

        for target in [OrderStatus::Cooking, OrderStatus::Meal, OrderStatus::Completion] {
            let result = change_order_status(&mut store, created.id, target);
            assert!(matches!(result, Err(ServiceError::Invalid(_))));
        }
    }

    #[test]
    fn list_orders_returns_every_order_with_its_items() {
        let mut store = InMemoryPos::with_menus_and_tables();
        place_order(&mut store, &request(1, &[(1, 1)])).unwrap();
        place_order(&mut store, &request(1, &[(2, 3)])).unwrap();

        let listed = list_orders(&mut store).unwrap();

        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|resp| !resp.order_line_items.is_empty()));
    }

    #[test]
    fn repeated_list_calls_are_equivalent() {
        let mut store = InMemoryPos::with_menus_and_tables();
        place_order(&mut store, &request(1, &[(1, 1), (2, 2)])).unwrap();

        let first = serde_json::to_value(list_orders(&mut store).unwrap()).unwrap();
        let second = serde_json::to_value(list_orders(&mut store).unwrap()).unwrap();

        assert_eq!(first, second);
    }
}
