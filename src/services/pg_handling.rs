use actix::Handler;
use chrono::Utc;
use diesel::{
    r2d2::{ConnectionManager, Pool, PooledConnection},
    result::{DatabaseErrorKind, Error},
    ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, QueryResult, RunQueryDsl,
};

use crate::services::db_models::{
    Menu, MenuGroup, MenuProduct, MenuResponse, Order, OrderLineItem, OrderStatus, OrderTable,
    Product, TableGroup, TableGroupResponse,
};
use crate::services::db_utils::PgActor;
use crate::services::insertable::{
    MenuProductMapping, NewMenu, NewMenuGroup, NewOrder, NewOrderLineItem, NewOrderTable,
    NewProduct, NewTableGroup,
};
use crate::services::messages::{
    ChangeOrderStatus, ChangeTableEmpty, ChangeTableGuests, CreateMenu, CreateMenuGroup,
    CreateProduct, CreateTable, CreateTableGroup, FetchMenuGroups, FetchMenus, FetchOrders,
    FetchProducts, FetchTables, PlaceOrder, UngroupTables,
};
use crate::services::order_workflow::{
    self, MenuLookup, OrderStore, TableLookup,
};
use crate::types::ServiceError;

fn establish_connection(
    pool: &Pool<ConnectionManager<PgConnection>>,
) -> Result<PooledConnection<ConnectionManager<PgConnection>>, Error> {
    match pool.get() {
        Ok(val) => Ok(val),
        Err(_) => Err(connection_err()),
    }
}

fn connection_err() -> Error {
    Error::DatabaseError(
        DatabaseErrorKind::ClosedConnection,
        Box::new("Failed to establish connection".to_owned()),
    )
}

// Statuses that keep a table occupied.
fn active_statuses() -> Vec<String> {
    vec![
        OrderStatus::Cooking.to_string(),
        OrderStatus::Meal.to_string(),
    ]
}

/// Diesel-backed implementation of the order workflow's store traits.
/// Borrows the connection of the surrounding request (or transaction).
struct PgStores<'a> {
    conn: &'a mut PgConnection,
}

impl OrderStore for PgStores<'_> {
    fn insert_order(&mut self, table_id: i64, status: OrderStatus) -> QueryResult<Order> {
        use crate::schema::orders::dsl::orders;

        diesel::insert_into(orders)
            .values(NewOrder {
                order_table_id: table_id,
                order_status: status.to_string(),
                ordered_at: Utc::now().naive_utc(),
            })
            .get_result::<Order>(self.conn)
    }

    fn insert_line_item(
        &mut self,
        order_pk: i64,
        menu_pk: i64,
        item_quantity: i32,
    ) -> QueryResult<OrderLineItem> {
        use crate::schema::order_line_items::dsl::order_line_items;

        diesel::insert_into(order_line_items)
            .values(NewOrderLineItem {
                order_id: order_pk,
                menu_id: menu_pk,
                quantity: item_quantity,
            })
            .get_result::<OrderLineItem>(self.conn)
    }

    fn find_order(&mut self, order_pk: i64) -> QueryResult<Option<Order>> {
        use crate::schema::orders::dsl::orders;

        orders.find(order_pk).first::<Order>(self.conn).optional()
    }

    fn all_orders(&mut self) -> QueryResult<Vec<Order>> {
        use crate::schema::orders::dsl::orders;

        orders.get_results::<Order>(self.conn)
    }

    fn line_items_by_order(&mut self, order_pk: i64) -> QueryResult<Vec<OrderLineItem>> {
        use crate::schema::order_line_items::{dsl::order_line_items, order_id};

        order_line_items
            .filter(order_id.eq(order_pk))
            .get_results::<OrderLineItem>(self.conn)
    }

    fn update_order_status(&mut self, order_pk: i64, status: OrderStatus) -> QueryResult<Order> {
        use crate::schema::orders::{dsl::orders, order_status};

        diesel::update(orders.find(order_pk))
            .set(order_status.eq(status.to_string()))
            .get_result::<Order>(self.conn)
    }
}

impl MenuLookup for PgStores<'_> {
    fn count_menus_by_ids(&mut self, menu_ids: &[i64]) -> QueryResult<i64> {
        use crate::schema::menus::{dsl::menus, id};

        menus
            .filter(id.eq_any(menu_ids.iter().copied()))
            .count()
            .get_result::<i64>(self.conn)
    }
}

impl TableLookup for PgStores<'_> {
    fn find_table(&mut self, table_pk: i64) -> QueryResult<Option<OrderTable>> {
        use crate::schema::order_tables::dsl::order_tables;

        order_tables
            .find(table_pk)
            .first::<OrderTable>(self.conn)
            .optional()
    }
}

impl Handler<CreateProduct> for PgActor {
    type Result = Result<Product, ServiceError>;

    fn handle(&mut self, msg: CreateProduct, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::products::{dsl::products, id, name, price};

        if msg.price < 0 {
            return Err(ServiceError::invalid("Product price must not be negative"));
        }

        let mut conn = establish_connection(&self.0)?;

        let product = diesel::insert_into(products)
            .values(NewProduct {
                name: msg.name,
                price: msg.price,
            })
            .returning((id, name, price))
            .get_result::<Product>(&mut conn)?;

        Ok(product)
    }
}

impl Handler<FetchProducts> for PgActor {
    type Result = Result<Vec<Product>, ServiceError>;

    fn handle(&mut self, _msg: FetchProducts, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::products::dsl::products;

        let mut conn = establish_connection(&self.0)?;

        Ok(products.get_results::<Product>(&mut conn)?)
    }
}

impl Handler<CreateMenuGroup> for PgActor {
    type Result = Result<MenuGroup, ServiceError>;

    fn handle(&mut self, msg: CreateMenuGroup, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::menu_groups::{dsl::menu_groups, id, name};

        let mut conn = establish_connection(&self.0)?;

        let group = diesel::insert_into(menu_groups)
            .values(NewMenuGroup { name: msg.name })
            .returning((id, name))
            .get_result::<MenuGroup>(&mut conn)?;

        Ok(group)
    }
}

impl Handler<FetchMenuGroups> for PgActor {
    type Result = Result<Vec<MenuGroup>, ServiceError>;

    fn handle(&mut self, _msg: FetchMenuGroups, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::menu_groups::dsl::menu_groups;

        let mut conn = establish_connection(&self.0)?;

        Ok(menu_groups.get_results::<MenuGroup>(&mut conn)?)
    }
}

impl Handler<CreateMenu> for PgActor {
    type Result = Result<MenuResponse, ServiceError>;

    fn handle(&mut self, msg: CreateMenu, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::menu_groups::dsl::menu_groups;
        use crate::schema::menu_products::dsl::menu_products;
        use crate::schema::menus::dsl::menus;
        use crate::schema::products::dsl::products;

        if msg.price < 0 {
            return Err(ServiceError::invalid("Menu price must not be negative"));
        }

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let group = menu_groups
                .find(msg.menu_group_id)
                .first::<MenuGroup>(trx_conn)
                .optional()?;
            if group.is_none() {
                return Err(ServiceError::invalid(format!(
                    "No menu group with id {}",
                    msg.menu_group_id
                )));
            }

            // A menu must not cost more than its products bought separately.
            let mut products_total: i64 = 0;
            for entry in &msg.menu_products {
                let product = products
                    .find(entry.product_id)
                    .first::<Product>(trx_conn)
                    .optional()?
                    .ok_or_else(|| {
                        ServiceError::invalid(format!("No product with id {}", entry.product_id))
                    })?;

                products_total += product.price as i64 * entry.quantity as i64;
            }
            if msg.price as i64 > products_total {
                return Err(ServiceError::invalid(
                    "Menu price exceeds the total price of its products",
                ));
            }

            let menu = diesel::insert_into(menus)
                .values(NewMenu {
                    name: msg.name.clone(),
                    price: msg.price,
                    menu_group_id: msg.menu_group_id,
                })
                .get_result::<Menu>(trx_conn)?;

            let mut attached = Vec::with_capacity(msg.menu_products.len());
            for entry in &msg.menu_products {
                let mapping = diesel::insert_into(menu_products)
                    .values(MenuProductMapping {
                        menu_id: menu.id,
                        product_id: entry.product_id,
                        quantity: entry.quantity,
                    })
                    .get_result::<MenuProduct>(trx_conn)?;
                attached.push(mapping);
            }

            Ok(MenuResponse::new(menu, attached))
        })
    }
}

impl Handler<FetchMenus> for PgActor {
    type Result = Result<Vec<MenuResponse>, ServiceError>;

    fn handle(&mut self, _msg: FetchMenus, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::menu_products::{dsl::menu_products, menu_id};
        use crate::schema::menus::dsl::menus;

        let mut conn = establish_connection(&self.0)?;

        let all_menus = menus.get_results::<Menu>(&mut conn)?;

        let mut views = Vec::with_capacity(all_menus.len());
        for menu in all_menus {
            let attached = menu_products
                .filter(menu_id.eq(menu.id))
                .get_results::<MenuProduct>(&mut conn)?;
            views.push(MenuResponse::new(menu, attached));
        }

        Ok(views)
    }
}

impl Handler<CreateTable> for PgActor {
    type Result = Result<OrderTable, ServiceError>;

    fn handle(&mut self, msg: CreateTable, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::dsl::order_tables;

        let mut conn = establish_connection(&self.0)?;

        let table = diesel::insert_into(order_tables)
            .values(NewOrderTable {
                table_group_id: None,
                number_of_guests: msg.number_of_guests,
                is_empty: msg.empty,
            })
            .get_result::<OrderTable>(&mut conn)?;

        Ok(table)
    }
}

impl Handler<FetchTables> for PgActor {
    type Result = Result<Vec<OrderTable>, ServiceError>;

    fn handle(&mut self, _msg: FetchTables, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::dsl::order_tables;

        let mut conn = establish_connection(&self.0)?;

        Ok(order_tables.get_results::<OrderTable>(&mut conn)?)
    }
}

impl Handler<ChangeTableEmpty> for PgActor {
    type Result = Result<OrderTable, ServiceError>;

    fn handle(&mut self, msg: ChangeTableEmpty, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::{dsl::order_tables, is_empty};
        use crate::schema::orders::{dsl::orders, order_status, order_table_id};

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let table = order_tables
                .find(msg.table_id)
                .first::<OrderTable>(trx_conn)
                .optional()?
                .ok_or_else(|| {
                    ServiceError::invalid(format!("No table with id {}", msg.table_id))
                })?;

            if table.table_group_id.is_some() {
                return Err(ServiceError::invalid(
                    "Cannot change a table that belongs to a table group",
                ));
            }

            let open_orders: i64 = orders
                .filter(order_table_id.eq(msg.table_id))
                .filter(order_status.eq_any(active_statuses()))
                .count()
                .get_result(trx_conn)?;
            if open_orders > 0 {
                return Err(ServiceError::invalid(
                    "Table still has an order in progress",
                ));
            }

            let updated = diesel::update(order_tables.find(msg.table_id))
                .set(is_empty.eq(msg.empty))
                .get_result::<OrderTable>(trx_conn)?;

            Ok(updated)
        })
    }
}

impl Handler<ChangeTableGuests> for PgActor {
    type Result = Result<OrderTable, ServiceError>;

    fn handle(&mut self, msg: ChangeTableGuests, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::{dsl::order_tables, number_of_guests};

        if msg.number_of_guests < 0 {
            return Err(ServiceError::invalid(
                "Number of guests must not be negative",
            ));
        }

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let table = order_tables
                .find(msg.table_id)
                .first::<OrderTable>(trx_conn)
                .optional()?
                .ok_or_else(|| {
                    ServiceError::invalid(format!("No table with id {}", msg.table_id))
                })?;

            if table.is_empty {
                return Err(ServiceError::invalid(
                    "Cannot seat guests at an empty table",
                ));
            }

            let updated = diesel::update(order_tables.find(msg.table_id))
                .set(number_of_guests.eq(msg.number_of_guests))
                .get_result::<OrderTable>(trx_conn)?;

            Ok(updated)
        })
    }
}

impl Handler<CreateTableGroup> for PgActor {
    type Result = Result<TableGroupResponse, ServiceError>;

    fn handle(&mut self, msg: CreateTableGroup, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::{dsl::order_tables, id, is_empty, table_group_id};
        use crate::schema::table_groups::dsl::table_groups;

        if msg.table_ids.len() < 2 {
            return Err(ServiceError::invalid(
                "A table group needs at least two tables",
            ));
        }

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let found = order_tables
                .filter(id.eq_any(msg.table_ids.iter().copied()))
                .get_results::<OrderTable>(trx_conn)?;
            if found.len() != msg.table_ids.len() {
                return Err(ServiceError::invalid(
                    "Group references an unknown or duplicate table",
                ));
            }

            for table in &found {
                if !table.is_empty {
                    return Err(ServiceError::invalid("Only empty tables can be grouped"));
                }
                if table.table_group_id.is_some() {
                    return Err(ServiceError::invalid(
                        "Table already belongs to a table group",
                    ));
                }
            }

            let group = diesel::insert_into(table_groups)
                .values(NewTableGroup {
                    created_at: Utc::now().naive_utc(),
                })
                .get_result::<TableGroup>(trx_conn)?;

            // Grouping a table seats it.
            let mut members = Vec::with_capacity(found.len());
            for table in found {
                let member = diesel::update(order_tables.find(table.id))
                    .set((table_group_id.eq(group.id), is_empty.eq(false)))
                    .get_result::<OrderTable>(trx_conn)?;
                members.push(member);
            }

            Ok(TableGroupResponse::new(group, members))
        })
    }
}

impl Handler<UngroupTables> for PgActor {
    type Result = Result<(), ServiceError>;

    fn handle(&mut self, msg: UngroupTables, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::order_tables::{dsl::order_tables, table_group_id};
        use crate::schema::orders::{dsl::orders, order_status, order_table_id};
        use crate::schema::table_groups::dsl::table_groups;

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let group = table_groups
                .find(msg.0)
                .first::<TableGroup>(trx_conn)
                .optional()?
                .ok_or_else(|| ServiceError::invalid(format!("No table group with id {}", msg.0)))?;

            let members = order_tables
                .filter(table_group_id.eq(group.id))
                .get_results::<OrderTable>(trx_conn)?;
            let member_ids: Vec<i64> = members.iter().map(|table| table.id).collect();

            let open_orders: i64 = orders
                .filter(order_table_id.eq_any(member_ids))
                .filter(order_status.eq_any(active_statuses()))
                .count()
                .get_result(trx_conn)?;
            if open_orders > 0 {
                return Err(ServiceError::invalid(
                    "A grouped table still has an order in progress",
                ));
            }

            for table in &members {
                diesel::update(order_tables.find(table.id))
                    .set(table_group_id.eq(None::<i64>))
                    .execute(trx_conn)?;
            }

            diesel::delete(table_groups.find(group.id)).execute(trx_conn)?;

            Ok(())
        })
    }
}

impl Handler<PlaceOrder> for PgActor {
    type Result = Result<order_workflow::OrderResponse, ServiceError>;

    fn handle(&mut self, msg: PlaceOrder, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let mut store = PgStores { conn: trx_conn };
            order_workflow::place_order(&mut store, &msg.0)
        })
    }
}

impl Handler<FetchOrders> for PgActor {
    type Result = Result<Vec<order_workflow::OrderResponse>, ServiceError>;

    fn handle(&mut self, _msg: FetchOrders, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        let mut store = PgStores { conn: &mut conn };
        order_workflow::list_orders(&mut store)
    }
}

impl Handler<ChangeOrderStatus> for PgActor {
    type Result = Result<order_workflow::OrderResponse, ServiceError>;

    fn handle(&mut self, msg: ChangeOrderStatus, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let mut store = PgStores { conn: trx_conn };
            order_workflow::change_order_status(&mut store, msg.order_id, msg.status)
        })
    }
}
