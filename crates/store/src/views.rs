//! Read views joining a record with the item it refers to.

use stockroom_inventory::InventoryRecord;
use stockroom_items::Item;
use stockroom_orders::Order;

/// An inventory record with its item and low-stock flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    pub record: InventoryRecord,
    pub item: Option<Item>,
    pub low_stock: bool,
}

/// An order with its item, or `None` if the item has since been deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub order: Order,
    pub item: Option<Item>,
}
