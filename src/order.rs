// 4.0 order.rs: order records and the arena that owns them.
// ids are assigned monotonically starting at 0 and never reused. the oracle
// store holds only a back-reference by id; this store is the single owner.

use crate::types::{Bps, FactoryId, OracleId, OrderId, OrderKind, OrderStatus, TokenId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 4.1: one liquidity request. for Provision, amount_a/amount_b are the desired
// deposit amounts and liquidity is zero. for Removal, liquidity is the share
// amount to burn and amount_a/amount_b are the minimum acceptable outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub kind: OrderKind,
    pub token_a: TokenId,
    pub token_b: TokenId,
    pub amount_a: Decimal,
    pub amount_b: Decimal,
    pub liquidity: Decimal,
    pub price_tolerance: Bps,
    // reserve floors are fixed at creation. every sample of this order's oracle
    // uses these values, a caller cannot lower its own bar mid-window.
    pub min_reserve_a: Decimal,
    pub min_reserve_b: Decimal,
    pub max_window_secs: i64,
    pub deadline: Timestamp,
    pub factory: FactoryId,
    pub oracle_id: OracleId,
    pub status: OrderStatus,
    pub created_at: Timestamp,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

/// Parameters common to both order kinds, gathered before validation.
#[derive(Debug, Clone)]
pub struct OrderParams {
    pub token_a: TokenId,
    pub token_b: TokenId,
    pub price_tolerance: Bps,
    pub min_reserve_a: Decimal,
    pub min_reserve_b: Decimal,
    pub max_window_secs: i64,
    pub deadline: Timestamp,
    pub factory: FactoryId,
}

// 4.2: growable arena plus next-id counter. no garbage collection, terminal
// orders stay addressable for audit queries.
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: Vec<Order>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self { orders: Vec::new() }
    }

    pub fn next_id(&self) -> OrderId {
        OrderId(self.orders.len() as u64)
    }

    pub fn insert(&mut self, order: Order) -> OrderId {
        debug_assert_eq!(order.id, self.next_id());
        let id = order.id;
        self.orders.push(order);
        id
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| o.is_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_order(id: u64) -> Order {
        Order {
            id: OrderId(id),
            kind: OrderKind::Provision,
            token_a: TokenId(1),
            token_b: TokenId(2),
            amount_a: dec!(1),
            amount_b: dec!(4),
            liquidity: Decimal::ZERO,
            price_tolerance: Bps::new(100),
            min_reserve_a: dec!(2),
            min_reserve_b: dec!(2),
            max_window_secs: 300,
            deadline: Timestamp::from_secs(1000),
            factory: FactoryId(1),
            oracle_id: OracleId(0),
            status: OrderStatus::Pending,
            created_at: Timestamp::from_secs(0),
        }
    }

    #[test]
    fn ids_are_monotonic_from_zero() {
        let mut store = OrderStore::new();
        assert_eq!(store.next_id(), OrderId(0));
        store.insert(test_order(0));
        assert_eq!(store.next_id(), OrderId(1));
        store.insert(test_order(1));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(OrderId(1)).unwrap().id, OrderId(1));
    }

    #[test]
    fn pending_filter_skips_terminal_orders() {
        let mut store = OrderStore::new();
        store.insert(test_order(0));
        store.insert(test_order(1));
        store.get_mut(OrderId(0)).unwrap().status = OrderStatus::Executed;

        let pending: Vec<OrderId> = store.pending().map(|o| o.id).collect();
        assert_eq!(pending, vec![OrderId(1)]);
    }

    #[test]
    fn missing_order_is_none() {
        let store = OrderStore::new();
        assert!(store.get(OrderId(7)).is_none());
    }
}
