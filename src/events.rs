// 7.0: every state transition produces an event. used for audit trails and
// off-process observers; engine correctness never depends on anyone consuming
// these. the EventPayload enum lists all event types.

use crate::types::{AccountId, OrderId, OrderKind, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    // order lifecycle
    OrderCreated(OrderCreatedEvent),
    OrderExecuted(OrderExecutedEvent),
    OrderWithdrawn(OrderWithdrawnEvent),

    // oracle sampling, audit only
    OracleSampled(OracleSampledEvent),

    // admin
    OwnershipTransferred(OwnershipTransferredEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreatedEvent {
    pub order_id: OrderId,
    pub kind: OrderKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExecutedEvent {
    pub order_id: OrderId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWithdrawnEvent {
    pub order_id: OrderId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleSampledEvent {
    pub order_id: OrderId,
    pub sample_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferredEvent {
    pub previous_owner: AccountId,
    pub new_owner: AccountId,
}
