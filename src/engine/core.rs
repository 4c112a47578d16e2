// 9.1 engine/core.rs: the relayer itself. holds the order and oracle stores,
// the token ledger, the registered factories, and the event log.
// deterministic with no external I/O: the clock only moves when told to.

use super::results::RelayerError;
use crate::config::RelayerConfig;
use crate::custody::{Asset, TokenLedger};
use crate::events::{Event, EventId, EventPayload, OwnershipTransferredEvent};
use crate::order::OrderStore;
use crate::oracle::OracleStore;
use crate::pair::{Factory, Pair};
use crate::types::{AccountId, FactoryId, PairId, TokenId, Timestamp};
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug)]
pub struct Relayer {
    pub(super) config: RelayerConfig,
    pub(super) owner: AccountId,
    pub(super) factories: HashMap<FactoryId, Factory>,
    // liquidity is always provided on the home venue; reference factories
    // serve only as TWAP sources
    pub(super) home_factory: Option<FactoryId>,
    pub(super) orders: OrderStore,
    pub(super) oracles: OracleStore,
    pub(super) ledger: TokenLedger,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
    pub(super) current_time: Timestamp,
}

impl Relayer {
    pub fn new(config: RelayerConfig) -> Self {
        let owner = config.owner;
        Self {
            config,
            owner,
            factories: HashMap::new(),
            home_factory: None,
            orders: OrderStore::new(),
            oracles: OracleStore::new(),
            ledger: TokenLedger::new(),
            events: Vec::new(),
            next_event_id: 1,
            current_time: Timestamp::from_secs(0),
        }
    }

    // clock control

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, secs: i64) {
        self.current_time = Timestamp::from_secs(self.current_time.as_secs() + secs);
    }

    // venue registration. the first factory registered becomes the home venue.

    pub fn add_factory(&mut self, factory_id: FactoryId) {
        self.factories
            .entry(factory_id)
            .or_insert_with(|| Factory::new(factory_id));
        if self.home_factory.is_none() {
            self.home_factory = Some(factory_id);
        }
    }

    pub fn create_pair(
        &mut self,
        factory_id: FactoryId,
        token0: TokenId,
        token1: TokenId,
    ) -> Option<PairId> {
        let now = self.current_time;
        self.factories
            .get_mut(&factory_id)?
            .create_pair(token0, token1, now)
    }

    pub fn get_pair(&self, factory_id: FactoryId, token0: TokenId, token1: TokenId) -> Option<&Pair> {
        self.factories.get(&factory_id)?.get_pair(token0, token1)
    }

    pub fn get_pair_mut(
        &mut self,
        factory_id: FactoryId,
        token0: TokenId,
        token1: TokenId,
    ) -> Option<&mut Pair> {
        self.factories.get_mut(&factory_id)?.get_pair_mut(token0, token1)
    }

    // ledger plumbing for tests and simulation

    pub fn fund(&mut self, account: AccountId, asset: Asset, amount: Decimal) {
        self.ledger.credit(asset, account, amount);
    }

    pub fn balance_of(&self, asset: Asset, account: AccountId) -> Decimal {
        self.ledger.balance_of(asset, account)
    }

    // order and oracle queries

    pub fn get_order(&self, id: crate::types::OrderId) -> Option<&crate::order::Order> {
        self.orders.get(id)
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn get_oracle(
        &self,
        id: crate::types::OracleId,
    ) -> Result<&crate::oracle::OracleEntry, RelayerError> {
        Ok(self.oracles.get(id)?)
    }

    // administrative surface

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// Single-step ownership transfer, immediate effect, no timelock.
    pub fn transfer_ownership(
        &mut self,
        caller: AccountId,
        new_owner: AccountId,
    ) -> Result<(), RelayerError> {
        if caller != self.owner {
            return Err(RelayerError::NotOwner(caller));
        }
        let previous = self.owner;
        self.owner = new_owner;
        self.emit_event(EventPayload::OwnershipTransferred(OwnershipTransferredEvent {
            previous_owner: previous,
            new_owner,
        }));
        Ok(())
    }

    // event log

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_time, payload);
        self.next_event_id += 1;

        if self.config.verbose {
            println!("[Event {}] {:?}", event.id.0, event.payload);
        }

        self.events.push(event);

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventPayload;
    use rust_decimal_macros::dec;

    #[test]
    fn clock_is_caller_driven() {
        let mut relayer = Relayer::new(RelayerConfig::default());
        relayer.set_time(Timestamp::from_secs(1000));
        relayer.advance_time(300);
        assert_eq!(relayer.time(), Timestamp::from_secs(1300));
    }

    #[test]
    fn first_factory_is_home() {
        let mut relayer = Relayer::new(RelayerConfig::default());
        relayer.add_factory(FactoryId(1));
        relayer.add_factory(FactoryId(2));
        assert_eq!(relayer.home_factory, Some(FactoryId(1)));
    }

    #[test]
    fn ownership_transfer_gated_and_evented() {
        let mut relayer = Relayer::new(RelayerConfig::default());
        let owner = relayer.owner();
        let stranger = AccountId(99);

        let err = relayer.transfer_ownership(stranger, stranger).unwrap_err();
        assert!(matches!(err, RelayerError::NotOwner(a) if a == stranger));
        assert_eq!(relayer.owner(), owner);

        relayer.transfer_ownership(owner, AccountId(7)).unwrap();
        assert_eq!(relayer.owner(), AccountId(7));
        assert!(matches!(
            relayer.events().last().unwrap().payload,
            EventPayload::OwnershipTransferred(_)
        ));
    }

    #[test]
    fn funding_credits_the_ledger() {
        let mut relayer = Relayer::new(RelayerConfig::default());
        relayer.fund(AccountId(1), Asset::Token(TokenId(3)), dec!(100));
        assert_eq!(relayer.balance_of(Asset::Token(TokenId(3)), AccountId(1)), dec!(100));
    }
}
