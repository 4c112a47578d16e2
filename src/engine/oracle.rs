// 9.3 engine/oracle.rs: oracle sampling. permissionless, so any third party can
// push the observation window along once the order exists. a sample only lands
// if the sampled pool clears the order's reserve floors, which are fixed at
// creation time.

use super::core::Relayer;
use super::results::RelayerError;
use crate::events::{EventPayload, OracleSampledEvent};
use crate::oracle::PriceSample;
use crate::order::OrderParams;
use crate::types::{FactoryId, OrderId, TokenId};
use rust_decimal::Decimal;

impl Relayer {
    /// Record a cumulative-price sample for the order's oracle.
    /// Fails with `ReserveTooLow` or `PeriodNotElapsed` without mutating state.
    pub fn update_oracle(&mut self, order_id: OrderId) -> Result<(), RelayerError> {
        let order = self
            .orders
            .get(order_id)
            .ok_or(RelayerError::OrderNotFound(order_id))?;
        if !order.is_pending() {
            return Err(RelayerError::OrderNotPending(order_id));
        }
        let factory = order.factory;
        let token_a = order.token_a;
        let token_b = order.token_b;

        if !self.reserves_sufficient(order_id)? {
            let (reserve_a, reserve_b) = self.order_reserves(order_id)?;
            return Err(RelayerError::ReserveTooLow {
                reserve_a,
                reserve_b,
            });
        }

        let sample = self.venue_sample(factory, token_a, token_b)?;
        self.record_order_sample(order_id, sample)
    }

    // reserves of a venue's pair, rotated into (token_a, token_b) space
    pub(super) fn venue_reserves(
        &self,
        factory: FactoryId,
        token_a: TokenId,
        token_b: TokenId,
    ) -> Result<(Decimal, Decimal), RelayerError> {
        let pair = self
            .factories
            .get(&factory)
            .and_then(|f| f.get_pair(token_a.min(token_b), token_a.max(token_b)))
            .ok_or(RelayerError::PairNotFound(factory))?;
        let (r0, r1, _) = pair.get_reserves();
        if token_a < token_b {
            Ok((r0, r1))
        } else {
            Ok((r1, r0))
        }
    }

    pub(super) fn order_reserves(
        &self,
        order_id: OrderId,
    ) -> Result<(Decimal, Decimal), RelayerError> {
        let order = self
            .orders
            .get(order_id)
            .ok_or(RelayerError::OrderNotFound(order_id))?;
        self.venue_reserves(order.factory, order.token_a, order.token_b)
    }

    pub(super) fn reserves_sufficient(&self, order_id: OrderId) -> Result<bool, RelayerError> {
        let order = self
            .orders
            .get(order_id)
            .ok_or(RelayerError::OrderNotFound(order_id))?;
        let (reserve_a, reserve_b) = self.order_reserves(order_id)?;
        Ok(reserve_a >= order.min_reserve_a && reserve_b >= order.min_reserve_b)
    }

    // project the venue's accumulators to now, rotated into (token_a, token_b)
    // space. pure read, so order creation can resolve it before locking funds.
    pub(super) fn venue_sample(
        &self,
        factory: FactoryId,
        token_a: TokenId,
        token_b: TokenId,
    ) -> Result<PriceSample, RelayerError> {
        let pair = self
            .factories
            .get(&factory)
            .and_then(|f| f.get_pair(token_a.min(token_b), token_a.max(token_b)))
            .ok_or(RelayerError::PairNotFound(factory))?;
        let raw = pair.current_sample(self.current_time)?;

        if token_a < token_b {
            Ok(raw)
        } else {
            Ok(PriceSample {
                cumulative_price_a: raw.cumulative_price_b,
                cumulative_price_b: raw.cumulative_price_a,
                timestamp: raw.timestamp,
            })
        }
    }

    // the sample to take at creation time, if the venue already clears the
    // order's reserve floors. resolved before any funds move.
    pub(super) fn bootstrap_sample(
        &self,
        params: &OrderParams,
        token_a: TokenId,
        token_b: TokenId,
    ) -> Result<Option<PriceSample>, RelayerError> {
        let (reserve_a, reserve_b) = self.venue_reserves(params.factory, token_a, token_b)?;
        if reserve_a >= params.min_reserve_a && reserve_b >= params.min_reserve_b {
            Ok(Some(self.venue_sample(params.factory, token_a, token_b)?))
        } else {
            Ok(None)
        }
    }

    // store a prepared sample against the order's oracle. the period check
    // happens in the oracle store; a first sample is always accepted.
    pub(super) fn record_order_sample(
        &mut self,
        order_id: OrderId,
        sample: PriceSample,
    ) -> Result<(), RelayerError> {
        let oracle_id = self
            .orders
            .get(order_id)
            .ok_or(RelayerError::OrderNotFound(order_id))?
            .oracle_id;

        self.oracles
            .record_sample(oracle_id, sample, self.config.min_sample_period_secs)?;

        let sample_count = self.oracles.get(oracle_id)?.sample_count();
        self.emit_event(EventPayload::OracleSampled(OracleSampledEvent {
            order_id,
            sample_count,
        }));
        Ok(())
    }
}
