// 9.4 engine/execution.rs: the decide-and-execute half of the two-phase
// protocol, plus the expiry fallback. execution is permissionless: once the
// window and tolerance conditions are objectively met, anyone may complete the
// order. failures leave the order pending and retryable; only a passed
// deadline forces the withdrawal path.

use super::core::Relayer;
use super::results::{ExecutionProceeds, ExecutionResult, RelayerError};
use crate::custody::Asset;
use crate::events::{EventPayload, OrderExecutedEvent, OrderWithdrawnEvent};
use crate::math;
use crate::types::{AccountId, Bps, OrderId, OrderKind, OrderStatus};
use rust_decimal::Decimal;

impl Relayer {
    /// Execute a pending order against the home pair, guarded by its oracle.
    pub fn execute_order(&mut self, order_id: OrderId) -> Result<ExecutionResult, RelayerError> {
        let order = self
            .orders
            .get(order_id)
            .ok_or(RelayerError::OrderNotFound(order_id))?;
        if !order.is_pending() {
            return Err(RelayerError::OrderNotPending(order_id));
        }

        let kind = order.kind;
        let max_window_secs = order.max_window_secs;
        let deadline = order.deadline;
        let tolerance = order.price_tolerance;
        let amount_a = order.amount_a;
        let amount_b = order.amount_b;
        let oracle_id = order.oracle_id;

        // a consumable average needs two samples spanning at most the order's
        // window. too wide means the observation went stale: withdraw, not execute.
        let entry = self.oracles.get(oracle_id)?;
        if entry.sample_count() < 2 {
            return Err(RelayerError::OracleNotReady);
        }
        let window_secs = entry.window_secs().unwrap_or(0);
        if window_secs > max_window_secs {
            return Err(RelayerError::WindowExpired {
                window_secs,
                max_secs: max_window_secs,
            });
        }
        if self.current_time > deadline {
            return Err(RelayerError::DeadlineReached);
        }

        // time-weighted price of token_a in token_b over the window
        let twap_a = entry.average_price_a()?;

        match kind {
            OrderKind::Provision => {
                let fair_b = math::checked_mul(amount_a, twap_a)?;
                check_tolerance(amount_b, fair_b, tolerance)?;
                let liquidity_minted = self.settle_provision(order_id)?;
                Ok(ExecutionResult {
                    order_id,
                    proceeds: ExecutionProceeds::Provision { liquidity_minted },
                })
            }
            OrderKind::Removal => {
                let (amount_a_out, amount_b_out) = self.settle_removal(order_id, twap_a)?;
                Ok(ExecutionResult {
                    order_id,
                    proceeds: ExecutionProceeds::Removal {
                        amount_a: amount_a_out,
                        amount_b: amount_b_out,
                    },
                })
            }
        }
    }

    /// Return the locked funds of an expired, still-pending order to the owner.
    /// The sole recovery path when price never re-enters tolerance.
    pub fn withdraw_expired_order(&mut self, order_id: OrderId) -> Result<(), RelayerError> {
        let order = self
            .orders
            .get(order_id)
            .ok_or(RelayerError::OrderNotFound(order_id))?;
        if self.current_time <= order.deadline {
            return Err(RelayerError::DeadlineNotReached);
        }
        if !order.is_pending() {
            return Err(RelayerError::OrderNotPending(order_id));
        }

        let kind = order.kind;
        let token_a = order.token_a;
        let token_b = order.token_b;
        let amount_a = order.amount_a;
        let amount_b = order.amount_b;
        let liquidity = order.liquidity;
        let owner = self.owner;

        match kind {
            OrderKind::Provision => {
                self.ledger
                    .transfer(Asset::Token(token_a), AccountId::ENGINE, owner, amount_a)?;
                self.ledger
                    .transfer(Asset::Token(token_b), AccountId::ENGINE, owner, amount_b)?;
            }
            OrderKind::Removal => {
                let shares = self.home_shares_asset(order.factory, token_a, token_b)?;
                self.ledger
                    .transfer(shares, AccountId::ENGINE, owner, liquidity)?;
            }
        }

        self.orders.get_mut(order_id).unwrap().status = OrderStatus::Withdrawn;
        self.emit_event(EventPayload::OrderWithdrawn(OrderWithdrawnEvent { order_id }));
        Ok(())
    }

    // move the locked legs into the home pair and take custody of the shares.
    // also the fast path for initial provision, which skips the oracle.
    pub(super) fn settle_provision(&mut self, order_id: OrderId) -> Result<Decimal, RelayerError> {
        let order = self
            .orders
            .get(order_id)
            .ok_or(RelayerError::OrderNotFound(order_id))?;
        let token_a = order.token_a;
        let token_b = order.token_b;
        let amount_a = order.amount_a;
        let amount_b = order.amount_b;

        let home = self.home_factory.ok_or(RelayerError::PairNotFound(order.factory))?;
        let (t0, t1) = (token_a.min(token_b), token_a.max(token_b));
        let aligned = token_a < token_b;
        let (amount0, amount1) = if aligned {
            (amount_a, amount_b)
        } else {
            (amount_b, amount_a)
        };

        let now = self.current_time;
        let pair = self
            .factories
            .get_mut(&home)
            .and_then(|f| f.get_pair_mut(t0, t1))
            .ok_or(RelayerError::PairNotFound(home))?;

        // validate the mint before touching the ledger
        pair.quote_mint(amount0, amount1)?;
        let pair_id = pair.id;

        self.ledger
            .debit(Asset::Token(token_a), AccountId::ENGINE, amount_a)?;
        self.ledger
            .debit(Asset::Token(token_b), AccountId::ENGINE, amount_b)?;

        let pair = self
            .factories
            .get_mut(&home)
            .and_then(|f| f.get_pair_mut(t0, t1))
            .ok_or(RelayerError::PairNotFound(home))?;
        let liquidity_minted = pair.mint(amount0, amount1, now)?;

        self.ledger.credit(
            Asset::PoolShares {
                factory: home,
                pair: pair_id,
            },
            AccountId::ENGINE,
            liquidity_minted,
        );

        self.orders.get_mut(order_id).unwrap().status = OrderStatus::Executed;
        self.emit_event(EventPayload::OrderExecuted(OrderExecutedEvent { order_id }));
        Ok(liquidity_minted)
    }

    // burn the locked shares and take custody of the outputs. the pool-implied
    // output is checked against the oracle-fair output and the order's floors
    // before anything mutates.
    fn settle_removal(
        &mut self,
        order_id: OrderId,
        twap_a: Decimal,
    ) -> Result<(Decimal, Decimal), RelayerError> {
        let order = self
            .orders
            .get(order_id)
            .ok_or(RelayerError::OrderNotFound(order_id))?;
        let token_a = order.token_a;
        let token_b = order.token_b;
        let amount_a_min = order.amount_a;
        let amount_b_min = order.amount_b;
        let liquidity = order.liquidity;
        let tolerance = order.price_tolerance;

        let home = self.home_factory.ok_or(RelayerError::PairNotFound(order.factory))?;
        let (t0, t1) = (token_a.min(token_b), token_a.max(token_b));
        let aligned = token_a < token_b;
        let now = self.current_time;

        let pair = self
            .factories
            .get(&home)
            .and_then(|f| f.get_pair(t0, t1))
            .ok_or(RelayerError::PairNotFound(home))?;
        let pair_id = pair.id;
        let (out0, out1) = pair.quote_burn(liquidity)?;
        let (amount_a_out, amount_b_out) = if aligned { (out0, out1) } else { (out1, out0) };

        // the pool's own pricing of the burn must agree with the TWAP
        let fair_b = math::checked_mul(amount_a_out, twap_a)?;
        check_tolerance(amount_b_out, fair_b, tolerance)?;

        // slippage floors from the order
        if amount_a_out < amount_a_min {
            return Err(RelayerError::InsufficientOutputAmount {
                token: token_a,
                amount: amount_a_out,
                minimum: amount_a_min,
            });
        }
        if amount_b_out < amount_b_min {
            return Err(RelayerError::InsufficientOutputAmount {
                token: token_b,
                amount: amount_b_out,
                minimum: amount_b_min,
            });
        }

        let shares = Asset::PoolShares {
            factory: home,
            pair: pair_id,
        };
        self.ledger.debit(shares, AccountId::ENGINE, liquidity)?;

        let pair = self
            .factories
            .get_mut(&home)
            .and_then(|f| f.get_pair_mut(t0, t1))
            .ok_or(RelayerError::PairNotFound(home))?;
        pair.burn(liquidity, now)?;

        self.ledger
            .credit(Asset::Token(token_a), AccountId::ENGINE, amount_a_out);
        self.ledger
            .credit(Asset::Token(token_b), AccountId::ENGINE, amount_b_out);

        self.orders.get_mut(order_id).unwrap().status = OrderStatus::Executed;
        self.emit_event(EventPayload::OrderExecuted(OrderExecutedEvent { order_id }));
        Ok((amount_a_out, amount_b_out))
    }

    fn home_shares_asset(
        &self,
        order_factory: crate::types::FactoryId,
        token_a: crate::types::TokenId,
        token_b: crate::types::TokenId,
    ) -> Result<Asset, RelayerError> {
        let home = self
            .home_factory
            .ok_or(RelayerError::InvalidFactory(order_factory))?;
        let pair = self
            .factories
            .get(&home)
            .and_then(|f| f.get_pair(token_a.min(token_b), token_a.max(token_b)))
            .ok_or(RelayerError::PairNotFound(home))?;
        Ok(Asset::PoolShares {
            factory: home,
            pair: pair.id,
        })
    }
}

// tolerance gate: requested may deviate from the oracle-fair value by at most
// `tolerance` of the fair value. zero tolerance demands exact equality.
fn check_tolerance(
    requested: Decimal,
    fair: Decimal,
    tolerance: Bps,
) -> Result<(), RelayerError> {
    let deviation = (requested - fair).abs();
    let allowed = math::checked_mul(fair, tolerance.as_fraction())?;
    if deviation > allowed {
        return Err(RelayerError::PriceOutOfTolerance { requested, fair });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_tolerance_demands_exact_equality() {
        assert!(check_tolerance(dec!(4), dec!(4), Bps::new(0)).is_ok());
        let err = check_tolerance(dec!(4.000001), dec!(4), Bps::new(0)).unwrap_err();
        assert!(matches!(err, RelayerError::PriceOutOfTolerance { .. }));
    }

    #[test]
    fn tolerance_bounds_are_inclusive() {
        // 100 bps of 4 is 0.04
        assert!(check_tolerance(dec!(4.04), dec!(4), Bps::new(100)).is_ok());
        assert!(check_tolerance(dec!(3.96), dec!(4), Bps::new(100)).is_ok());
        assert!(check_tolerance(dec!(4.0401), dec!(4), Bps::new(100)).is_err());
        assert!(check_tolerance(dec!(3.9599), dec!(4), Bps::new(100)).is_err());
    }
}
