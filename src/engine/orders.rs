// 9.2 engine/orders.rs: order creation. every fallible step resolves before
// funds move or the order is persisted, so creation either fully succeeds or
// leaves no observable state behind.
// initial provision into an empty pool needs no oracle and settles immediately.

use super::core::Relayer;
use super::results::{OrderCreation, RelayerError};
use crate::custody::{Asset, CustodyError};
use crate::events::{EventPayload, OrderCreatedEvent};
use crate::order::{Order, OrderParams};
use crate::types::{AccountId, Bps, OrderKind, OrderStatus, TokenId, Timestamp};
use rust_decimal::Decimal;

impl Relayer {
    /// Request deferred provision of `amount_a`/`amount_b` into the home pair.
    /// `params.factory` picks the venue whose TWAP guards the execution.
    pub fn order_liquidity_provision(
        &mut self,
        caller: AccountId,
        params: OrderParams,
        amount_a: Decimal,
        amount_b: Decimal,
    ) -> Result<OrderCreation, RelayerError> {
        self.validate_common(caller, &params)?;
        if amount_a <= Decimal::ZERO || amount_b <= Decimal::ZERO {
            return Err(RelayerError::InvalidTokenAmount);
        }

        let (token_a, token_b) = self.resolve_native(params.token_a, params.token_b)?;
        self.require_pairs(&params, token_a, token_b)?;

        let native_leg = params.token_a.is_native();
        let owner = self.owner;
        if native_leg {
            self.require_balance(Asset::Token(TokenId::NATIVE), owner, amount_a)?;
        } else {
            self.require_balance(Asset::Token(token_a), owner, amount_a)?;
        }
        self.require_balance(Asset::Token(token_b), owner, amount_b)?;

        let home = self.home_factory.expect("validated factory");
        let aligned = token_a < token_b;
        let home_pair = self
            .factories
            .get(&home)
            .and_then(|f| f.get_pair(token_a.min(token_b), token_a.max(token_b)))
            .ok_or(RelayerError::PairNotFound(home))?;

        // initial liquidity with zero reserve floors settles without an oracle
        let immediate = home_pair.is_empty()
            && params.min_reserve_a.is_zero()
            && params.min_reserve_b.is_zero();

        // last fallible steps: dry-run the immediate mint, or resolve the
        // bootstrap sample, while nothing has been locked or persisted yet
        let bootstrap = if immediate {
            let (amount0, amount1) = if aligned {
                (amount_a, amount_b)
            } else {
                (amount_b, amount_a)
            };
            home_pair.quote_mint(amount0, amount1)?;
            None
        } else {
            self.bootstrap_sample(&params, token_a, token_b)?
        };

        // lock both legs
        if native_leg {
            self.ledger.wrap_native(owner, token_a, amount_a)?;
        }
        self.ledger
            .transfer(Asset::Token(token_a), owner, AccountId::ENGINE, amount_a)?;
        self.ledger
            .transfer(Asset::Token(token_b), owner, AccountId::ENGINE, amount_b)?;

        let order_id = self.persist_order(
            OrderKind::Provision,
            token_a,
            token_b,
            amount_a,
            amount_b,
            Decimal::ZERO,
            &params,
        );

        if immediate {
            // pre-validated by the quote above; pool and custody are untouched
            // in between
            self.settle_provision(order_id)?;
            return Ok(OrderCreation {
                order_id,
                executed_immediately: true,
            });
        }

        if let Some(sample) = bootstrap {
            // first sample on a fresh oracle, always accepted
            self.record_order_sample(order_id, sample)?;
        }

        Ok(OrderCreation {
            order_id,
            executed_immediately: false,
        })
    }

    /// Request deferred removal of `liquidity` pool shares from the home pair,
    /// with `amount_a_min`/`amount_b_min` as output floors.
    pub fn order_liquidity_removal(
        &mut self,
        caller: AccountId,
        params: OrderParams,
        liquidity: Decimal,
        amount_a_min: Decimal,
        amount_b_min: Decimal,
    ) -> Result<OrderCreation, RelayerError> {
        self.validate_common(caller, &params)?;
        if liquidity <= Decimal::ZERO
            || amount_a_min <= Decimal::ZERO
            || amount_b_min <= Decimal::ZERO
        {
            return Err(RelayerError::InvalidLiquidityAmount);
        }

        let (token_a, token_b) = self.resolve_native(params.token_a, params.token_b)?;
        self.require_pairs(&params, token_a, token_b)?;

        let home = self.home_factory.expect("validated factory");
        let pair_id = self
            .factories
            .get(&home)
            .and_then(|f| f.get_pair(token_a.min(token_b), token_a.max(token_b)))
            .map(|p| p.id)
            .ok_or(RelayerError::PairNotFound(home))?;
        let shares = Asset::PoolShares {
            factory: home,
            pair: pair_id,
        };
        let owner = self.owner;
        self.require_balance(shares, owner, liquidity)?;
        let bootstrap = self.bootstrap_sample(&params, token_a, token_b)?;

        // lock the shares to burn
        self.ledger.transfer(shares, owner, AccountId::ENGINE, liquidity)?;

        let order_id = self.persist_order(
            OrderKind::Removal,
            token_a,
            token_b,
            amount_a_min,
            amount_b_min,
            liquidity,
            &params,
        );

        if let Some(sample) = bootstrap {
            self.record_order_sample(order_id, sample)?;
        }

        Ok(OrderCreation {
            order_id,
            executed_immediately: false,
        })
    }

    // entry-time checks, before any state mutation
    fn validate_common(&self, caller: AccountId, params: &OrderParams) -> Result<(), RelayerError> {
        if caller != self.owner {
            return Err(RelayerError::NotOwner(caller));
        }
        if !self.factories.contains_key(&params.factory) {
            return Err(RelayerError::InvalidFactory(params.factory));
        }
        if params.token_a == params.token_b {
            return Err(RelayerError::InvalidPair(params.token_a));
        }
        if !crate::types::is_canonical_order(params.token_a, params.token_b) {
            return Err(RelayerError::InvalidTokenOrder);
        }
        if params.price_tolerance > self.config.max_tolerance {
            return Err(RelayerError::InvalidTolerance {
                requested: params.price_tolerance,
                max: self.config.max_tolerance,
            });
        }
        if params.deadline <= self.current_time {
            return Err(RelayerError::DeadlineReached);
        }
        Ok(())
    }

    // a native leg trades as the wrapped token everywhere past this point
    fn resolve_native(
        &self,
        token_a: TokenId,
        token_b: TokenId,
    ) -> Result<(TokenId, TokenId), RelayerError> {
        if token_a.is_native() {
            let wrapped = self.config.wrapped_native;
            if wrapped == token_b {
                return Err(RelayerError::InvalidPair(token_b));
            }
            Ok((wrapped, token_b))
        } else {
            Ok((token_a, token_b))
        }
    }

    // both the home pair (where liquidity moves) and the oracle venue's pair
    // (where prices are sampled) must exist
    fn require_pairs(
        &self,
        params: &OrderParams,
        token_a: TokenId,
        token_b: TokenId,
    ) -> Result<(), RelayerError> {
        let (t0, t1) = (token_a.min(token_b), token_a.max(token_b));
        let home = self.home_factory.ok_or(RelayerError::InvalidFactory(params.factory))?;
        if self
            .factories
            .get(&home)
            .and_then(|f| f.get_pair(t0, t1))
            .is_none()
        {
            return Err(RelayerError::PairNotFound(home));
        }
        if self
            .factories
            .get(&params.factory)
            .and_then(|f| f.get_pair(t0, t1))
            .is_none()
        {
            return Err(RelayerError::PairNotFound(params.factory));
        }
        Ok(())
    }

    fn require_balance(
        &self,
        asset: Asset,
        account: AccountId,
        amount: Decimal,
    ) -> Result<(), RelayerError> {
        let available = self.ledger.balance_of(asset, account);
        if available < amount {
            return Err(RelayerError::Custody(CustodyError::InsufficientBalance {
                account,
                requested: amount,
                available,
            }));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn persist_order(
        &mut self,
        kind: OrderKind,
        token_a: TokenId,
        token_b: TokenId,
        amount_a: Decimal,
        amount_b: Decimal,
        liquidity: Decimal,
        params: &OrderParams,
    ) -> crate::types::OrderId {
        let oracle_id = self.oracles.create(token_a, token_b);
        let order = Order {
            id: self.orders.next_id(),
            kind,
            token_a,
            token_b,
            amount_a,
            amount_b,
            liquidity,
            price_tolerance: params.price_tolerance,
            min_reserve_a: params.min_reserve_a,
            min_reserve_b: params.min_reserve_b,
            max_window_secs: params.max_window_secs,
            deadline: params.deadline,
            factory: params.factory,
            oracle_id,
            status: OrderStatus::Pending,
            created_at: self.current_time,
        };
        let order_id = self.orders.insert(order);
        self.emit_event(EventPayload::OrderCreated(OrderCreatedEvent {
            order_id,
            kind,
        }));
        order_id
    }
}

/// Convenience constructor for the shared parameter block.
impl OrderParams {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        token_a: TokenId,
        token_b: TokenId,
        price_tolerance: Bps,
        min_reserve_a: Decimal,
        min_reserve_b: Decimal,
        max_window_secs: i64,
        deadline: Timestamp,
        factory: crate::types::FactoryId,
    ) -> Self {
        Self {
            token_a,
            token_b,
            price_tolerance,
            min_reserve_a,
            min_reserve_b,
            max_window_secs,
            deadline,
            factory,
        }
    }
}
