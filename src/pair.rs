// 5.0 pair.rs: MOCKED pool collaborator. constant-product pair with cumulative
// price accumulators, plus the factory registry that owns the pairs.
// the engine never touches reserves directly, only through mint/burn here, so
// the pool's own invariant checks (minimum-liquidity lock, pro-rata burn)
// always apply.

use crate::math::{self, MathError};
use crate::oracle::PriceSample;
use crate::types::{is_canonical_order, PairId, TokenId, Timestamp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// share amount burned to the zero address on first mint. 1000 base units of an
// 18-decimal asset, the usual constant-product dust lock.
pub const MINIMUM_LIQUIDITY: Decimal = dec!(0.000000000000001);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PairError {
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    #[error("burn amount {requested} exceeds total supply {supply}")]
    BurnExceedsSupply { requested: Decimal, supply: Decimal },

    #[error("math error: {0}")]
    Math(#[from] MathError),
}

// 5.1: a two-asset reserve. token0 < token1 always.
// price0 is "token1 per token0"; the accumulators integrate spot price over
// seconds and only ever grow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pair {
    pub id: PairId,
    pub token0: TokenId,
    pub token1: TokenId,
    pub reserve0: Decimal,
    pub reserve1: Decimal,
    pub total_supply: Decimal,
    pub price0_cumulative_last: Decimal,
    pub price1_cumulative_last: Decimal,
    pub block_timestamp_last: Timestamp,
}

impl Pair {
    fn new(id: PairId, token0: TokenId, token1: TokenId, created_at: Timestamp) -> Self {
        debug_assert!(is_canonical_order(token0, token1));
        Self {
            id,
            token0,
            token1,
            reserve0: Decimal::ZERO,
            reserve1: Decimal::ZERO,
            total_supply: Decimal::ZERO,
            price0_cumulative_last: Decimal::ZERO,
            price1_cumulative_last: Decimal::ZERO,
            block_timestamp_last: created_at,
        }
    }

    pub fn get_reserves(&self) -> (Decimal, Decimal, Timestamp) {
        (self.reserve0, self.reserve1, self.block_timestamp_last)
    }

    pub fn is_empty(&self) -> bool {
        self.reserve0.is_zero() && self.reserve1.is_zero()
    }

    // accumulate price * elapsed before any reserve change
    fn update_accumulators(&mut self, now: Timestamp) -> Result<(), PairError> {
        let elapsed = now.elapsed_decimal(self.block_timestamp_last);
        if elapsed > Decimal::ZERO && !self.reserve0.is_zero() && !self.reserve1.is_zero() {
            let price0 = math::div_truncate(self.reserve1, self.reserve0)?;
            let price1 = math::div_truncate(self.reserve0, self.reserve1)?;
            self.price0_cumulative_last =
                math::checked_add(self.price0_cumulative_last, math::checked_mul(price0, elapsed)?)?;
            self.price1_cumulative_last =
                math::checked_add(self.price1_cumulative_last, math::checked_mul(price1, elapsed)?)?;
        }
        self.block_timestamp_last = now;
        Ok(())
    }

    /// Accumulator readings projected to `now` without mutating the pair.
    /// This is what the oracle samples.
    pub fn current_sample(&self, now: Timestamp) -> Result<PriceSample, PairError> {
        let mut cum0 = self.price0_cumulative_last;
        let mut cum1 = self.price1_cumulative_last;
        let elapsed = now.elapsed_decimal(self.block_timestamp_last);
        if elapsed > Decimal::ZERO && !self.reserve0.is_zero() && !self.reserve1.is_zero() {
            let price0 = math::div_truncate(self.reserve1, self.reserve0)?;
            let price1 = math::div_truncate(self.reserve0, self.reserve1)?;
            cum0 = math::checked_add(cum0, math::checked_mul(price0, elapsed)?)?;
            cum1 = math::checked_add(cum1, math::checked_mul(price1, elapsed)?)?;
        }
        Ok(PriceSample {
            cumulative_price_a: cum0,
            cumulative_price_b: cum1,
            timestamp: now,
        })
    }

    /// Shares a deposit of both amounts would mint, without mutating.
    pub fn quote_mint(&self, amount0: Decimal, amount1: Decimal) -> Result<Decimal, PairError> {
        let liquidity = if self.total_supply.is_zero() {
            let root_k = math::sqrt(math::checked_mul(amount0, amount1)?)?;
            math::checked_sub(root_k, MINIMUM_LIQUIDITY)?
        } else {
            let by0 = math::checked_div(
                math::checked_mul(amount0, self.total_supply)?,
                self.reserve0,
            )?;
            let by1 = math::checked_div(
                math::checked_mul(amount1, self.total_supply)?,
                self.reserve1,
            )?;
            by0.min(by1)
        };

        if liquidity <= Decimal::ZERO {
            return Err(PairError::InsufficientLiquidityMinted);
        }
        Ok(liquidity)
    }

    /// Deposit both amounts and mint shares. First mint locks MINIMUM_LIQUIDITY
    /// forever; later mints are pro-rata on the worse-priced leg.
    pub fn mint(
        &mut self,
        amount0: Decimal,
        amount1: Decimal,
        now: Timestamp,
    ) -> Result<Decimal, PairError> {
        let liquidity = self.quote_mint(amount0, amount1)?;
        self.update_accumulators(now)?;

        if self.total_supply.is_zero() {
            // the lock never belongs to anyone
            self.total_supply = math::checked_add(liquidity, MINIMUM_LIQUIDITY)?;
        } else {
            self.total_supply = math::checked_add(self.total_supply, liquidity)?;
        }
        self.reserve0 = math::checked_add(self.reserve0, amount0)?;
        self.reserve1 = math::checked_add(self.reserve1, amount1)?;
        Ok(liquidity)
    }

    /// Pro-rata outputs for burning `liquidity` shares, without mutating.
    pub fn quote_burn(&self, liquidity: Decimal) -> Result<(Decimal, Decimal), PairError> {
        if liquidity > self.total_supply {
            return Err(PairError::BurnExceedsSupply {
                requested: liquidity,
                supply: self.total_supply,
            });
        }
        let amount0 = math::checked_div(
            math::checked_mul(liquidity, self.reserve0)?,
            self.total_supply,
        )?;
        let amount1 = math::checked_div(
            math::checked_mul(liquidity, self.reserve1)?,
            self.total_supply,
        )?;
        if amount0.is_zero() || amount1.is_zero() {
            return Err(PairError::InsufficientLiquidityBurned);
        }
        Ok((amount0, amount1))
    }

    /// Burn shares and release the underlying amounts.
    pub fn burn(
        &mut self,
        liquidity: Decimal,
        now: Timestamp,
    ) -> Result<(Decimal, Decimal), PairError> {
        let (amount0, amount1) = self.quote_burn(liquidity)?;
        self.update_accumulators(now)?;
        self.reserve0 = math::checked_sub(self.reserve0, amount0)?;
        self.reserve1 = math::checked_sub(self.reserve1, amount1)?;
        self.total_supply = math::checked_sub(self.total_supply, liquidity)?;
        Ok((amount0, amount1))
    }

    pub fn spot_price0(&self) -> Result<Decimal, PairError> {
        Ok(math::div_truncate(self.reserve1, self.reserve0)?)
    }
}

// 5.2: factory. one registry per venue; the engine can hold a home factory
// plus reference factories used purely as TWAP sources.
#[derive(Debug)]
pub struct Factory {
    pub id: crate::types::FactoryId,
    pairs: Vec<Pair>,
    index: HashMap<(TokenId, TokenId), usize>,
}

impl Factory {
    pub fn new(id: crate::types::FactoryId) -> Self {
        Self {
            id,
            pairs: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn create_pair(
        &mut self,
        token0: TokenId,
        token1: TokenId,
        now: Timestamp,
    ) -> Option<PairId> {
        if !is_canonical_order(token0, token1) || self.index.contains_key(&(token0, token1)) {
            return None;
        }
        let pair_id = PairId(self.pairs.len() as u32);
        self.index.insert((token0, token1), self.pairs.len());
        self.pairs.push(Pair::new(pair_id, token0, token1, now));
        Some(pair_id)
    }

    pub fn get_pair(&self, token0: TokenId, token1: TokenId) -> Option<&Pair> {
        self.index.get(&(token0, token1)).map(|&i| &self.pairs[i])
    }

    pub fn get_pair_mut(&mut self, token0: TokenId, token1: TokenId) -> Option<&mut Pair> {
        let i = *self.index.get(&(token0, token1))?;
        Some(&mut self.pairs[i])
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }
}
