// 3.0 oracle.rs: per-order TWAP oracle store. each order gets its own isolated
// observation window: two cumulative-price samples separated by at least the
// protocol sampling period. averages are never shared across orders.

use crate::math::{self, MathError};
use crate::types::{OracleId, TokenId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("sampling period not elapsed: {elapsed}s of {required}s")]
    PeriodNotElapsed { elapsed: i64, required: i64 },

    #[error("oracle {0:?} not found")]
    NotFound(OracleId),

    #[error("oracle has fewer than two samples")]
    NotReady,

    #[error("math error: {0}")]
    Math(#[from] MathError),
}

// 3.1: one reading of a pair's cumulative price accumulators.
// cumulative_price_a integrates "token_b per token_a" over time, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSample {
    pub cumulative_price_a: Decimal,
    pub cumulative_price_b: Decimal,
    pub timestamp: Timestamp,
}

// 3.2: observation window for a single order. the back-reference is by id only,
// the order store owns the order record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleEntry {
    pub id: OracleId,
    pub token_a: TokenId,
    pub token_b: TokenId,
    pub first_sample: Option<PriceSample>,
    pub last_sample: Option<PriceSample>,
}

impl OracleEntry {
    fn new(id: OracleId, token_a: TokenId, token_b: TokenId) -> Self {
        Self {
            id,
            token_a,
            token_b,
            first_sample: None,
            last_sample: None,
        }
    }

    pub fn sample_count(&self) -> usize {
        match (&self.first_sample, &self.last_sample) {
            (None, _) => 0,
            (Some(_), None) => 1,
            (Some(_), Some(_)) => 2,
        }
    }

    /// Seconds spanned by the two most recent samples, if both exist.
    pub fn window_secs(&self) -> Option<i64> {
        match (&self.first_sample, &self.last_sample) {
            (Some(first), Some(last)) => Some(last.timestamp.elapsed_since(first.timestamp)),
            _ => None,
        }
    }

    /// Time-weighted average price of token_a denominated in token_b.
    pub fn average_price_a(&self) -> Result<Decimal, OracleError> {
        let (first, last) = match (&self.first_sample, &self.last_sample) {
            (Some(f), Some(l)) => (f, l),
            _ => return Err(OracleError::NotReady),
        };
        let elapsed = last.timestamp.elapsed_decimal(first.timestamp);
        Ok(math::time_weighted_average(
            first.cumulative_price_a,
            last.cumulative_price_a,
            elapsed,
        )?)
    }

    /// Time-weighted average price of token_b denominated in token_a.
    pub fn average_price_b(&self) -> Result<Decimal, OracleError> {
        let (first, last) = match (&self.first_sample, &self.last_sample) {
            (Some(f), Some(l)) => (f, l),
            _ => return Err(OracleError::NotReady),
        };
        let elapsed = last.timestamp.elapsed_decimal(first.timestamp);
        Ok(math::time_weighted_average(
            first.cumulative_price_b,
            last.cumulative_price_b,
            elapsed,
        )?)
    }

    /// Oracle-implied output for a given input amount of one of the pair tokens.
    pub fn consult(&self, token_in: TokenId, amount_in: Decimal) -> Result<Decimal, OracleError> {
        let avg = if token_in == self.token_a {
            self.average_price_a()?
        } else {
            self.average_price_b()?
        };
        Ok(math::checked_mul(amount_in, avg)?)
    }
}

// 3.3: arena of oracle entries. ids are assigned monotonically and never reused.
#[derive(Debug, Default)]
pub struct OracleStore {
    entries: Vec<OracleEntry>,
}

impl OracleStore {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn create(&mut self, token_a: TokenId, token_b: TokenId) -> OracleId {
        let id = OracleId(self.entries.len() as u64);
        self.entries.push(OracleEntry::new(id, token_a, token_b));
        id
    }

    pub fn get(&self, id: OracleId) -> Result<&OracleEntry, OracleError> {
        self.entries
            .get(id.0 as usize)
            .ok_or(OracleError::NotFound(id))
    }

    /// Record a sample. The first sample always succeeds; later samples must be
    /// at least `min_period_secs` after the previous one. Once two samples exist,
    /// a new sample shifts the window forward: only the two most recent matter.
    /// On any error no state is mutated.
    pub fn record_sample(
        &mut self,
        id: OracleId,
        sample: PriceSample,
        min_period_secs: i64,
    ) -> Result<(), OracleError> {
        let entry = self
            .entries
            .get_mut(id.0 as usize)
            .ok_or(OracleError::NotFound(id))?;

        let previous = entry.last_sample.or(entry.first_sample);
        if let Some(prev) = previous {
            let elapsed = sample.timestamp.elapsed_since(prev.timestamp);
            if elapsed < min_period_secs {
                return Err(OracleError::PeriodNotElapsed {
                    elapsed,
                    required: min_period_secs,
                });
            }
        }

        match (entry.first_sample, entry.last_sample) {
            (None, _) => entry.first_sample = Some(sample),
            (Some(_), None) => entry.last_sample = Some(sample),
            (Some(_), Some(last)) => {
                entry.first_sample = Some(last);
                entry.last_sample = Some(sample);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(cum_a: Decimal, cum_b: Decimal, ts: i64) -> PriceSample {
        PriceSample {
            cumulative_price_a: cum_a,
            cumulative_price_b: cum_b,
            timestamp: Timestamp::from_secs(ts),
        }
    }

    #[test]
    fn first_sample_always_accepted() {
        let mut store = OracleStore::new();
        let id = store.create(TokenId(1), TokenId(2));

        store.record_sample(id, sample(dec!(0), dec!(0), 100), 120).unwrap();
        assert_eq!(store.get(id).unwrap().sample_count(), 1);
    }

    #[test]
    fn second_sample_within_period_rejected_without_mutation() {
        let mut store = OracleStore::new();
        let id = store.create(TokenId(1), TokenId(2));

        store.record_sample(id, sample(dec!(0), dec!(0), 100), 120).unwrap();
        let err = store
            .record_sample(id, sample(dec!(40), dec!(2.5), 150), 120)
            .unwrap_err();
        assert!(matches!(err, OracleError::PeriodNotElapsed { elapsed: 50, required: 120 }));
        assert_eq!(store.get(id).unwrap().sample_count(), 1);
    }

    #[test]
    fn average_from_two_samples() {
        let mut store = OracleStore::new();
        let id = store.create(TokenId(1), TokenId(2));

        // price a held at 4 (b per a), price b at 0.25, for 300s
        store.record_sample(id, sample(dec!(0), dec!(0), 0), 120).unwrap();
        store
            .record_sample(id, sample(dec!(1200), dec!(75), 300), 120)
            .unwrap();

        let entry = store.get(id).unwrap();
        assert_eq!(entry.average_price_a().unwrap(), dec!(4));
        assert_eq!(entry.average_price_b().unwrap(), dec!(0.25));
        assert_eq!(entry.window_secs(), Some(300));
    }

    #[test]
    fn third_sample_shifts_the_window() {
        let mut store = OracleStore::new();
        let id = store.create(TokenId(1), TokenId(2));

        store.record_sample(id, sample(dec!(0), dec!(0), 0), 120).unwrap();
        store.record_sample(id, sample(dec!(600), dec!(50), 150), 120).unwrap();
        store.record_sample(id, sample(dec!(1500), dec!(90), 300), 120).unwrap();

        let entry = store.get(id).unwrap();
        // window is now [150, 300]: avg a = (1500-600)/150 = 6
        assert_eq!(entry.window_secs(), Some(150));
        assert_eq!(entry.average_price_a().unwrap(), dec!(6));
    }

    #[test]
    fn average_requires_two_samples() {
        let mut store = OracleStore::new();
        let id = store.create(TokenId(1), TokenId(2));
        assert!(matches!(
            store.get(id).unwrap().average_price_a(),
            Err(OracleError::NotReady)
        ));

        store.record_sample(id, sample(dec!(0), dec!(0), 0), 120).unwrap();
        assert!(matches!(
            store.get(id).unwrap().average_price_a(),
            Err(OracleError::NotReady)
        ));
    }

    #[test]
    fn consult_scales_input_by_average() {
        let mut store = OracleStore::new();
        let id = store.create(TokenId(1), TokenId(2));
        store.record_sample(id, sample(dec!(0), dec!(0), 0), 120).unwrap();
        store.record_sample(id, sample(dec!(1200), dec!(75), 300), 120).unwrap();

        let entry = store.get(id).unwrap();
        assert_eq!(entry.consult(TokenId(1), dec!(3)).unwrap(), dec!(12));
        assert_eq!(entry.consult(TokenId(2), dec!(8)).unwrap(), dec!(2));
    }
}
