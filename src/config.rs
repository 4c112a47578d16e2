// 8.0 config.rs: all settings in one place. ownership, tolerance cap,
// sampling period, wrapped-native mapping.

use crate::types::{AccountId, Bps, TokenId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayerConfig {
    // single configuration field holding the current owner identity,
    // mutable only via transfer_ownership
    pub owner: AccountId,
    // system-wide tolerance cap. orders above this are meaningless and rejected.
    pub max_tolerance: Bps,
    // protocol-minimum seconds between two oracle samples of the same order.
    // prevents single-block double sampling.
    pub min_sample_period_secs: i64,
    // token the native asset wraps into when interacting with pools
    pub wrapped_native: TokenId,
    // event log retention
    pub max_events: usize,
    // print events as they are emitted
    pub verbose: bool,
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            owner: AccountId(1),
            max_tolerance: Bps::new(5000), // 50%
            min_sample_period_secs: 120,
            wrapped_native: TokenId(1),
            max_events: 100_000,
            verbose: false,
        }
    }
}

impl RelayerConfig {
    pub fn with_owner(mut self, owner: AccountId) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_sample_period(mut self, secs: i64) -> Self {
        self.min_sample_period_secs = secs;
        self
    }
}
