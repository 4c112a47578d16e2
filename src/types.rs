// 1.0: all the primitives live here. nothing in the relayer works without these types.
// IDs, token amounts, basis points, timestamps. each is a newtype so the compiler catches type mixups.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// 1.1: asset identifier. tokens are ordered by id, which gives every pair exactly
// one canonical representation (lower id first). id 0 is the native asset, so a
// native leg always sorts first, like the zero address in EVM relayers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenId(pub u32);

impl TokenId {
    pub const NATIVE: TokenId = TokenId(0);

    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl AccountId {
    // custody account: locked order funds and minted pool shares sit here
    pub const ENGINE: AccountId = AccountId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OracleId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactoryId(pub u32);

// 1.2: provision deposits two token legs, removal burns pool shares.
// discriminants are part of the OrderCreated event payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Provision = 1,
    Removal = 2,
}

// 1.3: lifecycle status. Executed and Withdrawn are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Executed,
    Withdrawn,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

// 1.4: basis points. 100 bps = 1%. tolerance values are capped by config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bps(u32);

impl Bps {
    pub fn new(bps: u32) -> Self {
        Self(bps)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(self.0 as i64, 4)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Bps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}

// 1.5: second-resolution timestamp. oracle windows and deadlines are second-granular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp())
    }

    pub fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }

    pub fn elapsed_since(&self, earlier: Timestamp) -> i64 {
        self.0 - earlier.0
    }

    pub fn elapsed_decimal(&self, earlier: Timestamp) -> Decimal {
        Decimal::from(self.0 - earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

// 1.6: canonical ordering helper. true when (a, b) is the one valid representation.
pub fn is_canonical_order(a: TokenId, b: TokenId) -> bool {
    a < b
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn canonical_token_order() {
        assert!(is_canonical_order(TokenId(1), TokenId(2)));
        assert!(!is_canonical_order(TokenId(2), TokenId(1)));
        assert!(!is_canonical_order(TokenId(3), TokenId(3)));
        // native always sorts first
        assert!(is_canonical_order(TokenId::NATIVE, TokenId(1)));
    }

    #[test]
    fn bps_conversion() {
        assert_eq!(Bps::new(100).as_fraction(), dec!(0.01)); // 1%
        assert_eq!(Bps::new(10000).as_fraction(), dec!(1)); // 100%
        assert!(Bps::new(0).is_zero());
    }

    #[test]
    fn timestamp_elapsed() {
        let t0 = Timestamp::from_secs(1_577_836_800);
        let t1 = Timestamp::from_secs(1_577_837_100);
        assert_eq!(t1.elapsed_since(t0), 300);
        assert_eq!(t1.elapsed_decimal(t0), dec!(300));
    }

    #[test]
    fn order_status_terminality() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Executed.is_terminal());
        assert!(OrderStatus::Withdrawn.is_terminal());
    }
}
