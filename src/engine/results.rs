// 9.0.2: result types and errors for relayer operations.
// every failure carries a stable, named identifier; the caller decides whether
// to retry, wait, or withdraw. no partial state is ever observable on error.

use crate::custody::CustodyError;
use crate::math::MathError;
use crate::oracle::OracleError;
use crate::pair::PairError;
use crate::types::{AccountId, Bps, FactoryId, OrderId, TokenId};
use rust_decimal::Decimal;

/// Outcome of a successful order creation.
#[derive(Debug, Clone)]
pub struct OrderCreation {
    pub order_id: OrderId,
    /// True for initial provision into an empty pool with zero reserve
    /// minimums, which needs no oracle wait.
    pub executed_immediately: bool,
}

/// What a successful execution moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionProceeds {
    Provision { liquidity_minted: Decimal },
    Removal { amount_a: Decimal, amount_b: Decimal },
}

#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub order_id: OrderId,
    pub proceeds: ExecutionProceeds,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayerError {
    // input validation, checked before any state mutation
    #[error("caller {0:?} is not the owner")]
    NotOwner(AccountId),

    #[error("factory {0:?} is not configured for this relayer")]
    InvalidFactory(FactoryId),

    #[error("token pair is invalid: both legs are {0:?}")]
    InvalidPair(TokenId),

    #[error("tokens are not in canonical ascending order")]
    InvalidTokenOrder,

    #[error("token amounts must be nonzero")]
    InvalidTokenAmount,

    #[error("liquidity and minimum amounts must be nonzero")]
    InvalidLiquidityAmount,

    #[error("tolerance {requested} exceeds the cap {max}")]
    InvalidTolerance { requested: Bps, max: Bps },

    #[error("no pair for this token combination in factory {0:?}")]
    PairNotFound(FactoryId),

    // temporal preconditions, recoverable by waiting or withdrawing
    #[error("deadline reached")]
    DeadlineReached,

    #[error("deadline not reached")]
    DeadlineNotReached,

    #[error("sampling period not elapsed: {elapsed}s of {required}s")]
    PeriodNotElapsed { elapsed: i64, required: i64 },

    #[error("oracle needs two samples before execution")]
    OracleNotReady,

    #[error("observation window of {window_secs}s exceeds the {max_secs}s maximum")]
    WindowExpired { window_secs: i64, max_secs: i64 },

    // economic preconditions, expected under volatile or adversarial markets.
    // the order stays pending and may succeed on a later attempt.
    #[error("reserves ({reserve_a}, {reserve_b}) below order minimums")]
    ReserveTooLow { reserve_a: Decimal, reserve_b: Decimal },

    #[error("requested amount {requested} deviates from oracle-fair {fair} beyond tolerance")]
    PriceOutOfTolerance { requested: Decimal, fair: Decimal },

    #[error("output {amount} of token {token:?} below minimum {minimum}")]
    InsufficientOutputAmount {
        token: TokenId,
        amount: Decimal,
        minimum: Decimal,
    },

    // state errors, calling into an already-terminal order
    #[error("order {0:?} not found")]
    OrderNotFound(OrderId),

    #[error("order {0:?} is not pending")]
    OrderNotPending(OrderId),

    // collaborator failures
    #[error("custody error: {0}")]
    Custody(#[from] CustodyError),

    #[error("pair error: {0}")]
    Pair(#[from] PairError),

    #[error("math error: {0}")]
    Math(#[from] MathError),
}

// oracle failures flatten into the relayer's own stable identifiers
impl From<OracleError> for RelayerError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::PeriodNotElapsed { elapsed, required } => {
                RelayerError::PeriodNotElapsed { elapsed, required }
            }
            OracleError::NotReady | OracleError::NotFound(_) => RelayerError::OracleNotReady,
            OracleError::Math(e) => RelayerError::Math(e),
        }
    }
}
