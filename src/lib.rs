// relayer-core: oracle-guarded AMM liquidity relayer.
// two-phase architecture: orders lock funds up front, execution is deferred
// behind a TWAP observation window and a price tolerance gate.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: TokenId, AccountId, OrderId, Bps, Timestamp
//   2.x  math.rs: overflow-checked decimal math, truncating TWAP division
//   3.x  oracle.rs: per-order two-sample cumulative-price oracle store
//   4.x  order.rs: order records and the order arena
//   5.x  pair.rs: constant-product pair + factory registry (mocked)
//   6.x  custody.rs: token and pool-share ledger (mocked)
//   7.x  events.rs: state transition events for audit
//   8.x  config.rs: ownership, tolerance cap, sampling period
//   9.x  engine/: the relayer: orders, oracle sampling, execution, withdrawal

// core relayer modules
pub mod engine;
pub mod events;
pub mod math;
pub mod oracle;
pub mod order;
pub mod types;

// integration modules
pub mod config;
pub mod custody;
pub mod pair;

// re exports for convenience
pub use engine::*;
pub use events::*;
pub use oracle::{OracleEntry, OracleError, OracleStore, PriceSample};
pub use order::{Order, OrderParams, OrderStore};
pub use types::*;
pub use config::RelayerConfig;
pub use custody::{Asset, CustodyError, TokenLedger};
pub use pair::{Factory, Pair, PairError, MINIMUM_LIQUIDITY};
