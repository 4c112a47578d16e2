// 9.0: the relayer engine. coordinates order creation, oracle sampling,
// tolerance-checked execution, and the expiry withdrawal fallback.
// deterministic and event-driven with no external I/O.

mod core;
mod execution;
mod oracle;
mod orders;
mod results;

pub use core::Relayer;
pub use results::{ExecutionProceeds, ExecutionResult, OrderCreation, RelayerError};
