//! Atomic trade execution over the balance ledger.

mod orchestrator;

pub use orchestrator::{TradeOrchestrator, TradeReceipt, TradeRequest};
