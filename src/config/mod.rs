//! Static configuration for the network and its fee handler.
//!
//! This module contains the validated parameter structs that outlive any
//! single trade: [`NetworkConfig`] names the ledger accounts the
//! orchestrator operates, and [`FeeConfig`] sets the cadence of fee burns.

mod fee_config;
mod network_config;

pub use fee_config::FeeConfig;
pub use network_config::NetworkConfig;
