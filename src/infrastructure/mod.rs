//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Solidity bindings and compiled-artifact loading
//! - Alloy-based Ethereum provider implementations and receipt polling

pub mod abi;
pub mod ethereum;
