//! Per-scrape collection routine.
//!
//! A scrape issues at most three RPC calls in a fixed order and converts
//! the responses into observations:
//!
//! 1. `status`: sync state, block height, version build.
//! 2. `validators` for the latest epoch: epoch start height, seat price and
//!    the configured account's stake, production and kickout figures.
//! 3. `get_accounts` on the configured account: one stake per delegator.
//!
//! A failed call marks the metrics that depend on it as invalid and ends
//! the scrape; observations emitted by earlier steps stand.

pub mod collector;

pub use collector::NodeRpcCollector;
