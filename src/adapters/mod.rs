//! Adapters that talk to systems outside the process.

pub mod icon_fetcher;

pub use icon_fetcher::IconFetcher;
