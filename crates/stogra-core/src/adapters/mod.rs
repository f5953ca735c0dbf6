//! Market-data provider implementations.
//!
//! | Provider | Backing |
//! |----------|---------|
//! | [`YahooProvider`] | Yahoo Finance chart, quoteSummary and search endpoints |
//! | [`FixtureProvider`] | Deterministic in-memory data for tests and offline runs |

mod fixture;
mod yahoo;

pub use fixture::FixtureProvider;
pub use yahoo::YahooProvider;
