//! # Domain Models
//!
//! Value objects returned by the public read operations.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Quote`] | Price, daily change, and sparkline for one equity |
//! | [`IndexSnapshot`] | Index level and daily move |
//! | [`Mover`] | Ranked slice of a quote |
//! | [`MarketSnapshot`] | Indices plus top movers |
//! | [`SectorPerformance`] | Daily move of a sector's representative ETF |
//! | [`AnalystRating`] | Consensus rating with target and upside |
//! | [`EarningsEvent`] | Upcoming earnings release |
//! | [`NewsItem`] | Headline linked to tracked symbols |
//! | [`FeaturedNews`] | Newest headline with its lead symbol |
//! | [`DividendStock`] | Dividend payer with yield and cadence |
//! | [`WeekRange`] | Price inside its 52-week range |
//! | [`MarketStatus`] | Exchange session state |
//! | [`Symbol`] | Validated ticker |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! DTOs carry no identity beyond their fields. Percentages are plain percent
//! values (`2.0` means two percent), rounded to two decimals when built.

mod models;
mod symbol;
mod timestamp;

pub use models::{
    AnalystRating, DividendStock, EarningsEvent, FeaturedNews, IndexSnapshot, MarketSnapshot,
    MarketStatus, Mover, NewsItem, PayoutFrequency, Quote, RatingCategory, SectorPerformance, SessionTiming,
    TickerListing, WeekExtremes, WeekRange,
};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
