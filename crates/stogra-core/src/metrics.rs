//! Pure transformations from raw provider answers into response DTOs.
//!
//! Nothing here performs I/O or reads the clock; callers pass `now` where it
//! matters. Ranked outputs break ties on symbol ascending so results never
//! depend on lookup completion order.

use crate::config::SectorEtf;
use crate::domain::{
    AnalystRating, DividendStock, EarningsEvent, FeaturedNews, IndexSnapshot, Mover, NewsItem,
    PayoutFrequency, Quote, RatingCategory, SectorPerformance, SessionTiming, WeekExtremes,
    WeekRange,
};
use crate::provider::{EarningsEstimate, PriceHistory, RawNews, TickerProfile};
use crate::{Symbol, UtcDateTime};

/// Points kept in a quote sparkline.
pub const SPARKLINE_POINTS: usize = 7;

const DEFAULT_CURRENCY: &str = "USD";

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Absolute and relative move between two prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub change: f64,
    pub change_percent: f64,
}

/// `change_percent` is zero whenever `previous` is zero or not finite.
pub fn compute_change(current: f64, previous: f64) -> PriceChange {
    let change = current - previous;
    let change_percent = if previous == 0.0 || !previous.is_finite() {
        0.0
    } else {
        change / previous * 100.0
    };
    PriceChange {
        change,
        change_percent,
    }
}

/// The most recent closes, oldest first, at most [`SPARKLINE_POINTS`] long.
pub fn sparkline_window(closes: &[f64]) -> &[f64] {
    let start = closes.len().saturating_sub(SPARKLINE_POINTS);
    &closes[start..]
}

/// Percent move between the last two closes, if there are two.
pub fn percent_change_from_closes(closes: &[f64]) -> Option<f64> {
    match closes {
        [.., previous, current] => Some(compute_change(*current, *previous).change_percent),
        _ => None,
    }
}

fn reference_close(closes: &[f64], profile: &TickerProfile, current: f64) -> f64 {
    match closes {
        [.., previous, _] => profile
            .previous_close
            .filter(|close| *close != 0.0)
            .unwrap_or(*previous),
        _ => current,
    }
}

/// Build a quote from daily history plus profile fields.
///
/// Returns `None` for an empty history; the caller reports that as not found.
pub fn build_quote(history: &PriceHistory, profile: &TickerProfile) -> Option<Quote> {
    let current = history.last_close()?;
    let previous = reference_close(&history.closes, profile, current);
    let delta = compute_change(current, previous);

    Some(Quote {
        symbol: history.symbol.clone(),
        name: profile.display_name(&history.symbol),
        price: round2(current),
        previous_close: round2(previous),
        change: round2(delta.change),
        change_percent: round2(delta.change_percent),
        sparkline: sparkline_window(&history.closes)
            .iter()
            .copied()
            .map(round2)
            .collect(),
        market_cap: profile.market_cap,
        currency: profile
            .currency
            .clone()
            .unwrap_or_else(|| String::from(DEFAULT_CURRENCY)),
    })
}

/// Index level and move, or the zero sentinel when history is missing.
pub fn index_snapshot(symbol: &Symbol, name: &str, history: Option<&PriceHistory>) -> IndexSnapshot {
    let Some(current) = history.and_then(PriceHistory::last_close) else {
        return IndexSnapshot::sentinel(symbol.clone(), name);
    };
    let closes = history.map(|h| h.closes.as_slice()).unwrap_or_default();
    let change_percent = percent_change_from_closes(closes).unwrap_or(0.0);

    IndexSnapshot {
        symbol: symbol.clone(),
        name: name.to_owned(),
        price: round2(current),
        change_percent: round2(change_percent),
    }
}

/// Top `n` quotes by absolute percent move, largest first.
pub fn rank_movers(quotes: &[Quote], n: usize) -> Vec<Mover> {
    let mut ranked: Vec<&Quote> = quotes.iter().collect();
    ranked.sort_by(|a, b| {
        b.change_percent
            .abs()
            .total_cmp(&a.change_percent.abs())
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    ranked.into_iter().take(n).map(Mover::from).collect()
}

/// Top `n` ratings by score, best first.
pub fn rank_ratings(mut ratings: Vec<AnalystRating>, n: usize) -> Vec<AnalystRating> {
    ratings.sort_by(|a, b| {
        b.rating_score
            .total_cmp(&a.rating_score)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    ratings.truncate(n);
    ratings
}

/// One entry per configured sector, in configuration order.
///
/// A sector whose ETF history is missing or shorter than two closes reports a
/// zero move instead of disappearing.
pub fn sector_performance<'a>(
    sectors: &[SectorEtf],
    history_of: impl Fn(&Symbol) -> Option<&'a PriceHistory>,
) -> Vec<SectorPerformance> {
    sectors
        .iter()
        .map(|sector| {
            let change_percent = history_of(&sector.symbol)
                .and_then(|history| percent_change_from_closes(&history.closes))
                .unwrap_or(0.0);
            SectorPerformance {
                name: sector.name.clone(),
                change_percent: round2(change_percent),
            }
        })
        .collect()
}

pub fn rating_from_profile(symbol: &Symbol, profile: &TickerProfile) -> AnalystRating {
    let rating = profile
        .recommendation_key
        .as_deref()
        .map(RatingCategory::from_recommendation_key)
        .unwrap_or(RatingCategory::Hold);

    let positive = |value: Option<f64>| value.filter(|v| *v > 0.0 && v.is_finite());
    let target_price = positive(profile.target_median_price)
        .or_else(|| positive(profile.target_mean_price))
        .unwrap_or(0.0);
    let current_price = positive(profile.current_price)
        .or_else(|| positive(profile.previous_close))
        .unwrap_or(0.0);

    let upside_percent = if target_price > 0.0 && current_price > 0.0 {
        (target_price - current_price) / current_price * 100.0
    } else {
        0.0
    };

    AnalystRating {
        symbol: symbol.clone(),
        name: profile.display_name(symbol),
        rating,
        rating_score: rating.score(),
        target_price: round2(target_price),
        current_price: round2(current_price),
        upside_percent: round2(upside_percent),
        analyst_count: profile.analyst_count.unwrap_or(0),
    }
}

/// The soonest estimate strictly after `now`, if any.
pub fn next_earnings(
    symbol: &Symbol,
    name: &str,
    estimates: &[EarningsEstimate],
    now: UtcDateTime,
) -> Option<EarningsEvent> {
    estimates
        .iter()
        .filter(|estimate| estimate.date > now)
        .min_by_key(|estimate| estimate.date)
        .map(|estimate| EarningsEvent {
            symbol: symbol.clone(),
            name: name.to_owned(),
            date: estimate.date,
            timing: SessionTiming::default(),
            expected_eps: estimate.eps_estimate.map(round2),
        })
}

/// Future events only, soonest first, at most `n`.
pub fn upcoming_earnings(
    events: Vec<EarningsEvent>,
    now: UtcDateTime,
    n: usize,
) -> Vec<EarningsEvent> {
    let mut upcoming: Vec<EarningsEvent> = events.into_iter().filter(|e| e.date > now).collect();
    upcoming.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.symbol.cmp(&b.symbol)));
    upcoming.truncate(n);
    upcoming
}

/// Tag the first `per_symbol` headlines with the symbol they were fetched for.
pub fn news_for_symbol(symbol: &Symbol, raw: Vec<RawNews>, per_symbol: usize) -> Vec<NewsItem> {
    raw.into_iter()
        .take(per_symbol)
        .map(|item| NewsItem {
            title: item.title,
            publisher: item.publisher,
            link: item.link,
            published_at: item.published_at,
            related_stocks: vec![symbol.clone()],
        })
        .collect()
}

/// Newest first. Undated items sort last.
pub fn latest_news(mut items: Vec<NewsItem>, limit: usize) -> Vec<NewsItem> {
    items.sort_by(|a, b| {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| a.title.cmp(&b.title))
    });
    items.truncate(limit);
    items
}

/// Lead item of an already ranked feed. Items with no related symbol are
/// passed over.
pub fn featured_news(feed: &[NewsItem]) -> Option<FeaturedNews> {
    feed.iter().find_map(|item| {
        let symbol = item.related_stocks.first()?;
        Some(FeaturedNews {
            title: item.title.clone(),
            symbol: symbol.clone(),
            summary: item.publisher.clone(),
        })
    })
}

/// Infer payout cadence from the annual amount and the most recent payment.
pub fn payout_frequency(annual_dividend: f64, last_payment: Option<f64>) -> PayoutFrequency {
    let Some(last) = last_payment.filter(|v| *v > 0.0 && v.is_finite()) else {
        return PayoutFrequency::Unknown;
    };
    let payments_per_year = annual_dividend / last;
    if !payments_per_year.is_finite() {
        return PayoutFrequency::Unknown;
    }

    match payments_per_year.round() as i64 {
        12 => PayoutFrequency::Monthly,
        4 => PayoutFrequency::Quarterly,
        2 => PayoutFrequency::SemiAnnual,
        1 => PayoutFrequency::Annual,
        _ => PayoutFrequency::Unknown,
    }
}

/// `None` unless the profile reports a positive trailing yield.
pub fn dividend_stock(symbol: &Symbol, profile: &TickerProfile) -> Option<DividendStock> {
    let yield_fraction = profile
        .dividend_yield
        .filter(|v| *v > 0.0 && v.is_finite())?;
    let price = profile
        .current_price
        .or(profile.previous_close)
        .unwrap_or(0.0);
    let annual_dividend = profile
        .dividend_rate
        .filter(|v| *v > 0.0)
        .unwrap_or(yield_fraction * price);

    Some(DividendStock {
        symbol: symbol.clone(),
        name: profile.display_name(symbol),
        price: round2(price),
        dividend_yield: round2(yield_fraction * 100.0),
        annual_dividend: round2(annual_dividend),
        payout_frequency: payout_frequency(annual_dividend, profile.last_dividend_value),
        ex_dividend_date: profile.ex_dividend_date,
    })
}

/// Highest yield first, at most `n`.
pub fn rank_dividends(mut stocks: Vec<DividendStock>, n: usize) -> Vec<DividendStock> {
    stocks.sort_by(|a, b| {
        b.dividend_yield
            .total_cmp(&a.dividend_yield)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    stocks.truncate(n);
    stocks
}

/// Place the current price inside its 52-week range.
///
/// Requires a positive price, high and low; returns `None` otherwise.
pub fn week_range(symbol: &Symbol, profile: &TickerProfile) -> Option<WeekRange> {
    let positive = |value: Option<f64>| value.filter(|v| *v > 0.0 && v.is_finite());
    let price = positive(profile.current_price).or_else(|| positive(profile.previous_close))?;
    let week_high = positive(profile.fifty_two_week_high)?;
    let week_low = positive(profile.fifty_two_week_low)?;

    Some(WeekRange {
        symbol: symbol.clone(),
        name: profile.display_name(symbol),
        price: round2(price),
        week_high: round2(week_high),
        week_low: round2(week_low),
        percent_from_high: round2((price - week_high) / week_high * 100.0),
        is_new_high: price >= week_high,
        is_new_low: price <= week_low,
    })
}

fn percent_above_low(range: &WeekRange) -> f64 {
    if range.week_low == 0.0 {
        return f64::INFINITY;
    }
    (range.price - range.week_low) / range.week_low * 100.0
}

/// The `n` names closest to their 52-week high and the `n` closest to their
/// 52-week low. A name may appear in both lists when its range is narrow.
pub fn split_week_extremes(ranges: &[WeekRange], n: usize) -> WeekExtremes {
    let mut highs = ranges.to_vec();
    highs.sort_by(|a, b| {
        b.percent_from_high
            .total_cmp(&a.percent_from_high)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    highs.truncate(n);

    let mut lows = ranges.to_vec();
    lows.sort_by(|a, b| {
        percent_above_low(a)
            .total_cmp(&percent_above_low(b))
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    lows.truncate(n);

    WeekExtremes { highs, lows }
}
