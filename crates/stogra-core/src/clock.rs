//! Exchange session clock.
//!
//! Trading days are Monday through Friday with no holiday calendar. The
//! session window is `[open, close)` in exchange-local wall-clock time.

use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::MarketStatus;
use crate::UtcDateTime;

const NYSE_OPEN: NaiveTime = match NaiveTime::from_hms_opt(9, 30, 0) {
    Some(time) => time,
    None => panic!("invalid open time"),
};

const NYSE_CLOSE: NaiveTime = match NaiveTime::from_hms_opt(16, 0, 0) {
    Some(time) => time,
    None => panic!("invalid close time"),
};

/// Exchange timezone and regular-session bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRule {
    pub exchange: String,
    pub timezone: Tz,
    pub open: NaiveTime,
    pub close: NaiveTime,
    /// Short zone suffix used in display labels, e.g. `ET`.
    pub zone_label: String,
}

impl SessionRule {
    pub fn nyse() -> Self {
        Self {
            exchange: String::from("NYSE"),
            timezone: chrono_tz::America::New_York,
            open: NYSE_OPEN,
            close: NYSE_CLOSE,
            zone_label: String::from("ET"),
        }
    }

    pub fn open_label(&self) -> String {
        self.label(self.open)
    }

    pub fn close_label(&self) -> String {
        self.label(self.close)
    }

    fn label(&self, time: NaiveTime) -> String {
        format!("{} {}", time.format("%-I:%M %p"), self.zone_label)
    }
}

impl Default for SessionRule {
    fn default() -> Self {
        Self::nyse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    Open,
    Close,
}

impl SessionEvent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub is_open: bool,
    pub next_event: SessionEvent,
    /// Time to the next boundary today. `None` on weekends and after the close.
    pub countdown: Option<Duration>,
}

fn to_chrono(now: UtcDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(now.unix_timestamp(), now.nanosecond()).unwrap_or_default()
}

pub fn session_state(now: UtcDateTime, rule: &SessionRule) -> SessionState {
    let local = to_chrono(now).with_timezone(&rule.timezone);
    let is_weekday = local.weekday().num_days_from_monday() < 5;
    let time = local.time();

    let is_open = is_weekday && rule.open <= time && time < rule.close;
    let boundary = if is_open {
        Some(rule.close)
    } else if is_weekday && time < rule.open {
        Some(rule.open)
    } else {
        None
    };

    SessionState {
        is_open,
        next_event: if is_open {
            SessionEvent::Close
        } else {
            SessionEvent::Open
        },
        countdown: boundary.and_then(|at| (at - time).to_std().ok()),
    }
}

/// `"{hours}h {minutes}m"`, seconds truncated.
pub fn format_countdown(remaining: Duration) -> String {
    let seconds = remaining.as_secs();
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}

pub fn market_status(now: UtcDateTime, rule: &SessionRule) -> MarketStatus {
    let state = session_state(now, rule);
    MarketStatus {
        is_open: state.is_open,
        exchange: rule.exchange.clone(),
        next_event: state.next_event.as_str().to_owned(),
        countdown: state.countdown.map(format_countdown).unwrap_or_default(),
        open_time: rule.open_label(),
        close_time: rule.close_label(),
    }
}
