//! Behavior-driven tests for exchange session status
//!
//! Session state is a pure function of the instant and the session rule;
//! these tests pin it at weekends, both boundaries and across daylight saving.

use std::time::Duration;

use stogra_core::clock::{format_countdown, market_status, session_state};
use stogra_core::{SessionEvent, SessionRule};
use stogra_tests::at;

#[test]
fn weekends_are_always_closed_with_no_countdown() {
    // Given: Saturday and Sunday instants inside what would be trading hours
    let rule = SessionRule::nyse();
    for instant in ["2026-03-07T16:00:00Z", "2026-03-08T15:00:00Z"] {
        // When: The session is evaluated
        let state = session_state(at(instant), &rule);

        // Then: The market is closed and no countdown is offered
        assert!(!state.is_open, "{instant} should be closed");
        assert_eq!(state.next_event, SessionEvent::Open);
        assert_eq!(state.countdown, None);
    }
}

#[test]
fn the_open_boundary_is_inclusive() {
    // Given: Monday 2026-03-02 at exactly 09:30 EST
    let state = session_state(at("2026-03-02T14:30:00Z"), &SessionRule::nyse());

    // Then: The market is open and counts down to the close
    assert!(state.is_open);
    assert_eq!(state.next_event, SessionEvent::Close);
    assert_eq!(state.countdown, Some(Duration::from_secs(6 * 3600 + 30 * 60)));
}

#[test]
fn the_close_boundary_is_exclusive() {
    // Given: Monday 2026-03-02 at exactly 16:00 EST, and one second before
    let rule = SessionRule::nyse();
    let at_close = session_state(at("2026-03-02T21:00:00Z"), &rule);
    let just_before = session_state(at("2026-03-02T20:59:59Z"), &rule);

    // Then: The close instant is closed with no countdown; a second earlier is open
    assert!(!at_close.is_open);
    assert_eq!(at_close.countdown, None);
    assert!(just_before.is_open);
    assert_eq!(just_before.countdown, Some(Duration::from_secs(1)));
}

#[test]
fn pre_market_counts_down_to_the_open() {
    // Given: Monday 2026-03-02 at 07:15 EST
    let status = market_status(at("2026-03-02T12:15:00Z"), &SessionRule::nyse());

    // Then: The status reports the upcoming open
    assert!(!status.is_open);
    assert_eq!(status.next_event, "open");
    assert_eq!(status.countdown, "2h 15m");
    assert_eq!(status.open_time, "9:30 AM ET");
    assert_eq!(status.close_time, "4:00 PM ET");
}

#[test]
fn daylight_saving_shifts_the_utc_open() {
    // Given: 13:30 UTC on the Mondays before and after the March 2026 switch
    let rule = SessionRule::nyse();
    let winter = session_state(at("2026-03-02T13:30:00Z"), &rule);
    let summer = session_state(at("2026-03-09T13:30:00Z"), &rule);

    // Then: It is 08:30 EST (closed) in winter but 09:30 EDT (open) in summer
    assert!(!winter.is_open);
    assert!(summer.is_open);
}

#[test]
fn identical_inputs_yield_identical_status() {
    let rule = SessionRule::nyse();
    let now = at("2026-03-04T18:42:17Z");

    assert_eq!(session_state(now, &rule), session_state(now, &rule));
    assert_eq!(market_status(now, &rule), market_status(now, &rule));
}

#[test]
fn countdown_format_truncates_seconds() {
    assert_eq!(format_countdown(Duration::from_secs(0)), "0h 0m");
    assert_eq!(format_countdown(Duration::from_secs(59)), "0h 0m");
    assert_eq!(format_countdown(Duration::from_secs(3 * 3600 + 7 * 60 + 59)), "3h 7m");
}
