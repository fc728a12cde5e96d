use chrono::{DateTime, DurationRound, TimeDelta, Timelike, Utc};

/// Next wall-clock instant matching a `0 0/<interval> * * * *` schedule:
/// second zero of every minute of the hour divisible by `interval_minutes`,
/// strictly after `now`.
pub fn next_refresh_at(now: DateTime<Utc>, interval_minutes: u32) -> DateTime<Utc> {
    let interval = interval_minutes.clamp(1, 60);
    let hour_start = now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now);
    let next_minute = (now.minute() / interval + 1) * interval;
    if next_minute >= 60 {
        hour_start + TimeDelta::hours(1)
    } else {
        hour_start + TimeDelta::minutes(next_minute as i64)
    }
}

/// Next boundary that has not fired yet. The wall clock may still read before
/// `last_fired` when the monotonic sleep ends; the schedule never goes back to it.
pub fn next_refresh_after(
    now: DateTime<Utc>,
    last_fired: Option<DateTime<Utc>>,
    interval_minutes: u32,
) -> DateTime<Utc> {
    let from = match last_fired {
        Some(fired) if fired > now => fired,
        _ => now,
    };
    next_refresh_at(from, interval_minutes)
}
