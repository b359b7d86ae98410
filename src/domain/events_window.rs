use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use crate::entities::event;

/// At most this many past events are listed.
pub const PAST_LIMIT: u64 = 10;

/// Local midnight of `day`, in UTC.
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_hms_opt(0, 0, 0).unwrap_or_default();
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Combines the upcoming events with the bounded past tail, newest first.
pub fn merge_window(future: Vec<event::Model>, past: Vec<event::Model>) -> Vec<event::Model> {
    let mut events = future;
    events.extend(past.into_iter().take(PAST_LIMIT as usize));
    events.sort_by(|a, b| b.date.cmp(&a.date));
    events
}
