use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// An inclusive range of calendar days during which someone can't serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// A person is available on `day` unless one of their blockouts covers it.
pub fn is_available<'a, I>(day: NaiveDate, spans: I) -> bool
where
    I: IntoIterator<Item = &'a DateSpan>,
{
    !spans.into_iter().any(|span| span.contains(day))
}

/// The local calendar day an event falls on.
pub fn calendar_day(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn span(start: &str, end: &str) -> DateSpan {
        DateSpan::try_new(day(start), day(end)).unwrap()
    }

    #[test]
    fn empty_blockouts_are_always_available() {
        let none: [DateSpan; 0] = [];
        assert!(is_available(day("2025-03-09"), &none));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let spans = [span("2025-03-01", "2025-03-10")];
        assert!(!is_available(day("2025-03-01"), &spans));
        assert!(!is_available(day("2025-03-05"), &spans));
        assert!(!is_available(day("2025-03-10"), &spans));
        assert!(is_available(day("2025-02-28"), &spans));
        assert!(is_available(day("2025-03-11"), &spans));
    }

    #[test]
    fn single_day_blockout() {
        let spans = [span("2025-12-25", "2025-12-25")];
        assert!(!is_available(day("2025-12-25"), &spans));
        assert!(is_available(day("2025-12-24"), &spans));
    }

    #[test]
    fn any_covering_range_blocks() {
        let spans = [
            span("2025-01-01", "2025-01-03"),
            span("2025-06-10", "2025-06-20"),
        ];
        assert!(!is_available(day("2025-06-15"), &spans));
        assert!(is_available(day("2025-04-01"), &spans));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DateSpan::try_new(day("2025-05-02"), day("2025-05-01")).unwrap_err();
        assert!(matches!(err, ValidationError::InvertedRange { .. }));
    }
}
