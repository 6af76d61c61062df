//! Read-only projections over session history.

use std::cmp::Reverse;

use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;

use super::model::Session;

/// Aggregates across a list of sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Number of sessions.
    pub total_sessions: usize,
    /// Sum of work seconds.
    pub total_duration_seconds: u64,
    /// Sum of distraction counts.
    pub total_distraction_count: usize,
    /// Sum of distracted seconds.
    pub total_distraction_seconds: u64,
}

impl Totals {
    /// Sum over `sessions`. Sums saturate instead of overflowing.
    #[must_use]
    pub fn of(sessions: &[Session]) -> Self {
        sessions.iter().fold(Self::default(), |acc, s| Self {
            total_sessions: acc.total_sessions + 1,
            total_duration_seconds: acc.total_duration_seconds.saturating_add(s.duration_seconds),
            total_distraction_count: acc
                .total_distraction_count
                .saturating_add(s.distraction_count()),
            total_distraction_seconds: acc
                .total_distraction_seconds
                .saturating_add(s.distraction_seconds()),
        })
    }
}

/// Sessions that ended on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup<'a> {
    /// The date, or `None` for sessions whose timestamp could not be read.
    pub date: Option<NaiveDate>,
    /// Sessions in their original relative order.
    pub sessions: Vec<&'a Session>,
}

impl DateGroup<'_> {
    /// Work seconds for the day.
    #[must_use]
    pub fn total_seconds(&self) -> u64 {
        self.sessions
            .iter()
            .fold(0, |acc: u64, s| acc.saturating_add(s.duration_seconds))
    }

    /// Distractions logged during the day.
    #[must_use]
    pub fn distraction_count(&self) -> usize {
        self.sessions
            .iter()
            .fold(0, |acc: usize, s| acc.saturating_add(s.distraction_count()))
    }
}

/// Partition sessions by the date they ended on, as seen from `tz`.
///
/// Groups come out newest date first, with unreadable dates last. Sessions
/// keep their relative order within a group.
#[must_use]
pub fn group_by_date_in<'a, Tz: TimeZone>(sessions: &'a [Session], tz: &Tz) -> Vec<DateGroup<'a>> {
    let mut groups: Vec<DateGroup<'a>> = Vec::new();

    for session in sessions {
        let date = session.ended_on_in(tz);
        match groups.iter_mut().find(|g| g.date == date) {
            Some(group) => group.sessions.push(session),
            None => groups.push(DateGroup {
                date,
                sessions: vec![session],
            }),
        }
    }

    groups.sort_by_key(|g| Reverse(g.date));
    groups
}

/// Partition sessions by local calendar date.
#[must_use]
pub fn group_by_date(sessions: &[Session]) -> Vec<DateGroup<'_>> {
    group_by_date_in(sessions, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::session::Distraction;
    use chrono::Utc;
    use proptest::prelude::*;

    fn session(id: i64, duration: u64, ended_at: &str, distractions: usize) -> Session {
        Session {
            id,
            duration_seconds: duration,
            distractions: (0..distractions)
                .map(|i| Distraction {
                    id: id * 10 + i as i64,
                    reason: format!("d{i}"),
                    logged_at: ended_at.to_string(),
                    duration_seconds: 5,
                })
                .collect(),
            ended_at: ended_at.to_string(),
        }
    }

    #[test]
    fn test_totals_empty() {
        assert_eq!(Totals::of(&[]), Totals::default());
    }

    #[test]
    fn test_totals_sum() {
        let sessions = vec![
            session(1, 100, "2024-03-01T10:00:00Z", 2),
            session(2, 50, "2024-03-01T11:00:00Z", 1),
        ];
        let totals = Totals::of(&sessions);
        assert_eq!(totals.total_sessions, 2);
        assert_eq!(totals.total_duration_seconds, 150);
        assert_eq!(totals.total_distraction_count, 3);
        assert_eq!(totals.total_distraction_seconds, 15);
    }

    #[test]
    fn test_group_by_date_preserves_order() {
        let sessions = vec![
            session(4, 10, "2024-03-02T15:00:00Z", 0),
            session(3, 20, "2024-03-02T09:00:00Z", 0),
            session(2, 30, "2024-03-01T18:00:00Z", 1),
            session(1, 40, "2024-03-01T08:00:00Z", 0),
        ];

        let groups = group_by_date_in(&sessions, &Utc);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(
            groups[0].sessions.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![4, 3]
        );
        assert_eq!(groups[0].total_seconds(), 30);
        assert_eq!(groups[1].total_seconds(), 70);
        assert_eq!(groups[1].distraction_count(), 1);
    }

    #[test]
    fn test_group_by_date_keeps_unreadable() {
        let sessions = vec![
            session(2, 30, "not a date", 0),
            session(1, 40, "2024-03-01T08:00:00Z", 0),
        ];

        let groups = group_by_date_in(&sessions, &Utc);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(groups[1].date, None);
        assert_eq!(groups[1].sessions[0].id, 2);
    }

    #[test]
    fn test_group_by_date_sorts_newest_first() {
        let sessions = vec![
            session(1, 10, "2024-03-01T10:00:00Z", 0),
            session(2, 20, "2024-03-03T10:00:00Z", 0),
            session(3, 30, "2024-03-02T10:00:00Z", 0),
            session(4, 40, "2024-03-01T12:00:00Z", 0),
        ];

        let groups = group_by_date_in(&sessions, &Utc);
        let dates: Vec<_> = groups.iter().map(|g| g.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 3, 3),
                NaiveDate::from_ymd_opt(2024, 3, 2),
                NaiveDate::from_ymd_opt(2024, 3, 1),
            ]
        );
        assert_eq!(
            groups[2].sessions.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![1, 4]
        );
    }

    #[test]
    fn test_totals_saturate_on_huge_durations() {
        let sessions = vec![
            session(1, u64::MAX, "2024-03-01T10:00:00Z", 0),
            session(2, 1, "2024-03-01T11:00:00Z", 0),
        ];

        let totals = Totals::of(&sessions);
        assert_eq!(totals.total_duration_seconds, u64::MAX);

        let groups = group_by_date_in(&sessions, &Utc);
        assert_eq!(groups[0].total_seconds(), u64::MAX);
    }

    proptest! {
        #[test]
        fn prop_grouping_is_a_partition(days in prop::collection::vec(0u32..5, 0..40)) {
            let sessions: Vec<Session> = days
                .iter()
                .enumerate()
                .map(|(i, day)| {
                    session(i as i64, 60, &format!("2024-03-{:02}T12:00:00Z", day + 1), 0)
                })
                .collect();

            let groups = group_by_date_in(&sessions, &Utc);

            let mut seen: Vec<i64> = groups
                .iter()
                .flat_map(|g| g.sessions.iter().map(|s| s.id))
                .collect();
            prop_assert_eq!(seen.len(), sessions.len());
            seen.sort_unstable();
            let expected: Vec<i64> = (0..sessions.len() as i64).collect();
            prop_assert_eq!(seen, expected);

            for group in &groups {
                let ids: Vec<i64> = group.sessions.iter().map(|s| s.id).collect();
                let mut sorted = ids.clone();
                sorted.sort_unstable();
                prop_assert_eq!(ids, sorted);
            }
        }
    }
}
