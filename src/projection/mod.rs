//! Read-only filtered, sorted and grouped views over a directory snapshot.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{DirectorySnapshot, Teammate};
use crate::timezone;

/// Bucket key used by [`GroupMode::None`].
pub const ALL_KEY: &str = "All";
/// Bucket key for teammates without any group in [`GroupMode::ByGroup`].
pub const UNGROUPED_KEY: &str = "Ungrouped";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    ByName,
    ByTime,
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortOrder::ByName),
            "time" => Ok(SortOrder::ByTime),
            other => Err(AppError::BadRequest(format!(
                "Unknown sort order {:?} (expected name or time)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupMode {
    #[default]
    None,
    ByGroup,
    ByTimeZone,
}

impl FromStr for GroupMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(GroupMode::None),
            "group" => Ok(GroupMode::ByGroup),
            "zone" | "timezone" => Ok(GroupMode::ByTimeZone),
            other => Err(AppError::BadRequest(format!(
                "Unknown group mode {:?} (expected none, group or zone)",
                other
            ))),
        }
    }
}

/// UI parameters of a projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub sort: SortOrder,
    pub group: GroupMode,
}

/// One display section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket<'a> {
    pub key: String,
    pub teammates: Vec<&'a Teammate>,
}

/// Filter, sort and group `snapshot` for display at instant `at`.
pub fn project<'a>(
    snapshot: &'a DirectorySnapshot,
    query: &ViewQuery,
    at: DateTime<Utc>,
) -> Vec<Bucket<'a>> {
    let mut visible = filter(&snapshot.teammates, &query.search);
    sort(&mut visible, query.sort, at);
    group(visible, query.group)
}

/// Case-insensitive substring match on name or zone identifier.
pub fn filter<'a>(teammates: &'a [Teammate], search: &str) -> Vec<&'a Teammate> {
    if search.is_empty() {
        return teammates.iter().collect();
    }
    let needle = search.to_lowercase();

    teammates
        .iter()
        .filter(|t| {
            t.name.to_lowercase().contains(&needle)
                || t.time_zone_identifier.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Stable sort. `ByTime` orders by UTC offset at `at` and puts unresolved
/// zones last.
pub fn sort(teammates: &mut [&Teammate], order: SortOrder, at: DateTime<Utc>) {
    match order {
        SortOrder::ByName => {
            teammates.sort_by_cached_key(|t| t.name.to_lowercase());
        }
        SortOrder::ByTime => {
            teammates.sort_by_cached_key(|t| {
                OffsetKey(timezone::utc_offset_seconds(&t.time_zone_identifier, at))
            });
        }
    }
}

/// Orders resolved offsets ascending, then unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OffsetKey(Option<i32>);

impl Ord for OffsetKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl PartialOrd for OffsetKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split an already sorted list into buckets ordered by key.
///
/// `ByGroup` places each teammate only under its first group label.
pub fn group<'a>(teammates: Vec<&'a Teammate>, mode: GroupMode) -> Vec<Bucket<'a>> {
    if mode == GroupMode::None {
        return vec![Bucket {
            key: ALL_KEY.to_string(),
            teammates,
        }];
    }

    let mut buckets: BTreeMap<String, Vec<&'a Teammate>> = BTreeMap::new();
    for teammate in teammates {
        let key = match mode {
            GroupMode::ByGroup => teammate.primary_group().unwrap_or(UNGROUPED_KEY),
            _ => teammate.time_zone_identifier.as_str(),
        };
        buckets.entry(key.to_string()).or_default().push(teammate);
    }

    buckets
        .into_iter()
        .map(|(key, teammates)| Bucket { key, teammates })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTeammate;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn teammate(name: &str, zone: &str, groups: &[&str]) -> Teammate {
        NewTeammate::new(name, zone)
            .with_groups(groups.iter().copied())
            .into_teammate(Uuid::new_v4())
    }

    fn names(list: &[&Teammate]) -> Vec<String> {
        list.iter().map(|t| t.name.clone()).collect()
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn snapshot() -> DirectorySnapshot {
        DirectorySnapshot {
            teammates: vec![
                teammate("Bob", "America/New_York", &["Platform"]),
                teammate("alice", "Asia/Tokyo", &["Design", "Platform"]),
                teammate("Charlie", "America/New_York", &[]),
                teammate("Tokyo Drift", "Europe/London", &["Design"]),
                teammate("Nobody", "Not/AZone", &[]),
            ],
            groups: ["Design".to_string(), "Platform".to_string()].into(),
        }
    }

    #[test]
    fn test_empty_search_passes_everything() {
        let snapshot = snapshot();
        assert_eq!(filter(&snapshot.teammates, "").len(), 5);
    }

    #[test]
    fn test_search_whitespace_is_literal() {
        let snapshot = snapshot();
        let found = filter(&snapshot.teammates, "tokyo ");
        assert_eq!(names(&found), vec!["Tokyo Drift"]);

        assert!(filter(&snapshot.teammates, "   ").is_empty());
    }

    #[test]
    fn test_search_matches_name_or_zone() {
        let snapshot = snapshot();
        let found = filter(&snapshot.teammates, "tokyo");
        assert_eq!(names(&found), vec!["alice", "Tokyo Drift"]);

        let found = filter(&snapshot.teammates, "NEW_YORK");
        assert_eq!(names(&found), vec!["Bob", "Charlie"]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let list = vec![
            teammate("Bob", "UTC", &[]),
            teammate("alice", "UTC", &[]),
            teammate("Charlie", "UTC", &[]),
        ];
        let mut refs: Vec<&Teammate> = list.iter().collect();

        sort(&mut refs, SortOrder::ByName, instant());
        assert_eq!(names(&refs), vec!["alice", "Bob", "Charlie"]);
    }

    #[test]
    fn test_sort_by_time_puts_unresolved_last() {
        let snapshot = snapshot();
        let mut refs = filter(&snapshot.teammates, "");

        sort(&mut refs, SortOrder::ByTime, instant());
        assert_eq!(
            names(&refs),
            vec!["Bob", "Charlie", "Tokyo Drift", "alice", "Nobody"]
        );
    }

    #[test]
    fn test_group_by_time_zone() {
        let list = vec![
            teammate("Ny One", "America/New_York", &[]),
            teammate("Tk", "Asia/Tokyo", &[]),
            teammate("Ny Two", "America/New_York", &[]),
        ];
        let buckets = group(list.iter().collect(), GroupMode::ByTimeZone);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].key, "America/New_York");
        assert_eq!(names(&buckets[0].teammates), vec!["Ny One", "Ny Two"]);
        assert_eq!(buckets[1].key, "Asia/Tokyo");
    }

    #[test]
    fn test_group_by_label_uses_first_group_only() {
        let snapshot = snapshot();
        let query = ViewQuery {
            search: String::new(),
            sort: SortOrder::ByName,
            group: GroupMode::ByGroup,
        };
        let buckets = project(&snapshot, &query, instant());

        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["Design", "Platform", UNGROUPED_KEY]);
        assert_eq!(names(&buckets[0].teammates), vec!["alice", "Tokyo Drift"]);
        assert_eq!(names(&buckets[1].teammates), vec!["Bob"]);
        assert_eq!(names(&buckets[2].teammates), vec!["Charlie", "Nobody"]);

        let total: usize = buckets.iter().map(|b| b.teammates.len()).sum();
        assert_eq!(total, snapshot.teammates.len());
    }

    #[test]
    fn test_no_grouping_yields_single_bucket() {
        let snapshot = snapshot();
        let query = ViewQuery {
            search: "zzz".to_string(),
            ..ViewQuery::default()
        };
        let buckets = project(&snapshot, &query, instant());

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].key, ALL_KEY);
        assert!(buckets[0].teammates.is_empty());
    }

    #[test]
    fn test_projection_does_not_touch_snapshot() {
        let snapshot = snapshot();
        let before = snapshot.clone();
        let query = ViewQuery {
            search: "o".to_string(),
            sort: SortOrder::ByTime,
            group: GroupMode::ByTimeZone,
        };

        let _ = project(&snapshot, &query, instant());
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_parse_ui_parameters() {
        assert_eq!("time".parse::<SortOrder>().unwrap(), SortOrder::ByTime);
        assert_eq!("Zone".parse::<GroupMode>().unwrap(), GroupMode::ByTimeZone);
        assert!("size".parse::<SortOrder>().is_err());
        assert!("team".parse::<GroupMode>().is_err());
    }
}
