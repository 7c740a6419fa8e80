//! Rendered rows for `list` and `watch`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::links;
use crate::models::{DirectorySnapshot, Teammate};
use crate::projection::{self, ViewQuery};
use crate::timezone::ZoneClock;

/// One teammate with derived display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeammateRow {
    pub id: Uuid,
    /// Position in storage order, usable with `remove --index`
    pub position: usize,
    pub name: String,
    pub time_zone_identifier: String,
    /// Empty when the zone is unknown
    pub local_time: String,
    /// Empty when the zone is unknown
    pub time_difference: String,
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_link: Option<String>,
    pub has_avatar: bool,
}

impl TeammateRow {
    pub fn new(
        teammate: &Teammate,
        position: usize,
        clock: &ZoneClock,
        at: DateTime<Utc>,
        workspace: Option<&str>,
    ) -> Self {
        let zone_time = clock.zone_time(&teammate.time_zone_identifier, at);
        Self {
            id: teammate.id,
            position,
            name: teammate.name.clone(),
            time_zone_identifier: teammate.time_zone_identifier.clone(),
            local_time: zone_time.local_time,
            time_difference: zone_time.time_difference,
            groups: teammate.groups.iter().cloned().collect(),
            email_link: links::email_link(teammate),
            slack_link: links::slack_link(teammate, workspace),
            has_avatar: teammate.image_data.is_some(),
        }
    }
}

impl fmt::Display for TeammateRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local_time = if self.local_time.is_empty() {
            "--"
        } else {
            &self.local_time
        };
        write!(
            f,
            "{:>3}  {:<20} {:>8}  {:<10} {}",
            self.position, self.name, local_time, self.time_difference, self.time_zone_identifier
        )?;
        if !self.groups.is_empty() {
            write!(f, "  [{}]", self.groups.join(", "))?;
        }
        if let Some(link) = &self.email_link {
            write!(f, "  {}", link)?;
        }
        if let Some(link) = &self.slack_link {
            write!(f, "  {}", link)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSection {
    pub key: String,
    pub rows: Vec<TeammateRow>,
}

/// A full projection rendered at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<BoardSection>,
}

impl Board {
    pub fn build(
        snapshot: &DirectorySnapshot,
        query: &ViewQuery,
        clock: &ZoneClock,
        at: DateTime<Utc>,
        workspace: Option<&str>,
    ) -> Self {
        let sections = projection::project(snapshot, query, at)
            .into_iter()
            .map(|bucket| BoardSection {
                key: bucket.key,
                rows: bucket
                    .teammates
                    .into_iter()
                    .map(|teammate| {
                        let position = snapshot
                            .teammates
                            .iter()
                            .position(|t| t.id == teammate.id)
                            .unwrap_or_default();
                        TeammateRow::new(teammate, position, clock, at, workspace)
                    })
                    .collect(),
            })
            .collect();

        Self {
            generated_at: at,
            sections,
        }
    }

    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.row_count() == 0 {
            return writeln!(f, "No teammates");
        }

        let titled = self.sections.len() > 1
            || self
                .sections
                .first()
                .is_some_and(|s| s.key != projection::ALL_KEY);
        for section in &self.sections {
            if titled {
                writeln!(f, "== {}", section.key)?;
            }
            for row in &section.rows {
                writeln!(f, "{}", row)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTeammate;
    use crate::projection::GroupMode;
    use crate::timezone::{ClockStyle, LocalZone};
    use chrono::TimeZone;

    #[test]
    fn test_board_rows() {
        let snapshot = DirectorySnapshot {
            teammates: vec![
                NewTeammate {
                    email: Some("kofi@example.com".to_string()),
                    ..NewTeammate::new("Kofi", "Africa/Accra")
                }
                .into_teammate(Uuid::new_v4()),
                NewTeammate::new("Lost", "Not/AZone").into_teammate(Uuid::new_v4()),
            ],
            groups: Default::default(),
        };
        let clock = ZoneClock::new(
            LocalZone::named("Europe/Berlin").unwrap(),
            ClockStyle::TwentyFourHour,
        );
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let query = ViewQuery {
            group: GroupMode::ByTimeZone,
            ..ViewQuery::default()
        };

        let board = Board::build(&snapshot, &query, &clock, at, None);
        assert_eq!(board.sections.len(), 2);

        let kofi = &board.sections[0].rows[0];
        assert_eq!(kofi.local_time, "12:00");
        assert_eq!(kofi.time_difference, "-1h");
        assert_eq!(kofi.email_link.as_deref(), Some("mailto:kofi@example.com"));
        assert_eq!(kofi.position, 0);

        let lost = &board.sections[1].rows[0];
        assert_eq!(lost.position, 1);
        assert!(lost.local_time.is_empty());
        assert!(lost.time_difference.is_empty());

        let text = board.to_string();
        assert!(text.contains("== Africa/Accra"));
        assert!(text.contains("--"));
    }
}
