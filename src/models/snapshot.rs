//! Directory snapshot: the unit published to subscribers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Teammate;

/// Teammates plus the known group labels at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorySnapshot {
    pub teammates: Vec<Teammate>,
    pub groups: BTreeSet<String>,
}

impl DirectorySnapshot {
    pub fn is_empty(&self) -> bool {
        self.teammates.is_empty() && self.groups.is_empty()
    }
}

/// Auxiliary settings persisted beside the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Slack workspace (team) id used to build chat deep links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_workspace: Option<String>,
}
