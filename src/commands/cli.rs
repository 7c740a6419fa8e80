//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::projection::{GroupMode, SortOrder, ViewQuery};

/// Teammates' local times, grouped and sorted.
#[derive(Debug, Parser)]
#[command(name = "teamclock", version, about)]
pub struct Cli {
    /// Print JSON response envelopes instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Data directory (overrides TEAMCLOCK_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show teammates with their local times
    List(ViewArgs),
    /// Like `list`, re-rendered on every refresh interval until interrupted
    Watch(ViewArgs),
    /// Add a teammate
    Add(AddArgs),
    /// Change fields of a teammate
    Edit(EditArgs),
    /// Remove a teammate by reference or by storage position
    Remove(RemoveArgs),
    /// Manage group labels
    #[command(subcommand)]
    Groups(GroupsCommand),
    /// Manage the Slack workspace id used for chat links
    #[command(subcommand)]
    Workspace(WorkspaceCommand),
    /// Write the teammate list as JSON (stdout when no path is given)
    Export {
        path: Option<PathBuf>,
    },
    /// Replace the teammate list with a previously exported file
    Import {
        path: PathBuf,
    },
    /// Delete all teammates, groups and settings
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Find time-zone identifiers for a city or zone name
    Zones {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Interactive zone search: one query per stdin line, debounced
    Pick,
}

#[derive(Debug, Clone, Args)]
pub struct ViewArgs {
    /// Case-insensitive filter on name or time zone
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// name or time
    #[arg(long, default_value = "name")]
    pub sort: SortOrder,

    /// none, group or zone
    #[arg(long, default_value = "none")]
    pub group: GroupMode,
}

impl ViewArgs {
    pub fn query(&self) -> ViewQuery {
        ViewQuery {
            search: self.search.trim().to_string(),
            sort: self.sort,
            group: self.group,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// IANA time-zone identifier, e.g. Europe/Berlin
    #[arg(long = "tz")]
    pub time_zone: String,

    #[arg(long)]
    pub email: Option<String>,

    /// Slack member id
    #[arg(long = "slack")]
    pub slack_id: Option<String>,

    /// Group label (repeatable); unknown labels are created
    #[arg(long = "group")]
    pub groups: Vec<String>,

    /// Avatar image file
    #[arg(long)]
    pub avatar: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Teammate id, id prefix or name
    pub teammate: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "tz")]
    pub time_zone: Option<String>,

    #[arg(long, conflicts_with = "clear_email")]
    pub email: Option<String>,

    #[arg(long)]
    pub clear_email: bool,

    #[arg(long = "slack", conflicts_with = "clear_slack")]
    pub slack_id: Option<String>,

    #[arg(long)]
    pub clear_slack: bool,

    /// Replace the group set (repeatable)
    #[arg(long = "group", conflicts_with = "clear_groups")]
    pub groups: Vec<String>,

    #[arg(long)]
    pub clear_groups: bool,

    #[arg(long, conflicts_with = "clear_avatar")]
    pub avatar: Option<PathBuf>,

    #[arg(long)]
    pub clear_avatar: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RemoveArgs {
    /// Teammate id, id prefix or name
    #[arg(required_unless_present = "index", conflicts_with = "index")]
    pub teammate: Option<String>,

    /// Position in storage order (the `#` column of `list`)
    #[arg(long)]
    pub index: Option<usize>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum GroupsCommand {
    /// List known group labels
    List,
    /// Add a group label
    Add { label: String },
    /// Remove a group label from the directory and every teammate
    Remove { label: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum WorkspaceCommand {
    Show,
    Set { workspace: String },
    Clear,
}
