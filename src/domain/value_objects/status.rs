//! Configuration set lifecycle status

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigStatus {
    Draft,
    Published,
    Archived,
}

impl ConfigStatus {
    pub const ALL: [ConfigStatus; 3] = [
        ConfigStatus::Draft,
        ConfigStatus::Published,
        ConfigStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigStatus::Draft => "DRAFT",
            ConfigStatus::Published => "PUBLISHED",
            ConfigStatus::Archived => "ARCHIVED",
        }
    }

    /// Whether a set in this status may govern postings.
    pub fn is_selectable(&self, allow_drafts: bool) -> bool {
        match self {
            ConfigStatus::Published => true,
            ConfigStatus::Draft => allow_drafts,
            ConfigStatus::Archived => false,
        }
    }
}

impl FromStr for ConfigStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(ConfigStatus::Draft),
            "PUBLISHED" => Ok(ConfigStatus::Published),
            "ARCHIVED" => Ok(ConfigStatus::Archived),
            _ => Err(format!(
                "invalid status '{}' (expected one of DRAFT, PUBLISHED, ARCHIVED)",
                s
            )),
        }
    }
}

impl fmt::Display for ConfigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
