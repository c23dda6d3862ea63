use serde::{Deserialize, Serialize};
use std::fmt;

/// A contributor as reported by the GitHub contributors endpoint
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RemoteContributor {
    pub login: String,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    pub contributions: u64,
}

/// The two repositories contributors are collected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Framework,
    Skeleton,
}

impl Source {
    /// Short name used in logs and default repository names
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Framework => "framework",
            Source::Skeleton => "skeleton",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
