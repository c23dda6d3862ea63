//! Merging of per-repository contributor lists into one ranked board.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::github::{RemoteContributor, Source};

/// A contributor's combined standing across both repositories
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AggregatedContributor {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(rename = "frameworkContributions", default)]
    pub framework_contributions: u64,
    #[serde(rename = "skeletonContributions", default)]
    pub skeleton_contributions: u64,
    #[serde(rename = "totalContributions")]
    pub total_contributions: u64,
    pub rank: usize,
}

impl AggregatedContributor {
    fn from_remote(remote: &RemoteContributor) -> Self {
        AggregatedContributor {
            login: remote.login.clone(),
            avatar_url: remote.avatar_url.clone(),
            html_url: remote.html_url.clone(),
            framework_contributions: 0,
            skeleton_contributions: 0,
            total_contributions: 0,
            rank: 0,
        }
    }

    fn add(&mut self, source: Source, contributions: u64) {
        match source {
            Source::Framework => {
                self.framework_contributions = self.framework_contributions.saturating_add(contributions)
            }
            Source::Skeleton => {
                self.skeleton_contributions = self.skeleton_contributions.saturating_add(contributions)
            }
        }
        // Counters come from the network; clamp instead of overflowing
        self.total_contributions = self
            .framework_contributions
            .saturating_add(self.skeleton_contributions);
    }
}

/// Merge both contributor lists and rank the result.
///
/// Logins keep their first-seen position (framework order, then
/// skeleton-only logins) so equal totals stay in input order. Identity
/// fields come from the last record seen for a login.
pub fn merge_contributors(
    framework: &[RemoteContributor],
    skeleton: &[RemoteContributor],
) -> Vec<AggregatedContributor> {
    let mut merged: Vec<AggregatedContributor> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let records = framework
        .iter()
        .map(|c| (Source::Framework, c))
        .chain(skeleton.iter().map(|c| (Source::Skeleton, c)));

    for (source, remote) in records {
        let position = *index.entry(remote.login.clone()).or_insert_with(|| {
            merged.push(AggregatedContributor::from_remote(remote));
            merged.len() - 1
        });

        let entry = &mut merged[position];
        entry.avatar_url = remote.avatar_url.clone();
        entry.html_url = remote.html_url.clone();
        entry.add(source, remote.contributions);
    }

    rank_contributors(&mut merged);
    merged
}

/// Sort descending by total (stable) and assign 1-based ranks
pub fn rank_contributors(contributors: &mut [AggregatedContributor]) {
    contributors.sort_by(|a, b| b.total_contributions.cmp(&a.total_contributions));

    for (position, contributor) in contributors.iter_mut().enumerate() {
        contributor.rank = position + 1;
    }
}
